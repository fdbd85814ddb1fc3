//! Sistema de manejo de errores
//!
//! Este módulo define los errores de las operaciones de formulario
//! y su conversión a respuestas HTTP. Todos son terminales para la operación
//! que los produce: no hay reintentos ni escrituras parciales.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use std::borrow::Cow;
use thiserror::Error;
use tracing::{error, warn};

use crate::database::store::StoreError;

/// Errores principales de la aplicación
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Validation error: {0}")]
    Validation(#[from] validator::ValidationErrors),

    #[error("Reference not found: {field} = {id}")]
    ReferenceNotFound {
        field: &'static str,
        id: i64,
        message: &'static str,
    },

    #[error("Reference check failed for {field}: {reason}")]
    ReferenceCheckFailed { field: &'static str, reason: String },

    #[error("Database error: {0}")]
    Store(#[from] StoreError),

    #[error("Not connected to the database")]
    NotConnected,

    #[error("Internal server error: {0}")]
    Internal(String),
}

impl AppError {
    /// Texto de estado que se muestra al usuario
    pub fn status_message(&self) -> String {
        match self {
            AppError::Validation(errors) => errors
                .field_errors()
                .values()
                .flat_map(|list| list.iter())
                .find_map(|e| e.message.as_ref().map(|m| m.to_string()))
                .unwrap_or_else(|| "Datos inválidos.".to_string()),
            AppError::ReferenceNotFound { message, .. } => message.to_string(),
            AppError::ReferenceCheckFailed { field, reason } => {
                format!("No se pudo verificar {}: {}", field, reason)
            }
            AppError::Store(e) => format!("Error de base de datos: {}", e),
            AppError::NotConnected => "Error de base de datos: sin conexión.".to_string(),
            AppError::Internal(msg) => format!("Error interno: {}", msg),
        }
    }

    /// Campo que provocó el error, si lo hay
    pub fn field(&self) -> Option<&'static str> {
        match self {
            AppError::Validation(errors) => errors.field_errors().keys().next().copied(),
            AppError::ReferenceNotFound { field, .. } | AppError::ReferenceCheckFailed { field, .. } => {
                Some(*field)
            }
            _ => None,
        }
    }

    pub fn is_validation(&self) -> bool {
        matches!(self, AppError::Validation(_))
    }
}

/// Respuesta de error para la API
#[derive(Debug, serde::Serialize)]
struct ErrorResponse {
    error: String,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<serde_json::Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    code: Option<String>,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let message = self.status_message();

        let (status, error_response) = match &self {
            AppError::Validation(e) => {
                warn!("Validation error: {}", message);
                (
                    StatusCode::BAD_REQUEST,
                    ErrorResponse {
                        error: "Validation Error".to_string(),
                        message,
                        details: Some(json!(e)),
                        code: Some("VALIDATION_ERROR".to_string()),
                    },
                )
            }

            AppError::ReferenceNotFound { field, id, .. } => {
                warn!("Reference not found: {} = {}", field, id);
                (
                    StatusCode::UNPROCESSABLE_ENTITY,
                    ErrorResponse {
                        error: "Reference Not Found".to_string(),
                        message,
                        details: Some(json!({ "field": field, "id": id })),
                        code: Some("REFERENCE_NOT_FOUND".to_string()),
                    },
                )
            }

            AppError::ReferenceCheckFailed { field, reason } => {
                error!("Reference check failed for {}: {}", field, reason);
                (
                    StatusCode::SERVICE_UNAVAILABLE,
                    ErrorResponse {
                        error: "Reference Check Failed".to_string(),
                        message,
                        details: Some(json!({ "field": field, "reason": reason })),
                        code: Some("REFERENCE_CHECK_FAILED".to_string()),
                    },
                )
            }

            AppError::Store(e) => {
                error!("Database error: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorResponse {
                        error: "Database Error".to_string(),
                        message,
                        details: Some(json!({ "sql_error": e.to_string() })),
                        code: Some("DB_ERROR".to_string()),
                    },
                )
            }

            AppError::NotConnected => {
                error!("Operation attempted without a database connection");
                (
                    StatusCode::SERVICE_UNAVAILABLE,
                    ErrorResponse {
                        error: "Not Connected".to_string(),
                        message,
                        details: None,
                        code: Some("NOT_CONNECTED".to_string()),
                    },
                )
            }

            AppError::Internal(msg) => {
                error!("Internal error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorResponse {
                        error: "Internal Server Error".to_string(),
                        message: "An unexpected error occurred".to_string(),
                        details: Some(json!({ "internal_error": msg })),
                        code: Some("INTERNAL_ERROR".to_string()),
                    },
                )
            }
        };

        (status, Json(error_response)).into_response()
    }
}

/// Resultado tipado para operaciones que pueden fallar
pub type AppResult<T> = Result<T, AppError>;

/// Función helper para crear errores de validación
pub fn validation_error(field: &'static str, message: &'static str) -> AppError {
    use validator::ValidationError;

    let mut error = ValidationError::new("invalid");
    error.message = Some(Cow::Borrowed(message));
    error.add_param("field".into(), &field);

    let mut errors = validator::ValidationErrors::new();
    errors.add(field, error);

    AppError::Validation(errors)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_error_carries_field_and_message() {
        let error = validation_error("salary", "Salario inválido.");
        assert!(error.is_validation());
        assert_eq!(error.field(), Some("salary"));
        assert_eq!(error.status_message(), "Salario inválido.");
    }

    #[test]
    fn test_store_error_text_is_verbatim() {
        let error = AppError::from(StoreError::new("duplicate key value"));
        assert_eq!(error.status_message(), "Error de base de datos: duplicate key value");
    }

    #[test]
    fn test_not_found_reference_response_status() {
        let error = AppError::ReferenceNotFound {
            field: "client_id",
            id: 9,
            message: "Cliente no encontrado.",
        };
        assert_eq!(error.status_message(), "Cliente no encontrado.");
        let response = error.into_response();
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[test]
    fn test_not_connected_response_status() {
        let response = AppError::NotConnected.into_response();
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    }
}
