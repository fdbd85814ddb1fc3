use axum::{extract::State, routing::{get, post}, Json, Router};
use serde_json::{json, Value};

use crate::dto::record_dto::{ApiResponse, ConnectionStatus, EntityInfo};
use crate::models::entity::EntityKind;
use crate::state::AppState;
use crate::utils::errors::AppError;

pub fn create_system_router() -> Router<AppState> {
    Router::new()
        .route("/health", get(health))
        .route("/api/entities", get(list_entities))
        .route("/api/connection", get(connection_status))
        .route("/api/connection/reconnect", post(reconnect))
}

async fn health() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "service": "transport-records",
    }))
}

async fn list_entities() -> Json<Vec<EntityInfo>> {
    Json(
        EntityKind::ALL
            .iter()
            .map(|kind| EntityInfo::from(kind.descriptor()))
            .collect(),
    )
}

async fn connection_status(State(state): State<AppState>) -> Json<ConnectionStatus> {
    let store = state.store().await;
    Json(ConnectionStatus {
        connected: store.is_some(),
        backend: store.map(|s| s.backend_name()),
    })
}

async fn reconnect(State(state): State<AppState>) -> Result<Json<ApiResponse<ConnectionStatus>>, AppError> {
    let backend = state.reconnect().await?;
    Ok(Json(ApiResponse::with_message(
        true,
        ConnectionStatus {
            connected: true,
            backend: Some(backend),
        },
        "Conexión reabierta.".to_string(),
    )))
}
