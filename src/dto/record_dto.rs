use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;

use crate::controllers::form_controller::{OperationReport, RawFields};
use crate::models::entity::{EntityDescriptor, EntityKind};

// Request para crear o actualizar un registro
#[derive(Debug, Default, Deserialize)]
pub struct RecordRequest {
    #[serde(default)]
    pub fields: HashMap<String, Value>,
}

impl RecordRequest {
    /// Convertir a texto crudo; números y booleanos se pasan tal cual se escribieron
    pub fn into_raw_fields(self) -> RawFields {
        self.fields
            .into_iter()
            .map(|(name, value)| {
                let text = match value {
                    Value::String(s) => s,
                    Value::Null => String::new(),
                    other => other.to_string(),
                };
                (name, text)
            })
            .collect()
    }
}

// Response genérica
#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub message: Option<String>,
    pub data: Option<T>,
}

impl<T> ApiResponse<T> {
    pub fn with_message(success: bool, data: T, message: String) -> Self {
        Self {
            success,
            message: Some(message),
            data: Some(data),
        }
    }
}

impl ApiResponse<OperationReport> {
    pub fn from_report(report: OperationReport) -> Self {
        let message = report.message.clone();
        Self::with_message(report.outcome.is_success(), report, message)
    }
}

// Estado de la conexión
#[derive(Debug, Serialize)]
pub struct ConnectionStatus {
    pub connected: bool,
    pub backend: Option<&'static str>,
}

// Metadatos de un campo para que la interfaz pueda dibujar el formulario
#[derive(Debug, Serialize)]
pub struct FieldInfo {
    pub column: &'static str,
    pub label: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub references: Option<EntityKind>,
}

#[derive(Debug, Serialize)]
pub struct EntityInfo {
    pub entity: EntityKind,
    pub label: &'static str,
    pub table: &'static str,
    pub key_column: &'static str,
    pub fields: Vec<FieldInfo>,
}

impl From<&'static EntityDescriptor> for EntityInfo {
    fn from(descriptor: &'static EntityDescriptor) -> Self {
        Self {
            entity: descriptor.kind,
            label: descriptor.label,
            table: descriptor.table,
            key_column: descriptor.key_column,
            fields: descriptor
                .fields
                .iter()
                .map(|f| FieldInfo {
                    column: f.column,
                    label: f.label,
                    references: f.rule.reference(),
                })
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_into_raw_fields_stringifies_scalars() {
        let request: RecordRequest = serde_json::from_value(json!({
            "fields": { "name": "Ana", "salary": 2500.5, "year": 2020, "model": null }
        }))
        .unwrap();

        let raw = request.into_raw_fields();
        assert_eq!(raw["name"], "Ana");
        assert_eq!(raw["salary"], "2500.5");
        assert_eq!(raw["year"], "2020");
        assert_eq!(raw["model"], "");
    }

    #[test]
    fn test_missing_fields_object_is_empty() {
        let request: RecordRequest = serde_json::from_value(json!({})).unwrap();
        assert!(request.into_raw_fields().is_empty());
    }

    #[test]
    fn test_entity_info_lists_references() {
        let info = EntityInfo::from(EntityKind::Route.descriptor());
        let driver = info.fields.iter().find(|f| f.column == "driver_id").unwrap();
        assert_eq!(driver.references, Some(EntityKind::Driver));
        assert!(info.fields.iter().find(|f| f.column == "origin").unwrap().references.is_none());
    }
}
