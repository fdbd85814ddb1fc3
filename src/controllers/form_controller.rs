//! Controlador genérico de formularios
//!
//! Un único controlador sirve a las seis entidades a partir de su
//! descriptor. Cada operación es de una sola pasada:
//! validar → (verificar referencias) → construir sentencia → ejecutar →
//! devolver un mensaje de estado.

use serde::Serialize;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::info;

use crate::database::query_builder::{InsertBuilder, SqlValue, Statement, UpdateBuilder};
use crate::database::store::{Store, TableView};
use crate::models::entity::{EntityDescriptor, EntityKind, FieldSpec};
use crate::services::reference_service::{check_reference, ReferenceCheck};
use crate::utils::errors::{validation_error, AppError, AppResult};
use crate::utils::validation;

/// Texto crudo de los campos, por nombre de columna
pub type RawFields = HashMap<String, String>;

/// Resultado de una operación que terminó sin error
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    Created,
    Updated,
    Deleted,
    /// Ningún campo presente en la actualización; no se ejecutó nada
    NothingToUpdate,
    /// La sentencia se ejecutó pero no afectó ninguna fila
    NotFound,
}

impl Outcome {
    pub fn is_success(self) -> bool {
        matches!(self, Outcome::Created | Outcome::Updated | Outcome::Deleted)
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct OperationReport {
    pub entity: EntityKind,
    pub outcome: Outcome,
    pub message: String,
}

pub struct FormController {
    descriptor: &'static EntityDescriptor,
    store: Option<Arc<dyn Store>>,
}

impl FormController {
    pub fn new(kind: EntityKind, store: Option<Arc<dyn Store>>) -> Self {
        Self {
            descriptor: kind.descriptor(),
            store,
        }
    }

    pub fn descriptor(&self) -> &'static EntityDescriptor {
        self.descriptor
    }

    fn store(&self) -> AppResult<&dyn Store> {
        self.store.as_deref().ok_or(AppError::NotConnected)
    }

    fn report(&self, outcome: Outcome, message: &str) -> OperationReport {
        OperationReport {
            entity: self.descriptor.kind,
            outcome,
            message: message.to_string(),
        }
    }

    /// Alta: todos los campos son obligatorios y se validan en orden
    pub async fn create(&self, fields: &RawFields) -> AppResult<OperationReport> {
        let mut values = Vec::with_capacity(self.descriptor.fields.len());
        for spec in self.descriptor.fields {
            let raw = raw_field(fields, spec);
            values.push((spec, validate_field(spec, raw)?));
        }

        let store = self.store()?;
        check_references(store, &values).await?;

        let statement = values
            .into_iter()
            .fold(InsertBuilder::new(self.descriptor.table), |builder, (spec, value)| {
                builder.value(spec.column, value)
            })
            .build();

        store.execute(&statement).await?;
        info!("✅ {} creado", self.descriptor.label);

        Ok(self.report(Outcome::Created, self.descriptor.messages.created))
    }

    /// Actualización parcial: un campo vacío significa "sin cambios"
    pub async fn update(&self, id: &str, fields: &RawFields) -> AppResult<OperationReport> {
        let id = parse_id(id, "ID inválido para actualizar.")?;

        let mut present = Vec::new();
        for spec in self.descriptor.fields {
            let raw = raw_field(fields, spec);
            if raw.is_empty() {
                continue;
            }
            present.push((spec, validate_field(spec, raw)?));
        }

        if present.is_empty() {
            return Ok(self.report(Outcome::NothingToUpdate, "Nada que actualizar."));
        }

        let store = self.store()?;
        check_references(store, &present).await?;

        let statement = present
            .into_iter()
            .fold(
                UpdateBuilder::new(self.descriptor.table, self.descriptor.key_column, id),
                |builder, (spec, value)| builder.set_if_present(spec.column, Some(value)),
            )
            .build()
            .ok_or_else(|| AppError::Internal("update without assignments".to_string()))?;

        let affected = store.execute(&statement).await?;
        if affected == 0 {
            info!("🔍 {} {} no encontrado para actualizar", self.descriptor.label, id);
            return Ok(self.report(Outcome::NotFound, "Ningún registro actualizado (ID no encontrado)."));
        }

        info!("✏️ {} {} actualizado", self.descriptor.label, id);
        Ok(self.report(Outcome::Updated, self.descriptor.messages.updated))
    }

    /// Baja por id; cero filas afectadas es un fallo suave
    pub async fn delete(&self, id: &str) -> AppResult<OperationReport> {
        let id = parse_id(id, "ID inválido para eliminar.")?;
        let store = self.store()?;

        let statement = Statement::delete(self.descriptor.table, self.descriptor.key_column, id);
        let affected = store.execute(&statement).await?;

        if affected == 0 {
            info!("🔍 {} {} no encontrado para eliminar", self.descriptor.label, id);
            return Ok(self.report(Outcome::NotFound, "Ningún registro eliminado (ID no encontrado)."));
        }

        info!("🗑️ {} {} eliminado", self.descriptor.label, id);
        Ok(self.report(Outcome::Deleted, self.descriptor.messages.deleted))
    }

    /// Listado completo, siempre leído de nuevo del almacén
    pub async fn list(&self) -> AppResult<TableView> {
        let store = self.store()?;
        let statement = Statement::select(
            self.descriptor.table,
            self.descriptor.key_column,
            self.descriptor.list_columns(),
        );
        Ok(store.select(&statement).await?)
    }
}

fn raw_field<'a>(fields: &'a RawFields, spec: &FieldSpec) -> &'a str {
    fields
        .get(spec.column)
        .map(|value| validation::trim(value))
        .unwrap_or("")
}

fn validate_field(spec: &'static FieldSpec, raw: &str) -> AppResult<SqlValue> {
    spec.rule
        .parse(raw)
        .ok_or_else(|| validation_error(spec.column, spec.invalid_message))
}

fn parse_id(raw: &str, message: &'static str) -> AppResult<i64> {
    validation::parse_integer(validation::trim(raw)).ok_or_else(|| validation_error("id", message))
}

/// Verificar, en el orden declarado, las claves foráneas ya validadas
async fn check_references(store: &dyn Store, values: &[(&'static FieldSpec, SqlValue)]) -> AppResult<()> {
    for (spec, value) in values {
        let (Some(target), SqlValue::Integer(id)) = (spec.rule.reference(), value) else {
            continue;
        };

        match check_reference(store, target.descriptor(), *id).await {
            ReferenceCheck::Found => {}
            ReferenceCheck::Missing => {
                return Err(AppError::ReferenceNotFound {
                    field: spec.column,
                    id: *id,
                    message: spec.missing_message,
                })
            }
            ReferenceCheck::LookupFailed(reason) => {
                return Err(AppError::ReferenceCheckFailed {
                    field: spec.column,
                    reason,
                })
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::memory::MemoryStore;

    fn fields(pairs: &[(&str, &str)]) -> RawFields {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    fn memory() -> Option<Arc<dyn Store>> {
        Some(Arc::new(MemoryStore::new()))
    }

    #[tokio::test]
    async fn test_create_reports_first_failing_field() {
        let controller = FormController::new(EntityKind::Driver, memory());
        let error = controller
            .create(&fields(&[("name", "A"), ("license_number", "123"), ("salary", "x")]))
            .await
            .unwrap_err();

        assert_eq!(error.field(), Some("name"));
        assert_eq!(error.status_message(), "Nombre inválido (2-100 caracteres).");
    }

    #[tokio::test]
    async fn test_create_trims_values() {
        let controller = FormController::new(EntityKind::Client, memory());
        let report = controller
            .create(&fields(&[
                ("name", "  Logística Norte  "),
                ("tax_id", "12.345.678/0001-90"),
                ("address", " Av. Central 100 "),
            ]))
            .await
            .unwrap();
        assert_eq!(report.outcome, Outcome::Created);

        let view = controller.list().await.unwrap();
        assert_eq!(view.cell(0, "name"), Some("Logística Norte"));
        assert_eq!(view.cell(0, "address"), Some("Av. Central 100"));
    }

    #[tokio::test]
    async fn test_update_validates_present_fields() {
        let controller = FormController::new(EntityKind::Vehicle, memory());
        let error = controller
            .update("1", &fields(&[("year", "1800")]))
            .await
            .unwrap_err();
        assert_eq!(error.field(), Some("year"));
    }

    #[tokio::test]
    async fn test_nothing_to_update_needs_no_connection() {
        let controller = FormController::new(EntityKind::Route, None);
        let report = controller.update("4", &fields(&[("origin", "   ")])).await.unwrap();
        assert_eq!(report.outcome, Outcome::NothingToUpdate);
        assert!(!report.outcome.is_success());
    }

    #[tokio::test]
    async fn test_malformed_id_is_validation_before_connection() {
        let controller = FormController::new(EntityKind::Cargo, None);
        let error = controller.delete("abc").await.unwrap_err();
        assert!(error.is_validation());
        assert_eq!(error.field(), Some("id"));

        let error = controller.delete("12").await.unwrap_err();
        assert!(matches!(error, AppError::NotConnected));
    }
}
