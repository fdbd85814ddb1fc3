//! Estado de un formulario
//!
//! Los buffers de texto de cada formulario (campos, id para actualizar, id
//! para eliminar) y el último mensaje de estado viven en un `FormState`
//! propiedad de la interfaz, que lo presta al controlador en cada acción.

use crate::controllers::form_controller::{FormController, OperationReport, Outcome, RawFields};
use crate::models::entity::EntityKind;
use crate::utils::errors::AppResult;

#[derive(Debug, Clone)]
pub struct FormState {
    kind: EntityKind,
    pub fields: RawFields,
    pub update_id: String,
    pub delete_id: String,
    pub status: String,
}

impl FormState {
    pub fn new(kind: EntityKind) -> Self {
        let fields = kind
            .descriptor()
            .fields
            .iter()
            .map(|f| (f.column.to_string(), String::new()))
            .collect();

        Self {
            kind,
            fields,
            update_id: String::new(),
            delete_id: String::new(),
            status: String::new(),
        }
    }

    pub fn kind(&self) -> EntityKind {
        self.kind
    }

    /// Texto actual de un campo
    pub fn field(&self, column: &str) -> &str {
        self.fields.get(column).map(String::as_str).unwrap_or("")
    }

    pub fn set_field(&mut self, column: &str, value: impl Into<String>) {
        self.fields.insert(column.to_string(), value.into());
    }

    pub fn clear_fields(&mut self) {
        for value in self.fields.values_mut() {
            value.clear();
        }
    }

    /// Registrar; los campos se limpian sólo si el alta tuvo éxito
    pub async fn submit_create(&mut self, controller: &FormController) -> Option<Outcome> {
        let result = controller.create(&self.fields).await;
        let outcome = self.apply(result);
        if outcome == Some(Outcome::Created) {
            self.clear_fields();
        }
        outcome
    }

    pub async fn submit_update(&mut self, controller: &FormController) -> Option<Outcome> {
        let result = controller.update(&self.update_id, &self.fields).await;
        self.apply(result)
    }

    pub async fn submit_delete(&mut self, controller: &FormController) -> Option<Outcome> {
        let result = controller.delete(&self.delete_id).await;
        self.apply(result)
    }

    // El mensaje nuevo reemplaza siempre al anterior
    fn apply(&mut self, result: AppResult<OperationReport>) -> Option<Outcome> {
        match result {
            Ok(report) => {
                self.status = report.message;
                Some(report.outcome)
            }
            Err(error) => {
                self.status = error.status_message();
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::memory::MemoryStore;
    use crate::database::store::Store;
    use std::sync::Arc;

    fn controller(kind: EntityKind) -> FormController {
        let store: Arc<dyn Store> = Arc::new(MemoryStore::new());
        FormController::new(kind, Some(store))
    }

    #[tokio::test]
    async fn test_successful_create_clears_fields() {
        let controller = controller(EntityKind::Driver);
        let mut form = FormState::new(EntityKind::Driver);
        form.set_field("name", "Marta Díaz");
        form.set_field("license_number", "123.456.789-01");
        form.set_field("salary", "3200.00");

        assert_eq!(form.submit_create(&controller).await, Some(Outcome::Created));
        assert_eq!(form.status, "Conductor registrado exitosamente.");
        assert!(form.fields.values().all(String::is_empty));
    }

    #[tokio::test]
    async fn test_failed_create_keeps_fields_and_replaces_status() {
        let controller = controller(EntityKind::Driver);
        let mut form = FormState::new(EntityKind::Driver);
        form.status = "anterior".to_string();
        form.set_field("name", "Marta Díaz");
        form.set_field("license_number", "1234567890");
        form.set_field("salary", "3200");

        assert_eq!(form.submit_create(&controller).await, None);
        assert_eq!(form.status, "Licencia inválida (11 dígitos).");
        assert_eq!(form.field("name"), "Marta Díaz");
    }

    #[tokio::test]
    async fn test_delete_unknown_id_is_soft_failure() {
        let controller = controller(EntityKind::Vehicle);
        let mut form = FormState::new(EntityKind::Vehicle);
        form.delete_id = "99".to_string();

        assert_eq!(form.submit_delete(&controller).await, Some(Outcome::NotFound));
        assert!(form.status.contains("no encontrado"));
    }
}
