//! Verificación de referencias
//!
//! Antes de crear o actualizar un registro con claves foráneas se comprueba
//! que la fila referenciada exista. La base de datos no impone FOREIGN KEY,
//! así que esta sonda es la única garantía.

use serde::Serialize;
use tracing::{debug, warn};

use crate::database::query_builder::Statement;
use crate::database::store::Store;
use crate::models::entity::EntityDescriptor;

/// Resultado de la sonda de existencia
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", content = "reason", rename_all = "snake_case")]
pub enum ReferenceCheck {
    Found,
    Missing,
    LookupFailed(String),
}

/// Comprobar si `target` tiene una fila con la clave `id`
///
/// `id` debe venir ya validado como entero.
pub async fn check_reference(store: &dyn Store, target: &EntityDescriptor, id: i64) -> ReferenceCheck {
    let probe = Statement::exists(target.table, target.key_column, id);

    match store.exists(&probe).await {
        Ok(true) => {
            debug!("🔗 {} {} existe", target.table, id);
            ReferenceCheck::Found
        }
        Ok(false) => {
            debug!("🔗 {} {} no existe", target.table, id);
            ReferenceCheck::Missing
        }
        Err(e) => {
            warn!("⚠️ Falló la sonda de {} {}: {}", target.table, id, e);
            ReferenceCheck::LookupFailed(e.to_string())
        }
    }
}

/// Sonda booleana: un fallo de consulta cuenta como "no existe"
pub async fn exists(store: &dyn Store, table: &'static str, key_column: &'static str, id: i64) -> bool {
    let probe = Statement::exists(table, key_column, id);
    store.exists(&probe).await.unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::memory::MemoryStore;
    use crate::database::query_builder::{InsertBuilder, SqlValue};
    use crate::database::store::{StoreError, TableView};
    use crate::models::entity::CLIENT;
    use async_trait::async_trait;

    struct BrokenStore;

    #[async_trait]
    impl Store for BrokenStore {
        async fn execute(&self, _: &Statement) -> Result<u64, StoreError> {
            Err(StoreError::new("connection reset"))
        }
        async fn exists(&self, _: &Statement) -> Result<bool, StoreError> {
            Err(StoreError::new("connection reset"))
        }
        async fn select(&self, _: &Statement) -> Result<TableView, StoreError> {
            Err(StoreError::new("connection reset"))
        }
        fn backend_name(&self) -> &'static str {
            "broken"
        }
    }

    #[tokio::test]
    async fn test_check_reference_found_and_missing() {
        let store = MemoryStore::new();
        let insert = InsertBuilder::new("client")
            .value("name", SqlValue::Text("Transportes Sur".to_string()))
            .build();
        store.execute(&insert).await.unwrap();

        assert_eq!(check_reference(&store, &CLIENT, 1).await, ReferenceCheck::Found);
        assert_eq!(check_reference(&store, &CLIENT, 2).await, ReferenceCheck::Missing);
        assert!(exists(&store, "client", "id", 1).await);
    }

    #[tokio::test]
    async fn test_lookup_failure_is_distinguished() {
        let result = check_reference(&BrokenStore, &CLIENT, 1).await;
        assert_eq!(result, ReferenceCheck::LookupFailed("connection reset".to_string()));
        assert!(!exists(&BrokenStore, "client", "id", 1).await);
    }
}
