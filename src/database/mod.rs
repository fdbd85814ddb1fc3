//! Módulo de base de datos
//!
//! Maneja la construcción de sentencias y los almacenes que las ejecutan
//! (PostgreSQL o memoria).

pub mod connection;
pub mod memory;
pub mod query_builder;
pub mod store;

use std::sync::Arc;

use crate::config::database::{DatabaseConfig, StoreBackend};

pub use connection::DatabaseConnection;
pub use memory::MemoryStore;
pub use query_builder::{InsertBuilder, SqlValue, Statement, UpdateBuilder};
pub use store::{Store, StoreError, TableView};

/// Abrir el almacén configurado
pub async fn open_store(config: &DatabaseConfig) -> Result<Arc<dyn Store>, StoreError> {
    match config.backend {
        StoreBackend::Postgres => Ok(Arc::new(DatabaseConnection::connect(config).await?)),
        StoreBackend::Memory => Ok(Arc::new(MemoryStore::new())),
    }
}
