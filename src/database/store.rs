//! Contrato con el almacén relacional
//!
//! El núcleo no habla directamente con PostgreSQL: envía `Statement`s a un
//! `Store`, que devuelve filas afectadas, resultados de existencia o una tabla
//! de texto para los listados.

use async_trait::async_trait;
use serde::Serialize;
use thiserror::Error;

use crate::database::query_builder::Statement;

/// Error del almacén con el texto literal del driver
#[derive(Error, Debug, Clone, PartialEq)]
#[error("{0}")]
pub struct StoreError(pub String);

impl StoreError {
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }
}

impl From<sqlx::Error> for StoreError {
    fn from(error: sqlx::Error) -> Self {
        match error {
            sqlx::Error::Database(db_error) => Self(db_error.message().to_string()),
            other => Self(other.to_string()),
        }
    }
}

impl From<sqlx::migrate::MigrateError> for StoreError {
    fn from(error: sqlx::migrate::MigrateError) -> Self {
        Self(error.to_string())
    }
}

/// Resultado tabular de un listado: nombres de columna y filas en texto
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TableView {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl TableView {
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Valor de una celda por nombre de columna
    pub fn cell(&self, row: usize, column: &str) -> Option<&str> {
        let index = self.columns.iter().position(|c| c == column)?;
        self.rows.get(row)?.get(index).map(String::as_str)
    }
}

#[async_trait]
pub trait Store: Send + Sync {
    /// Ejecutar INSERT/UPDATE/DELETE y devolver las filas afectadas
    async fn execute(&self, statement: &Statement) -> Result<u64, StoreError>;

    /// Sonda de existencia de una fila
    async fn exists(&self, statement: &Statement) -> Result<bool, StoreError>;

    /// Ejecutar un SELECT y devolver todas las filas como texto
    async fn select(&self, statement: &Statement) -> Result<TableView, StoreError>;

    /// Nombre del backend para logs y diagnóstico
    fn backend_name(&self) -> &'static str;
}
