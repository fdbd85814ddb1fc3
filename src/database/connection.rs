//! Conexión a PostgreSQL
//!
//! `DatabaseConnection` es el `Store` de producción: una única conexión
//! (pool de tamaño configurable, 1 por defecto) que vive todo el proceso o
//! hasta que el usuario pide reconectar.

use async_trait::async_trait;
use sqlx::{PgPool, Row};
use tracing::{debug, info};

use crate::config::database::DatabaseConfig;
use crate::database::query_builder::Statement;
use crate::database::store::{Store, StoreError, TableView};

pub struct DatabaseConnection {
    pool: PgPool,
}

impl DatabaseConnection {
    /// Abrir la conexión con la configuración dada
    pub async fn connect(config: &DatabaseConfig) -> Result<Self, StoreError> {
        let url = config
            .url
            .as_deref()
            .ok_or_else(|| StoreError::new("DATABASE_URL must be set for the postgres backend"))?;

        info!("🔌 Conectando a {}", mask_database_url(url));
        let pool = config.create_pool(url).await?;
        let connection = Self { pool };

        if config.run_migrations {
            connection.run_migrations().await?;
        }

        Ok(connection)
    }

    /// Ejecutar migraciones de la base de datos
    pub async fn run_migrations(&self) -> Result<(), StoreError> {
        info!("📜 Aplicando migraciones");
        sqlx::migrate!("./migrations").run(&self.pool).await?;
        Ok(())
    }
}

#[async_trait]
impl Store for DatabaseConnection {
    async fn execute(&self, statement: &Statement) -> Result<u64, StoreError> {
        debug!("SQL: {}", statement.sql());
        let mut qb = statement.to_query_builder();
        let result = qb.build().execute(&self.pool).await?;
        Ok(result.rows_affected())
    }

    async fn exists(&self, statement: &Statement) -> Result<bool, StoreError> {
        debug!("SQL: {}", statement.sql());
        let mut qb = statement.to_query_builder();
        let row = qb.build().fetch_optional(&self.pool).await?;
        Ok(row.is_some())
    }

    async fn select(&self, statement: &Statement) -> Result<TableView, StoreError> {
        let Statement::Select { columns, .. } = statement else {
            return Err(StoreError::new("listing expects a SELECT statement"));
        };

        debug!("SQL: {}", statement.sql());
        let mut qb = statement.to_query_builder();
        let rows = qb.build().fetch_all(&self.pool).await?;

        let mut view = TableView {
            columns: columns.iter().map(|c| c.to_string()).collect(),
            rows: Vec::with_capacity(rows.len()),
        };

        for row in rows {
            let mut cells = Vec::with_capacity(columns.len());
            for index in 0..columns.len() {
                let cell: Option<String> = row.try_get(index)?;
                cells.push(cell.unwrap_or_default());
            }
            view.rows.push(cells);
        }

        Ok(view)
    }

    fn backend_name(&self) -> &'static str {
        "postgres"
    }
}

/// Enmascarar las credenciales de la URL para los logs
fn mask_database_url(url: &str) -> String {
    let Some(at_pos) = url.find('@') else {
        return url.to_string();
    };
    if url[..at_pos].rfind(':').is_none() {
        return url.to_string();
    }
    let protocol_end = url.find("://").map(|p| p + 3).unwrap_or(0);
    format!("{}***:***@{}", &url[..protocol_end], &url[at_pos + 1..])
}
