//! Shared application state
//!
//! Este módulo define el estado compartido que se pasa a través del router
//! de Axum y que usa también la consola. La conexión es única y opcional:
//! si no se pudo abrir, cada operación responde `NotConnected`.

use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{error, info};

use crate::config::environment::EnvironmentConfig;
use crate::controllers::form_controller::FormController;
use crate::database::{self, Store};
use crate::models::entity::EntityKind;
use crate::utils::errors::AppResult;

#[derive(Clone)]
pub struct AppState {
    pub config: EnvironmentConfig,
    connection: Arc<RwLock<Option<Arc<dyn Store>>>>,
}

impl AppState {
    pub fn new(config: EnvironmentConfig, store: Option<Arc<dyn Store>>) -> Self {
        Self {
            config,
            connection: Arc::new(RwLock::new(store)),
        }
    }

    /// Abrir la conexión configurada; un fallo deja el estado sin conexión
    pub async fn connect(config: EnvironmentConfig) -> Self {
        let store = match database::open_store(&config.database).await {
            Ok(store) => {
                info!("✅ Conectado al almacén {}", store.backend_name());
                Some(store)
            }
            Err(e) => {
                error!("❌ No se pudo conectar a la base de datos: {}", e);
                error!("⚠️ Las operaciones fallarán hasta que se reconecte");
                None
            }
        };
        Self::new(config, store)
    }

    pub async fn store(&self) -> Option<Arc<dyn Store>> {
        self.connection.read().await.clone()
    }

    pub async fn is_connected(&self) -> bool {
        self.connection.read().await.is_some()
    }

    /// Reabrir la conexión completa; la anterior se descarta
    pub async fn reconnect(&self) -> AppResult<&'static str> {
        let mut connection = self.connection.write().await;
        *connection = None;

        let store = database::open_store(&self.config.database).await?;
        let backend = store.backend_name();
        *connection = Some(store);

        info!("🔄 Reconectado al almacén {}", backend);
        Ok(backend)
    }

    pub async fn controller(&self, kind: EntityKind) -> FormController {
        FormController::new(kind, self.store().await)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::database::StoreBackend;
    use crate::utils::errors::AppError;

    fn memory_config() -> EnvironmentConfig {
        let mut config = EnvironmentConfig::default();
        config.database.backend = StoreBackend::Memory;
        config
    }

    #[tokio::test]
    async fn test_connect_memory_backend() {
        let state = AppState::connect(memory_config()).await;
        assert!(state.is_connected().await);
    }

    #[tokio::test]
    async fn test_failed_connection_degrades_to_not_connected() {
        // postgres sin DATABASE_URL no puede abrirse
        let state = AppState::connect(EnvironmentConfig::default()).await;
        assert!(!state.is_connected().await);

        let error = state.controller(EntityKind::Driver).await.list().await.unwrap_err();
        assert!(matches!(error, AppError::NotConnected));
        assert!(state.reconnect().await.is_err());
    }

    #[tokio::test]
    async fn test_reconnect_restores_connection() {
        let state = AppState::new(memory_config(), None);
        assert!(!state.is_connected().await);
        assert_eq!(state.reconnect().await.unwrap(), "memory");
        assert!(state.is_connected().await);
    }
}
