use anyhow::Result;
use dotenvy::dotenv;
use std::net::SocketAddr;
use tokio::signal;
use tracing::{error, info};

use transport_records::config::EnvironmentConfig;
use transport_records::models::EntityKind;
use transport_records::routes::create_router;
use transport_records::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Cargar variables de entorno
    dotenv().ok();

    // Configurar logging
    transport_records::init_tracing("info");

    info!("🚚 Sistema de Gestión de Transportes - API");
    info!("==========================================");

    let config = EnvironmentConfig::from_env()?;
    info!("⚙️ Entorno: {} - almacén: {}", config.environment, config.database.backend.as_str());
    if config.is_development() && config.cors_origins.is_empty() {
        info!("🛠️ Modo desarrollo: CORS abierto a cualquier origen");
    }

    // Sin conexión el servidor arranca igual y cada operación lo informa
    let state = AppState::connect(config.clone()).await;
    let app = create_router(state);

    let addr: SocketAddr = config.server_url().parse()?;

    info!("🌐 Servidor iniciando en http://{}", addr);
    info!("🔍 Endpoints disponibles:");
    info!("   GET  /health - Estado del servicio");
    info!("   GET  /api/entities - Formularios disponibles");
    info!("   GET  /api/connection - Estado de la conexión");
    info!("   POST /api/connection/reconnect - Reabrir la conexión");
    for kind in EntityKind::ALL {
        info!("📋 {}:", kind.descriptor().label);
        info!("   POST   /api/{} - Registrar", kind.slug());
        info!("   GET    /api/{} - Listar", kind.slug());
        info!("   PUT    /api/{}/:id - Actualizar", kind.slug());
        info!("   DELETE /api/{}/:id - Eliminar", kind.slug());
    }

    let listener = tokio::net::TcpListener::bind(addr).await?;
    if let Err(e) = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
    {
        error!("❌ Error del servidor: {}", e);
        return Err(e.into());
    }

    info!("👋 Servidor terminado");
    Ok(())
}

/// Señal de apagado graceful
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("❌ No se pudo instalar el manejador de Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                error!("❌ No se pudo instalar el manejador de SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("🛑 Señal Ctrl+C recibida, apagando servidor...");
        },
        _ = terminate => {
            info!("🛑 Señal de terminación recibida, apagando servidor...");
        },
    }
}
