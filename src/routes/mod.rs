//! Rutas de la API
//!
//! Cada entidad tiene su router anidado en `/api/<slug>`; las rutas de
//! sistema (salud, conexión, metadatos) van aparte.

pub mod entity_routes;
pub mod system_routes;

use axum::Router;
use tower_http::trace::TraceLayer;

use crate::middleware::cors_layer;
use crate::models::entity::EntityKind;
use crate::state::AppState;

/// Router completo de la aplicación
pub fn create_router(state: AppState) -> Router {
    let cors = cors_layer(&state.config.cors_origins);

    let mut router = Router::new().merge(system_routes::create_system_router());
    for kind in EntityKind::ALL {
        router = router.nest(
            &format!("/api/{}", kind.slug()),
            entity_routes::create_entity_router(kind),
        );
    }

    router
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
