//! Gestión de transportes
//!
//! Núcleo compartido por el servidor HTTP y la consola: validación de
//! campos, construcción de sentencias, verificación de referencias y el
//! controlador genérico de formularios para conductores, vehículos,
//! clientes, cargas, rutas y mantenimientos.

pub mod config;
pub mod controllers;
pub mod database;
pub mod dto;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod state;
pub mod utils;

use tracing_subscriber::EnvFilter;

/// Configurar logging con `RUST_LOG`, o con `default_level` si no está definido
pub fn init_tracing(default_level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}
