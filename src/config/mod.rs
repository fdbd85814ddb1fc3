//! Configuración del proyecto
//!
//! Este módulo contiene la configuración del almacén y las variables de
//! entorno del servidor y de la consola.

pub mod database;
pub mod environment;

pub use database::{DatabaseConfig, StoreBackend};
pub use environment::EnvironmentConfig;
