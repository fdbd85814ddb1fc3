//! Utilidades del sistema
//!
//! Este módulo contiene el manejo de errores y las validaciones de campo.

pub mod errors;
pub mod validation;
