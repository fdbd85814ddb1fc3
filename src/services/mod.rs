//! Servicios del sistema

pub mod reference_service;
