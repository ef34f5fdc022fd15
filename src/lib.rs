//! Backend de la llantera: solicitudes de servicio con tracker público,
//! sesiones de empleados, inventario con kardex y cotizaciones.
//!
//! Expone los módulos como biblioteca para que los tests de integración
//! y el binario compartan el mismo router y estado.

pub mod common;
pub mod config;
pub mod db;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
