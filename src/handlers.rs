pub mod auth;
pub mod cotizaciones;
pub mod empleados;
pub mod inventario;
pub mod solicitudes;
