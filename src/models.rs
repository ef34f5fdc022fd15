pub mod cotizacion;
pub mod inventario;
pub mod solicitud;
pub mod usuario;
