pub mod auth;
pub use auth::AuthService;
pub mod solicitud_service;
pub use solicitud_service::SolicitudService;
pub mod empleado_service;
pub use empleado_service::EmpleadoService;
pub mod inventario_service;
pub use inventario_service::InventarioService;
pub mod cotizacion_service;
pub use cotizacion_service::CotizacionService;
