pub mod usuario_repo;
pub use usuario_repo::UsuarioRepository;
pub mod sesion_repo;
pub use sesion_repo::SesionRepository;
pub mod solicitud_repo;
pub use solicitud_repo::SolicitudRepository;
pub mod inventario_repo;
pub use inventario_repo::InventarioRepository;
pub mod cotizacion_repo;
pub use cotizacion_repo::CotizacionRepository;
