// src/routes.rs

use axum::{
    routing::{get, post, put},
    Router,
};

use crate::config::AppState;
use crate::handlers;

/// Arma el árbol de rutas completo de la API.
///
/// El control de acceso no vive acá: cada handler protegido declara su
/// extractor (`AuthenticatedUser` o `RequireRol<...>`) y el router se
/// limita a mapear rutas. Las únicas rutas sin extractor de sesión son
/// el alta pública de solicitudes, el tracker y el health check.
pub fn crear_router(app_state: AppState) -> Router {
    // Solicitudes de servicio: el alta es pública, el resto pide sesión.
    let solicitud_routes = Router::new()
        .route("/"
               ,post(handlers::solicitudes::create_solicitud)
               .get(handlers::solicitudes::list_solicitudes)
        )
        .route("/{id}"
               ,put(handlers::solicitudes::update_solicitud)
        )
        .route("/{id}/asignar"
               ,post(handlers::solicitudes::asignar)
        );

    // Sesión del empleado autenticado.
    let empleado_routes = Router::new()
        .route("/login", post(handlers::auth::login))
        .route("/logout", post(handlers::auth::logout))
        .route("/verify", get(handlers::auth::verify))
        .route("/mis-solicitudes", get(handlers::solicitudes::mis_solicitudes))
        .route("/cambiar-password", put(handlers::auth::cambiar_password));

    // Administración de empleados (solo admin, vía RequireRol).
    let empleados_admin_routes = Router::new()
        .route("/"
               ,get(handlers::empleados::list_empleados)
               .post(handlers::empleados::create_empleado)
        )
        .route("/{id}"
               ,put(handlers::empleados::update_empleado)
        );

    let inventario_routes = Router::new()
        .route("/productos"
               ,get(handlers::inventario::list_productos)
               .post(handlers::inventario::create_producto)
        )
        .route("/productos/{id}"
               ,put(handlers::inventario::update_producto)
               .delete(handlers::inventario::delete_producto)
        )
        .route("/productos/{id}/movimientos"
               ,get(handlers::inventario::list_movimientos)
        )
        .route("/movimientos"
               ,post(handlers::inventario::registrar_movimiento)
        )
        .route("/reservas"
               ,get(handlers::inventario::list_reservas)
               .post(handlers::inventario::create_reserva)
        )
        .route("/reservas/{id}/estado"
               ,put(handlers::inventario::update_reserva_estado)
        );

    let cotizacion_routes = Router::new()
        .route("/"
               ,get(handlers::cotizaciones::list_cotizaciones)
               .post(handlers::cotizaciones::create_cotizacion)
        )
        .route("/{id}"
               ,get(handlers::cotizaciones::get_cotizacion)
        )
        .route("/{id}/estado"
               ,put(handlers::cotizaciones::update_estado)
        );

    // Combina todo en el router principal
    Router::new()
        .route("/api/health", get(|| async { "OK" }))
        .route("/api/tracker/{codigo}", get(handlers::solicitudes::tracker))
        .nest("/api/solicitudes", solicitud_routes)
        .nest("/api/empleado", empleado_routes)
        .nest("/api/empleados", empleados_admin_routes)
        .nest("/api/inventario", inventario_routes)
        .nest("/api/cotizaciones", cotizacion_routes)
        .with_state(app_state)
}
