use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

// Nuestro tipo de error, con `thiserror` para mejor ergonomía.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Error de validación")]
    ValidationError(#[from] validator::ValidationErrors),

    #[error("Credenciales inválidas")]
    InvalidCredentials,

    // Cualquier falla de autenticación (token ausente, desconocido, vencido,
    // usuario inactivo) colapsa en esta variante: el cliente no recibe pistas
    // del motivo exacto.
    #[error("No autorizado")]
    Unauthorized,

    #[error("Rol insuficiente: se requiere '{0}'")]
    RolInsuficiente(&'static str),

    #[error("E-mail ya registrado")]
    EmailAlreadyExists,

    #[error("Empleado no encontrado")]
    EmpleadoNotFound,

    #[error("Empleado inactivo")]
    EmpleadoInactivo,

    #[error("Solicitud no encontrada")]
    SolicitudNotFound,

    #[error("Producto no encontrado")]
    ProductoNotFound,

    #[error("Stock insuficiente")]
    StockInsuficiente,

    #[error("Cantidad inválida")]
    CantidadInvalida,

    #[error("Reserva no encontrada")]
    ReservaNotFound,

    #[error("Reserva cerrada")]
    ReservaCerrada,

    #[error("Cotización no encontrada")]
    CotizacionNotFound,

    #[error("Contraseña actual incorrecta")]
    PasswordActualIncorrecta,

    // Variante para errores de base de datos (sqlx)
    #[error("Error de base de datos")]
    DatabaseError(#[from] sqlx::Error),

    // Variante genérica para cualquier otro error inesperado.
    // `anyhow::Error` captura el contexto del error original.
    #[error("Error interno del servidor")]
    InternalServerError(#[from] anyhow::Error),

    #[error("Error de Bcrypt: {0}")]
    BcryptError(#[from] bcrypt::BcryptError),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            // Devolvemos todos los detalles de la validación, campo por campo.
            AppError::ValidationError(errors) => {
                let mut details = std::collections::HashMap::new();
                for (field, field_errors) in errors.field_errors() {
                    let messages: Vec<String> = field_errors.iter()
                        .filter_map(|e| e.message.as_ref().map(|m| m.to_string()))
                        .collect();
                    details.insert(field.to_string(), messages);
                }
                let body = Json(json!({
                    "error": "Uno o más campos son inválidos.",
                    "details": details,
                }));
                return (StatusCode::BAD_REQUEST, body).into_response();
            }
            // El mensaje incluye el rol requerido, así que se arma aparte.
            AppError::RolInsuficiente(rol) => {
                let body = Json(json!({
                    "error": format!("Se requiere el rol '{rol}' para esta acción."),
                }));
                return (StatusCode::FORBIDDEN, body).into_response();
            }
            AppError::InvalidCredentials => (StatusCode::UNAUTHORIZED, "E-mail o contraseña inválidos."),
            AppError::Unauthorized => (StatusCode::UNAUTHORIZED, "Token de autenticación inválido o ausente."),
            AppError::EmailAlreadyExists => (StatusCode::CONFLICT, "Este e-mail ya está en uso."),
            AppError::EmpleadoNotFound => (StatusCode::NOT_FOUND, "Empleado no encontrado."),
            AppError::EmpleadoInactivo => (StatusCode::BAD_REQUEST, "El empleado está inactivo."),
            AppError::SolicitudNotFound => (StatusCode::NOT_FOUND, "Solicitud no encontrada."),
            AppError::ProductoNotFound => (StatusCode::NOT_FOUND, "Producto no encontrado."),
            AppError::StockInsuficiente => (StatusCode::BAD_REQUEST, "Stock insuficiente para la operación."),
            AppError::CantidadInvalida => (StatusCode::BAD_REQUEST, "La cantidad es inválida para esta operación."),
            AppError::ReservaNotFound => (StatusCode::NOT_FOUND, "Reserva no encontrada."),
            AppError::ReservaCerrada => (StatusCode::BAD_REQUEST, "La reserva ya está cerrada y no admite cambios."),
            AppError::CotizacionNotFound => (StatusCode::NOT_FOUND, "Cotización no encontrada."),
            AppError::PasswordActualIncorrecta => (StatusCode::BAD_REQUEST, "La contraseña actual es incorrecta."),

            // Todos los demás errores (DatabaseError, InternalServerError, BcryptError)
            // se vuelven 500. El `#[from]` ya hizo la conversión; acá solo decidimos
            // qué hacer con ellos. `tracing` registra el detalle, el cliente no lo ve.
            ref e => {
                tracing::error!("Error interno del servidor: {}", e);
                (StatusCode::INTERNAL_SERVER_ERROR, "Ocurrió un error inesperado.")
            }
        };

        // Respuesta estándar para errores simples que solo llevan un mensaje.
        let body = Json(json!({ "error": error_message }));
        (status, body).into_response()
    }
}
