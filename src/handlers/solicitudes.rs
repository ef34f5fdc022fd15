// src/handlers/solicitudes.rs

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde::Deserialize;
use validator::Validate;

use crate::{
    common::error::AppError,
    config::AppState,
    middleware::auth::{AuthenticatedUser, RequireRol, RolAdmin},
    models::solicitud::{EstadoSolicitud, Urgencia},
};

// ---
// Payload: CreateSolicitud (alta pública, sin autenticación)
// ---
#[derive(Debug, Deserialize, Validate)]
pub struct CreateSolicitudPayload {
    #[validate(length(min = 1, message = "El nombre es obligatorio."))]
    pub proveedor_nombre: String,

    #[validate(email(message = "El e-mail proporcionado es inválido."))]
    pub proveedor_email: String,

    pub proveedor_telefono: Option<String>,

    #[validate(length(min = 1, message = "El tipo de servicio es obligatorio."))]
    pub tipo_servicio: String,

    #[validate(length(min = 1, message = "La descripción es obligatoria."))]
    pub descripcion: String,

    // Si no viene, la solicitud entra con urgencia 'media'.
    pub urgencia: Option<Urgencia>,
}

// ---
// Handler: create_solicitud
// ---
pub async fn create_solicitud(
    State(app_state): State<AppState>,
    Json(payload): Json<CreateSolicitudPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate().map_err(AppError::ValidationError)?;

    let solicitud = app_state
        .solicitud_service
        .create_solicitud(
            &payload.proveedor_nombre,
            &payload.proveedor_email,
            payload.proveedor_telefono.as_deref(),
            &payload.tipo_servicio,
            &payload.descripcion,
            payload.urgencia.unwrap_or(Urgencia::Media),
        )
        .await?;

    Ok((StatusCode::CREATED, Json(solicitud)))
}

// ---
// Handler: list_solicitudes (portal, cualquier empleado autenticado)
// ---
pub async fn list_solicitudes(
    State(app_state): State<AppState>,
    _user: AuthenticatedUser,
) -> Result<impl IntoResponse, AppError> {
    let solicitudes = app_state.solicitud_service.list_solicitudes().await?;
    Ok(Json(solicitudes))
}

// ---
// Payload: UpdateSolicitud
// ---
// El estado llega como enum: serde ya rechaza cualquier valor desconocido.
#[derive(Debug, Deserialize)]
pub struct UpdateSolicitudPayload {
    pub estado: EstadoSolicitud,
    pub notas_taller: Option<String>,
}

// ---
// Handler: update_solicitud
// ---
pub async fn update_solicitud(
    State(app_state): State<AppState>,
    Path(id): Path<i64>,
    AuthenticatedUser(usuario): AuthenticatedUser,
    Json(payload): Json<UpdateSolicitudPayload>,
) -> Result<impl IntoResponse, AppError> {
    let solicitud = app_state
        .solicitud_service
        .update_solicitud(id, payload.estado, payload.notas_taller.as_deref(), &usuario)
        .await?;

    Ok(Json(solicitud))
}

// ---
// Handler: tracker (consulta pública por código)
// ---
pub async fn tracker(
    State(app_state): State<AppState>,
    Path(codigo): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let respuesta = app_state.solicitud_service.tracker(&codigo).await?;
    Ok(Json(respuesta))
}

// ---
// Payload: Asignar
// ---
#[derive(Debug, Deserialize)]
pub struct AsignarPayload {
    pub empleado_id: i64,
    pub notas: Option<String>,
}

// ---
// Handler: asignar (solo admin)
// ---
pub async fn asignar(
    State(app_state): State<AppState>,
    Path(id): Path<i64>,
    RequireRol(actor, _): RequireRol<RolAdmin>,
    Json(payload): Json<AsignarPayload>,
) -> Result<impl IntoResponse, AppError> {
    let asignacion = app_state
        .solicitud_service
        .asignar(id, payload.empleado_id, payload.notas.as_deref(), &actor)
        .await?;

    Ok(Json(asignacion))
}

// ---
// Handler: mis_solicitudes (lo asignado al usuario autenticado)
// ---
pub async fn mis_solicitudes(
    State(app_state): State<AppState>,
    AuthenticatedUser(usuario): AuthenticatedUser,
) -> Result<impl IntoResponse, AppError> {
    let solicitudes = app_state
        .solicitud_service
        .mis_solicitudes(usuario.id)
        .await?;
    Ok(Json(solicitudes))
}
