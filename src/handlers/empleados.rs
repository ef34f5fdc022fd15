// src/handlers/empleados.rs

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
    middleware::auth::{RequireRol, RolAdmin},
    models::usuario::Rol,
};

// ---
// Handler: list_empleados (solo admin)
// ---
// El hash de contraseña nunca sale: el modelo lo excluye al serializar.
pub async fn list_empleados(
    State(app_state): State<AppState>,
    _guard: RequireRol<RolAdmin>,
) -> Result<impl IntoResponse, AppError> {
    let empleados = app_state.empleado_service.list_empleados().await?;
    Ok(Json(empleados))
}

// ---
// Payload: CreateEmpleado
// ---
#[derive(Debug, Deserialize, Validate)]
pub struct CreateEmpleadoPayload {
    #[validate(email(message = "El e-mail proporcionado es inválido."))]
    pub email: String,

    #[validate(length(min = 6, message = "La contraseña debe tener al menos 6 caracteres."))]
    pub password: String,

    #[validate(length(min = 1, message = "El nombre es obligatorio."))]
    pub nombre: String,

    pub rol: Rol,
}

// ---
// Handler: create_empleado (solo admin)
// ---
pub async fn create_empleado(
    State(app_state): State<AppState>,
    _guard: RequireRol<RolAdmin>,
    Json(payload): Json<CreateEmpleadoPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate().map_err(AppError::ValidationError)?;

    let empleado = app_state
        .empleado_service
        .create_empleado(&payload.email, &payload.password, &payload.nombre, payload.rol)
        .await?;

    Ok((StatusCode::CREATED, Json(empleado)))
}

// ---
// Payload: UpdateEmpleado (parcial: lo ausente no cambia)
// ---
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateEmpleadoPayload {
    #[validate(length(min = 1, message = "El nombre no puede quedar vacío."))]
    pub nombre: Option<String>,

    #[validate(email(message = "El e-mail proporcionado es inválido."))]
    pub email: Option<String>,

    pub rol: Option<Rol>,
    pub activo: Option<bool>,

    #[validate(length(min = 6, message = "La contraseña debe tener al menos 6 caracteres."))]
    pub password: Option<String>,
}

// ---
// Handler: update_empleado (solo admin)
// ---
pub async fn update_empleado(
    State(app_state): State<AppState>,
    Path(id): Path<i64>,
    _guard: RequireRol<RolAdmin>,
    Json(payload): Json<UpdateEmpleadoPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate().map_err(AppError::ValidationError)?;

    let empleado = app_state
        .empleado_service
        .update_empleado(
            id,
            payload.nombre,
            payload.email,
            payload.rol,
            payload.activo,
            payload.password,
        )
        .await?;

    Ok(Json(empleado))
}
