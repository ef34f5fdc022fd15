// src/handlers/cotizaciones.rs

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
    middleware::auth::AuthenticatedUser,
    models::cotizacion::{EstadoCotizacion, ItemCotizacion},
};

// ---
// Payload: CreateCotizacion
// ---
#[derive(Debug, Deserialize, Validate)]
pub struct CreateCotizacionPayload {
    #[validate(length(min = 1, message = "El nombre del cliente es obligatorio."))]
    pub cliente_nombre: String,

    #[validate(email(message = "El e-mail proporcionado es inválido."))]
    pub cliente_email: Option<String>,

    #[validate(length(min = 1, message = "La cotización necesita al menos una partida."), nested)]
    pub items: Vec<ItemCotizacion>,
}

// ---
// Handler: create_cotizacion
// ---
// El total no se acepta del cliente: lo calcula el servicio a partir de
// las partidas.
pub async fn create_cotizacion(
    State(app_state): State<AppState>,
    AuthenticatedUser(actor): AuthenticatedUser,
    Json(payload): Json<CreateCotizacionPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate().map_err(AppError::ValidationError)?;

    let cotizacion = app_state
        .cotizacion_service
        .create_cotizacion(
            &payload.cliente_nombre,
            payload.cliente_email.as_deref(),
            payload.items,
            &actor,
        )
        .await?;

    Ok((StatusCode::CREATED, Json(cotizacion)))
}

// ---
// Handler: list_cotizaciones
// ---
pub async fn list_cotizaciones(
    State(app_state): State<AppState>,
    _user: AuthenticatedUser,
) -> Result<impl IntoResponse, AppError> {
    let cotizaciones = app_state.cotizacion_service.list_cotizaciones().await?;
    Ok(Json(cotizaciones))
}

// ---
// Handler: get_cotizacion
// ---
pub async fn get_cotizacion(
    State(app_state): State<AppState>,
    Path(id): Path<i64>,
    _user: AuthenticatedUser,
) -> Result<impl IntoResponse, AppError> {
    let cotizacion = app_state.cotizacion_service.get_cotizacion(id).await?;
    Ok(Json(cotizacion))
}

// ---
// Payload: UpdateEstadoCotizacion
// ---
// El estado llega como enum: serde ya rechaza cualquier valor desconocido.
#[derive(Debug, Deserialize)]
pub struct UpdateEstadoCotizacionPayload {
    pub estado: EstadoCotizacion,
}

// ---
// Handler: update_estado
// ---
pub async fn update_estado(
    State(app_state): State<AppState>,
    Path(id): Path<i64>,
    _user: AuthenticatedUser,
    Json(payload): Json<UpdateEstadoCotizacionPayload>,
) -> Result<impl IntoResponse, AppError> {
    let cotizacion = app_state
        .cotizacion_service
        .update_estado(id, payload.estado)
        .await?;

    Ok(Json(cotizacion))
}
