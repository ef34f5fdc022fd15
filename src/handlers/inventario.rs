// src/handlers/inventario.rs

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use validator::{Validate, ValidationError};

use crate::{
    common::error::AppError,
    config::AppState,
    middleware::auth::AuthenticatedUser,
    models::inventario::{EstadoReserva, TipoMovimiento},
};

// ---
// Validaciones customizadas
// ---
fn validate_no_negativo(val: f64) -> Result<(), ValidationError> {
    if val < 0.0 {
        let mut err = ValidationError::new("range");
        err.add_param("min".into(), &0.0);
        err.message = Some("El valor no puede ser negativo.".into());
        return Err(err);
    }
    Ok(())
}

fn validate_positivo(val: f64) -> Result<(), ValidationError> {
    if val <= 0.0 {
        let mut err = ValidationError::new("range");
        err.add_param("exclusive_min".into(), &0.0);
        err.message = Some("El valor debe ser mayor que cero.".into());
        return Err(err);
    }
    Ok(())
}

// ---
// Handler: list_productos
// ---
pub async fn list_productos(
    State(app_state): State<AppState>,
    _user: AuthenticatedUser,
) -> Result<impl IntoResponse, AppError> {
    let productos = app_state.inventario_service.list_productos().await?;
    Ok(Json(productos))
}

// ---
// Payload: CreateProducto
// ---
#[derive(Debug, Deserialize, Validate)]
pub struct CreateProductoPayload {
    #[validate(length(min = 1, message = "La marca es obligatoria."))]
    pub marca: String,

    #[validate(length(min = 1, message = "El modelo es obligatorio."))]
    pub modelo: String,

    #[validate(length(min = 1, message = "La medida es obligatoria."))]
    pub medida: String,

    // Si el JSON no trae precio de compra, asume 0.
    #[validate(custom(function = "validate_no_negativo"))]
    #[serde(default)]
    pub precio_compra: f64,

    #[validate(custom(function = "validate_positivo"))]
    pub precio_venta: f64,

    #[validate(range(min = 0, message = "El stock inicial no puede ser negativo."))]
    #[serde(default)]
    pub stock_actual: i64,

    #[validate(range(min = 0, message = "El stock mínimo no puede ser negativo."))]
    #[serde(default)]
    pub stock_minimo: i64,

    pub proveedor: Option<String>,
}

// ---
// Handler: create_producto
// ---
pub async fn create_producto(
    State(app_state): State<AppState>,
    AuthenticatedUser(actor): AuthenticatedUser,
    Json(payload): Json<CreateProductoPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate().map_err(AppError::ValidationError)?;

    let producto = app_state
        .inventario_service
        .create_producto(
            &payload.marca,
            &payload.modelo,
            &payload.medida,
            payload.precio_compra,
            payload.precio_venta,
            payload.stock_actual,
            payload.stock_minimo,
            payload.proveedor.as_deref(),
            &actor,
        )
        .await?;

    Ok((StatusCode::CREATED, Json(producto)))
}

// ---
// Payload: UpdateProducto (parcial)
// ---
// Si viene stock_actual, el servicio lo registra como un movimiento de
// ajuste para que el kardex nunca pierda la cuenta.
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateProductoPayload {
    #[validate(length(min = 1, message = "La marca no puede quedar vacía."))]
    pub marca: Option<String>,

    #[validate(length(min = 1, message = "El modelo no puede quedar vacío."))]
    pub modelo: Option<String>,

    #[validate(length(min = 1, message = "La medida no puede quedar vacía."))]
    pub medida: Option<String>,

    #[validate(custom(function = "validate_no_negativo"))]
    pub precio_compra: Option<f64>,

    #[validate(custom(function = "validate_positivo"))]
    pub precio_venta: Option<f64>,

    #[validate(range(min = 0, message = "El stock no puede ser negativo."))]
    pub stock_actual: Option<i64>,

    #[validate(range(min = 0, message = "El stock mínimo no puede ser negativo."))]
    pub stock_minimo: Option<i64>,

    pub proveedor: Option<String>,
}

// ---
// Handler: update_producto
// ---
pub async fn update_producto(
    State(app_state): State<AppState>,
    Path(id): Path<i64>,
    AuthenticatedUser(actor): AuthenticatedUser,
    Json(payload): Json<UpdateProductoPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate().map_err(AppError::ValidationError)?;

    let producto = app_state
        .inventario_service
        .update_producto(
            id,
            payload.marca,
            payload.modelo,
            payload.medida,
            payload.precio_compra,
            payload.precio_venta,
            payload.stock_actual,
            payload.stock_minimo,
            payload.proveedor,
            &actor,
        )
        .await?;

    Ok(Json(producto))
}

// ---
// Handler: delete_producto (baja lógica)
// ---
pub async fn delete_producto(
    State(app_state): State<AppState>,
    Path(id): Path<i64>,
    _user: AuthenticatedUser,
) -> Result<impl IntoResponse, AppError> {
    app_state.inventario_service.delete_producto(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// ---
// Handler: list_movimientos (kardex de un producto)
// ---
pub async fn list_movimientos(
    State(app_state): State<AppState>,
    Path(id): Path<i64>,
    _user: AuthenticatedUser,
) -> Result<impl IntoResponse, AppError> {
    let movimientos = app_state.inventario_service.list_movimientos(id).await?;
    Ok(Json(movimientos))
}

// ---
// Payload: RegistrarMovimiento
// ---
// La cantidad no lleva validador: el signo permitido depende del tipo de
// movimiento y esa regla vive en el servicio.
#[derive(Debug, Deserialize, Validate)]
pub struct RegistrarMovimientoPayload {
    pub producto_id: i64,
    pub tipo: TipoMovimiento,
    pub cantidad: i64,

    #[validate(custom(function = "validate_no_negativo"))]
    pub precio_unitario: Option<f64>,

    pub motivo: Option<String>,
}

// ---
// Handler: registrar_movimiento
// ---
pub async fn registrar_movimiento(
    State(app_state): State<AppState>,
    AuthenticatedUser(actor): AuthenticatedUser,
    Json(payload): Json<RegistrarMovimientoPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate().map_err(AppError::ValidationError)?;

    let movimiento = app_state
        .inventario_service
        .registrar_movimiento(
            payload.producto_id,
            payload.tipo,
            payload.cantidad,
            payload.precio_unitario,
            payload.motivo.as_deref(),
            &actor,
        )
        .await?;

    Ok((StatusCode::CREATED, Json(movimiento)))
}

// ---
// Handler: list_reservas
// ---
pub async fn list_reservas(
    State(app_state): State<AppState>,
    _user: AuthenticatedUser,
) -> Result<impl IntoResponse, AppError> {
    let reservas = app_state.inventario_service.list_reservas().await?;
    Ok(Json(reservas))
}

// ---
// Payload: CreateReserva
// ---
#[derive(Debug, Deserialize, Validate)]
pub struct CreateReservaPayload {
    pub producto_id: i64,

    #[validate(range(min = 1, message = "La cantidad a reservar debe ser al menos 1."))]
    pub cantidad: i64,

    #[validate(length(min = 1, message = "El nombre del cliente es obligatorio."))]
    pub cliente_nombre: String,

    pub cliente_telefono: Option<String>,
    pub fecha_expiracion: Option<DateTime<Utc>>,
}

// ---
// Handler: create_reserva
// ---
pub async fn create_reserva(
    State(app_state): State<AppState>,
    AuthenticatedUser(actor): AuthenticatedUser,
    Json(payload): Json<CreateReservaPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate().map_err(AppError::ValidationError)?;

    let reserva = app_state
        .inventario_service
        .create_reserva(
            payload.producto_id,
            payload.cantidad,
            &payload.cliente_nombre,
            payload.cliente_telefono.as_deref(),
            payload.fecha_expiracion,
            &actor,
        )
        .await?;

    Ok((StatusCode::CREATED, Json(reserva)))
}

// ---
// Payload: UpdateReservaEstado
// ---
// El estado llega como enum: serde ya rechaza cualquier valor desconocido.
#[derive(Debug, Deserialize)]
pub struct UpdateReservaEstadoPayload {
    pub estado: EstadoReserva,
}

// ---
// Handler: update_reserva_estado
// ---
pub async fn update_reserva_estado(
    State(app_state): State<AppState>,
    Path(id): Path<i64>,
    AuthenticatedUser(actor): AuthenticatedUser,
    Json(payload): Json<UpdateReservaEstadoPayload>,
) -> Result<impl IntoResponse, AppError> {
    let reserva = app_state
        .inventario_service
        .update_reserva_estado(id, payload.estado, &actor)
        .await?;

    Ok(Json(reserva))
}
