// src/models/cotizacion.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum EstadoCotizacion {
    Pendiente,
    Enviada,
    Aceptada,
    Rechazada,
}

// Una partida de la cotización. Se guarda serializada en la columna
// `items` y el total lo calcula siempre el servidor.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ItemCotizacion {
    #[validate(length(min = 1, message = "La descripción de la partida es obligatoria."))]
    pub descripcion: String,
    #[validate(range(min = 1, message = "La cantidad debe ser al menos 1."))]
    pub cantidad: i64,
    #[validate(range(min = 0.0, message = "El precio unitario no puede ser negativo."))]
    pub precio_unitario: f64,
}

// La fila cruda de la base de datos, con los items todavía en JSON
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct Cotizacion {
    pub id: i64,
    pub cliente_nombre: String,
    pub cliente_email: Option<String>,
    pub items: String,
    pub total: f64,
    pub estado: EstadoCotizacion,
    pub usuario_id: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// Lo que ve el cliente: las partidas ya deserializadas
#[derive(Debug, Clone, Serialize)]
pub struct CotizacionResponse {
    pub id: i64,
    pub cliente_nombre: String,
    pub cliente_email: Option<String>,
    pub items: Vec<ItemCotizacion>,
    pub total: f64,
    pub estado: EstadoCotizacion,
    pub usuario_id: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
