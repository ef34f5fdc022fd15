// src/models/inventario.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// Un producto del catálogo de llantas
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct Producto {
    pub id: i64,
    pub marca: String,
    pub modelo: String,
    pub medida: String,
    pub precio_compra: f64,
    pub precio_venta: f64,
    pub stock_actual: i64,
    pub stock_minimo: i64,
    pub stock_reservado: i64,
    pub proveedor: Option<String>,
    pub activo: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum TipoMovimiento {
    Entrada,
    Salida,
    Ajuste,
    Devolucion,
}

// Un movimiento de stock. `cantidad` es el delta CON signo que se
// aplicó a stock_actual, de modo que la suma de movimientos de un
// producto siempre reproduce su stock.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct MovimientoInventario {
    pub id: i64,
    pub producto_id: i64,
    pub tipo: TipoMovimiento,
    pub cantidad: i64,
    pub precio_unitario: Option<f64>,
    pub motivo: Option<String>,
    pub usuario_id: i64,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum EstadoReserva {
    Activa,
    Parcial,
    Completada,
    Expirada,
    Cancelada,
}

impl EstadoReserva {
    // Una reserva cerrada ya no puede cambiar de estado: su cantidad
    // ya fue liberada (o descontada) del stock reservado.
    pub fn es_terminal(&self) -> bool {
        matches!(
            self,
            EstadoReserva::Completada | EstadoReserva::Expirada | EstadoReserva::Cancelada
        )
    }
}

#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct Reserva {
    pub id: i64,
    pub producto_id: i64,
    pub cantidad: i64,
    pub cliente_nombre: String,
    pub cliente_telefono: Option<String>,
    pub estado: EstadoReserva,
    pub fecha_expiracion: Option<DateTime<Utc>>,
    pub usuario_id: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// Fila del listado de reservas con los datos del producto ya unidos
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct ReservaConProducto {
    pub id: i64,
    pub producto_id: i64,
    pub cantidad: i64,
    pub cliente_nombre: String,
    pub cliente_telefono: Option<String>,
    pub estado: EstadoReserva,
    pub fecha_expiracion: Option<DateTime<Utc>>,
    pub usuario_id: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub producto_marca: String,
    pub producto_modelo: String,
    pub producto_medida: String,
}
