// src/services/cotizacion_service.rs

use sqlx::SqlitePool;

use crate::{
    common::error::AppError,
    db::CotizacionRepository,
    models::cotizacion::{Cotizacion, CotizacionResponse, EstadoCotizacion, ItemCotizacion},
    models::usuario::Usuario,
};

#[derive(Clone)]
pub struct CotizacionService {
    cotizacion_repo: CotizacionRepository,
    pool: SqlitePool,
}

impl CotizacionService {
    pub fn new(cotizacion_repo: CotizacionRepository, pool: SqlitePool) -> Self {
        Self {
            cotizacion_repo,
            pool,
        }
    }

    pub async fn create_cotizacion(
        &self,
        cliente_nombre: &str,
        cliente_email: Option<&str>,
        items: Vec<ItemCotizacion>,
        actor: &Usuario,
    ) -> Result<CotizacionResponse, AppError> {
        // El total lo calcula siempre el servidor, redondeado a centavos.
        let total: f64 = items
            .iter()
            .map(|item| item.cantidad as f64 * item.precio_unitario)
            .sum();
        let total = (total * 100.0).round() / 100.0;

        let items_json = serde_json::to_string(&items)
            .map_err(|e| anyhow::anyhow!("No se pudieron serializar las partidas: {}", e))?;

        let cotizacion = self
            .cotizacion_repo
            .create_cotizacion(
                &self.pool,
                cliente_nombre,
                cliente_email,
                &items_json,
                total,
                actor.id,
            )
            .await?;

        tracing::info!(
            "🧾 Cotización {} creada por un total de {}",
            cotizacion.id,
            cotizacion.total
        );
        Self::a_response(cotizacion)
    }

    pub async fn list_cotizaciones(&self) -> Result<Vec<CotizacionResponse>, AppError> {
        let cotizaciones = self.cotizacion_repo.list_all().await?;
        cotizaciones.into_iter().map(Self::a_response).collect()
    }

    pub async fn get_cotizacion(&self, id: i64) -> Result<CotizacionResponse, AppError> {
        let cotizacion = self
            .cotizacion_repo
            .find_by_id(id)
            .await?
            .ok_or(AppError::CotizacionNotFound)?;
        Self::a_response(cotizacion)
    }

    pub async fn update_estado(
        &self,
        id: i64,
        estado: EstadoCotizacion,
    ) -> Result<CotizacionResponse, AppError> {
        let cotizacion = self
            .cotizacion_repo
            .update_estado(&self.pool, id, estado)
            .await?
            .ok_or(AppError::CotizacionNotFound)?;
        Self::a_response(cotizacion)
    }

    // La fila cruda trae las partidas en JSON; acá se deserializan para el
    // cliente.
    fn a_response(cotizacion: Cotizacion) -> Result<CotizacionResponse, AppError> {
        let items: Vec<ItemCotizacion> = serde_json::from_str(&cotizacion.items).map_err(|e| {
            anyhow::anyhow!("Partidas corruptas en la cotización {}: {}", cotizacion.id, e)
        })?;

        Ok(CotizacionResponse {
            id: cotizacion.id,
            cliente_nombre: cotizacion.cliente_nombre,
            cliente_email: cotizacion.cliente_email,
            items,
            total: cotizacion.total,
            estado: cotizacion.estado,
            usuario_id: cotizacion.usuario_id,
            created_at: cotizacion.created_at,
            updated_at: cotizacion.updated_at,
        })
    }
}
