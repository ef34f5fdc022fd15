// src/db/cotizacion_repo.rs

use sqlx::{Executor, Sqlite, SqlitePool};

use crate::{
    common::error::AppError,
    models::cotizacion::{Cotizacion, EstadoCotizacion},
};

#[derive(Clone)]
pub struct CotizacionRepository {
    pool: SqlitePool,
}

impl CotizacionRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    // Las partidas ya llegan serializadas y el total ya viene calculado:
    // de eso se encarga el servicio.
    pub async fn create_cotizacion<'e, E>(
        &self,
        executor: E,
        cliente_nombre: &str,
        cliente_email: Option<&str>,
        items_json: &str,
        total: f64,
        usuario_id: i64,
    ) -> Result<Cotizacion, AppError>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let cotizacion = sqlx::query_as::<_, Cotizacion>(
            r#"
            INSERT INTO cotizaciones (cliente_nombre, cliente_email, items, total, usuario_id)
            VALUES (?, ?, ?, ?, ?)
            RETURNING *
            "#,
        )
        .bind(cliente_nombre)
        .bind(cliente_email)
        .bind(items_json)
        .bind(total)
        .bind(usuario_id)
        .fetch_one(executor)
        .await?;

        Ok(cotizacion)
    }

    pub async fn find_by_id(&self, id: i64) -> Result<Option<Cotizacion>, AppError> {
        let maybe = sqlx::query_as::<_, Cotizacion>("SELECT * FROM cotizaciones WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(maybe)
    }

    pub async fn list_all(&self) -> Result<Vec<Cotizacion>, AppError> {
        let cotizaciones = sqlx::query_as::<_, Cotizacion>(
            "SELECT * FROM cotizaciones ORDER BY id DESC",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(cotizaciones)
    }

    pub async fn update_estado<'e, E>(
        &self,
        executor: E,
        id: i64,
        estado: EstadoCotizacion,
    ) -> Result<Option<Cotizacion>, AppError>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let maybe = sqlx::query_as::<_, Cotizacion>(
            r#"
            UPDATE cotizaciones
            SET estado = ?, updated_at = datetime('now')
            WHERE id = ?
            RETURNING *
            "#,
        )
        .bind(estado)
        .bind(id)
        .fetch_optional(executor)
        .await?;
        Ok(maybe)
    }
}
