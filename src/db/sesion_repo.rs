// src/db/sesion_repo.rs

use chrono::{DateTime, Utc};
use sqlx::{Executor, Sqlite, SqlitePool};

use crate::{
    common::error::AppError,
    models::usuario::{Sesion, Usuario},
};

// Fila del lookup de autenticación: la sesión y su usuario en un solo viaje.
#[derive(Debug, sqlx::FromRow)]
pub struct SesionConUsuario {
    pub expires_at: DateTime<Utc>,
    #[sqlx(flatten)]
    pub usuario: Usuario,
}

#[derive(Clone)]
pub struct SesionRepository {
    pool: SqlitePool,
}

impl SesionRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn create_sesion<'e, E>(
        &self,
        executor: E,
        usuario_id: i64,
        token: &str,
        expires_at: DateTime<Utc>,
    ) -> Result<Sesion, AppError>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let sesion = sqlx::query_as::<_, Sesion>(
            r#"
            INSERT INTO sesiones (token, usuario_id, expires_at)
            VALUES (?, ?, ?)
            RETURNING *
            "#,
        )
        .bind(token)
        .bind(usuario_id)
        .bind(expires_at)
        .fetch_one(executor)
        .await?;

        Ok(sesion)
    }

    // La consulta de cada request autenticado. No filtra por vencimiento:
    // el vencimiento se decide en Rust, contra el reloj del proceso.
    pub async fn find_por_token(&self, token: &str) -> Result<Option<SesionConUsuario>, AppError> {
        let maybe = sqlx::query_as::<_, SesionConUsuario>(
            r#"
            SELECT
                u.id, u.email, u.password_hash, u.nombre, u.rol, u.activo, u.created_at,
                s.expires_at
            FROM sesiones s
            INNER JOIN usuarios u ON u.id = s.usuario_id
            WHERE s.token = ?
            "#,
        )
        .bind(token)
        .fetch_optional(&self.pool)
        .await?;
        Ok(maybe)
    }

    // Borra la sesión del token dado. Idempotente: 0 filas no es un error.
    pub async fn delete_por_token(&self, token: &str) -> Result<u64, AppError> {
        let result = sqlx::query("DELETE FROM sesiones WHERE token = ?")
            .bind(token)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected())
    }

    // Poda perezosa: en cada login se borran las sesiones ya vencidas del
    // mismo usuario, acotando el crecimiento de la tabla.
    pub async fn delete_expiradas_de<'e, E>(
        &self,
        executor: E,
        usuario_id: i64,
        ahora: DateTime<Utc>,
    ) -> Result<u64, AppError>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let result = sqlx::query("DELETE FROM sesiones WHERE usuario_id = ? AND expires_at < ?")
            .bind(usuario_id)
            .bind(ahora)
            .execute(executor)
            .await?;
        Ok(result.rows_affected())
    }
}
