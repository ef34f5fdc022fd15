// src/db/usuario_repo.rs

use sqlx::{Executor, Sqlite, SqlitePool};

use crate::{
    common::error::AppError,
    models::usuario::{Rol, Usuario},
};

// El repositorio de usuarios, responsable de todas las interacciones
// con la tabla 'usuarios'.
#[derive(Clone)]
pub struct UsuarioRepository {
    pool: SqlitePool,
}

impl UsuarioRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    // Busca un usuario por su e-mail.
    pub async fn find_by_email(&self, email: &str) -> Result<Option<Usuario>, AppError> {
        let maybe_usuario = sqlx::query_as::<_, Usuario>(
            "SELECT * FROM usuarios WHERE email = ?",
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;
        Ok(maybe_usuario)
    }

    // Busca un usuario por su ID.
    pub async fn find_by_id(&self, id: i64) -> Result<Option<Usuario>, AppError> {
        let maybe_usuario = sqlx::query_as::<_, Usuario>(
            "SELECT * FROM usuarios WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(maybe_usuario)
    }

    pub async fn list_all(&self) -> Result<Vec<Usuario>, AppError> {
        let usuarios = sqlx::query_as::<_, Usuario>(
            "SELECT * FROM usuarios ORDER BY nombre ASC",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(usuarios)
    }

    // Cuántos admins hay; lo usa el arranque para avisar si no existe ninguno.
    pub async fn count_admins(&self) -> Result<i64, AppError> {
        let total = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM usuarios WHERE rol = 'admin'",
        )
        .fetch_one(&self.pool)
        .await?;
        Ok(total)
    }

    // Crea un nuevo usuario, con tratamiento específico para e-mails duplicados.
    pub async fn create_usuario<'e, E>(
        &self,
        executor: E,
        email: &str,
        password_hash: &str,
        nombre: &str,
        rol: Rol,
    ) -> Result<Usuario, AppError>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let usuario = sqlx::query_as::<_, Usuario>(
            r#"
            INSERT INTO usuarios (email, password_hash, nombre, rol)
            VALUES (?, ?, ?, ?)
            RETURNING *
            "#,
        )
        .bind(email)
        .bind(password_hash)
        .bind(nombre)
        .bind(rol)
        .fetch_one(executor)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(db_err) = &e {
                // El único UNIQUE de la tabla es el del e-mail.
                if db_err.is_unique_violation() {
                    return AppError::EmailAlreadyExists;
                }
            }
            e.into()
        })?;

        Ok(usuario)
    }

    // Actualiza los datos del empleado. El servicio ya mezcló los campos
    // parciales con la fila existente: acá llegan los valores finales.
    pub async fn update_usuario<'e, E>(
        &self,
        executor: E,
        id: i64,
        nombre: &str,
        email: &str,
        rol: Rol,
        activo: bool,
    ) -> Result<Option<Usuario>, AppError>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let maybe_usuario = sqlx::query_as::<_, Usuario>(
            r#"
            UPDATE usuarios
            SET nombre = ?, email = ?, rol = ?, activo = ?
            WHERE id = ?
            RETURNING *
            "#,
        )
        .bind(nombre)
        .bind(email)
        .bind(rol)
        .bind(activo)
        .bind(id)
        .fetch_optional(executor)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(db_err) = &e {
                if db_err.is_unique_violation() {
                    return AppError::EmailAlreadyExists;
                }
            }
            e.into()
        })?;

        Ok(maybe_usuario)
    }

    pub async fn update_password<'e, E>(
        &self,
        executor: E,
        id: i64,
        password_hash: &str,
    ) -> Result<u64, AppError>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let result = sqlx::query("UPDATE usuarios SET password_hash = ? WHERE id = ?")
            .bind(password_hash)
            .bind(id)
            .execute(executor)
            .await?;
        Ok(result.rows_affected())
    }
}
