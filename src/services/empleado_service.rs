// src/services/empleado_service.rs

use bcrypt::hash;
use sqlx::SqlitePool;

use crate::{
    common::error::AppError,
    db::UsuarioRepository,
    models::usuario::{Rol, Usuario},
};

#[derive(Clone)]
pub struct EmpleadoService {
    usuario_repo: UsuarioRepository,
    pool: SqlitePool,
}

impl EmpleadoService {
    pub fn new(usuario_repo: UsuarioRepository, pool: SqlitePool) -> Self {
        Self { usuario_repo, pool }
    }

    pub async fn list_empleados(&self) -> Result<Vec<Usuario>, AppError> {
        self.usuario_repo.list_all().await
    }

    pub async fn create_empleado(
        &self,
        email: &str,
        password: &str,
        nombre: &str,
        rol: Rol,
    ) -> Result<Usuario, AppError> {
        let password_clone = password.to_owned();
        let password_hash = tokio::task::spawn_blocking(move || {
            hash(&password_clone, bcrypt::DEFAULT_COST)
        })
            .await
            .map_err(|e| anyhow::anyhow!("Falla en la task de hashing: {}", e))??;

        let usuario = self
            .usuario_repo
            .create_usuario(&self.pool, email, &password_hash, nombre, rol)
            .await?;

        tracing::info!(
            "👷 Empleado {} creado con rol {}",
            usuario.id,
            usuario.rol.as_str()
        );
        Ok(usuario)
    }

    // Actualización parcial: los campos ausentes conservan su valor actual.
    pub async fn update_empleado(
        &self,
        id: i64,
        nombre: Option<String>,
        email: Option<String>,
        rol: Option<Rol>,
        activo: Option<bool>,
        password: Option<String>,
    ) -> Result<Usuario, AppError> {
        let existente = self
            .usuario_repo
            .find_by_id(id)
            .await?
            .ok_or(AppError::EmpleadoNotFound)?;

        let nombre_final = nombre.unwrap_or(existente.nombre);
        let email_final = email.unwrap_or(existente.email);
        let rol_final = rol.unwrap_or(existente.rol);
        let activo_final = activo.unwrap_or(existente.activo);

        // El hash se calcula antes de abrir la transacción: no toca la base.
        let password_hash = match password {
            Some(password) => {
                let hashed = tokio::task::spawn_blocking(move || {
                    hash(&password, bcrypt::DEFAULT_COST)
                })
                    .await
                    .map_err(|e| anyhow::anyhow!("Falla en la task de hashing: {}", e))??;
                Some(hashed)
            }
            None => None,
        };

        let mut tx = self.pool.begin().await?;

        let actualizado = self
            .usuario_repo
            .update_usuario(&mut *tx, id, &nombre_final, &email_final, rol_final, activo_final)
            .await?
            .ok_or(AppError::EmpleadoNotFound)?;

        if let Some(password_hash) = password_hash {
            self.usuario_repo
                .update_password(&mut *tx, id, &password_hash)
                .await?;
        }

        tx.commit().await?;

        // Nota: si quedó inactivo, sus sesiones abiertas mueren en el próximo
        // request, porque la autenticación exige usuario activo.
        Ok(actualizado)
    }
}
