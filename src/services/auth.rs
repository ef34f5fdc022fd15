// src/services/auth.rs

use bcrypt::{hash, verify};
use chrono::{Duration, Utc};
use sqlx::SqlitePool;

use crate::{
    common::{error::AppError, random},
    db::{SesionRepository, UsuarioRepository},
    models::usuario::{AuthResponse, Usuario, UsuarioPublico},
};

#[derive(Clone)]
pub struct AuthService {
    usuario_repo: UsuarioRepository,
    sesion_repo: SesionRepository,
    session_expiry_hours: i64,
    pool: SqlitePool,
}

impl AuthService {
    pub fn new(
        usuario_repo: UsuarioRepository,
        sesion_repo: SesionRepository,
        session_expiry_hours: i64,
        pool: SqlitePool,
    ) -> Self {
        Self {
            usuario_repo,
            sesion_repo,
            session_expiry_hours,
            pool,
        }
    }

    pub async fn login(&self, email: &str, password: &str) -> Result<AuthResponse, AppError> {
        // El mismo error para "no existe", "inactivo" y "contraseña mal":
        // el login no confirma qué e-mails están registrados.
        let usuario = self
            .usuario_repo
            .find_by_email(email)
            .await?
            .filter(|u| u.activo)
            .ok_or(AppError::InvalidCredentials)?;

        let password_clone = password.to_owned();
        let password_hash_clone = usuario.password_hash.clone();

        // La verificación bcrypt es cara: va a un thread aparte.
        let is_password_valid = tokio::task::spawn_blocking(move || {
            verify(&password_clone, &password_hash_clone)
        })
            .await
            .map_err(|e| anyhow::anyhow!("Falla en la task de verificación de contraseña: {}", e))??; // Propaga los dos errores

        if !is_password_valid {
            return Err(AppError::InvalidCredentials);
        }

        let ahora = Utc::now();
        let expires_at = ahora + Duration::hours(self.session_expiry_hours);
        let token = random::generar_token_sesion();

        let mut tx = self.pool.begin().await?;

        // Poda perezosa: las sesiones ya vencidas de este usuario se van.
        self.sesion_repo
            .delete_expiradas_de(&mut *tx, usuario.id, ahora)
            .await?;

        let sesion = self
            .sesion_repo
            .create_sesion(&mut *tx, usuario.id, &token, expires_at)
            .await?;

        tx.commit().await?;

        tracing::info!("🔑 Sesión abierta para el usuario {}", usuario.id);

        Ok(AuthResponse {
            token: sesion.token,
            expires_at: sesion.expires_at,
            usuario: UsuarioPublico::from(&usuario),
        })
    }

    // La autenticación de cada request: sesión viva + usuario activo.
    // Cualquier falla se reporta igual, sin distinguir el motivo.
    pub async fn authenticate(&self, token: &str) -> Result<Usuario, AppError> {
        let fila = self
            .sesion_repo
            .find_por_token(token)
            .await?
            .ok_or(AppError::Unauthorized)?;

        if fila.expires_at < Utc::now() || !fila.usuario.activo {
            return Err(AppError::Unauthorized);
        }

        Ok(fila.usuario)
    }

    // Idempotente: borrar un token que ya no existe no es un error.
    pub async fn logout(&self, token: &str) -> Result<(), AppError> {
        self.sesion_repo.delete_por_token(token).await?;
        Ok(())
    }

    pub async fn cambiar_password(
        &self,
        usuario: &Usuario,
        password_actual: &str,
        password_nueva: &str,
    ) -> Result<(), AppError> {
        let actual_clone = password_actual.to_owned();
        let hash_clone = usuario.password_hash.clone();

        let coincide = tokio::task::spawn_blocking(move || verify(&actual_clone, &hash_clone))
            .await
            .map_err(|e| anyhow::anyhow!("Falla en la task de verificación de contraseña: {}", e))??;

        if !coincide {
            return Err(AppError::PasswordActualIncorrecta);
        }

        let nueva_clone = password_nueva.to_owned();
        let nuevo_hash = tokio::task::spawn_blocking(move || hash(&nueva_clone, bcrypt::DEFAULT_COST))
            .await
            .map_err(|e| anyhow::anyhow!("Falla en la task de hashing: {}", e))??;

        self.usuario_repo
            .update_password(&self.pool, usuario.id, &nuevo_hash)
            .await?;

        tracing::info!("🔒 Contraseña actualizada para el usuario {}", usuario.id);
        Ok(())
    }
}
