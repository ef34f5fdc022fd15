// src/models/usuario.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

// Los tres roles del portal. Sin jerarquía: un endpoint de admin
// exige exactamente `admin`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum Rol {
    Admin,
    Mecanico,
    Recepcionista,
}

impl Rol {
    pub fn as_str(&self) -> &'static str {
        match self {
            Rol::Admin => "admin",
            Rol::Mecanico => "mecanico",
            Rol::Recepcionista => "recepcionista",
        }
    }
}

// Representa un usuario (empleado) que viene de la base de datos
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct Usuario {
    pub id: i64,
    pub email: String,

    #[serde(skip_serializing)] // IMPORTANTE para seguridad
    pub password_hash: String,

    pub nombre: String,
    pub rol: Rol,
    pub activo: bool,
    pub created_at: DateTime<Utc>,
}

// Proyección mínima que sí se puede devolver al cliente
#[derive(Debug, Clone, Serialize)]
pub struct UsuarioPublico {
    pub id: i64,
    pub nombre: String,
    pub email: String,
    pub rol: Rol,
}

impl From<&Usuario> for UsuarioPublico {
    fn from(usuario: &Usuario) -> Self {
        Self {
            id: usuario.id,
            nombre: usuario.nombre.clone(),
            email: usuario.email.clone(),
            rol: usuario.rol,
        }
    }
}

// Una sesión persistida; el token opaco es la única credencial.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct Sesion {
    pub id: i64,
    #[serde(skip_serializing)]
    pub token: String,
    pub usuario_id: i64,
    pub expires_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

// Datos para iniciar sesión
#[derive(Debug, Deserialize, Validate)]
pub struct LoginPayload {
    #[validate(email(message = "El email proporcionado es inválido."))]
    pub email: String,
    #[validate(length(min = 1, message = "La contraseña es obligatoria."))]
    pub password: String,
}

// Respuesta de autenticación con el token y su vencimiento
#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub token: String,
    pub expires_at: DateTime<Utc>,
    pub usuario: UsuarioPublico,
}

// Cambio de contraseña del propio usuario
#[derive(Debug, Deserialize, Validate)]
pub struct CambiarPasswordPayload {
    #[validate(length(min = 1, message = "La contraseña actual es obligatoria."))]
    pub password_actual: String,
    #[validate(length(min = 6, message = "La contraseña nueva debe tener al menos 6 caracteres."))]
    pub password_nueva: String,
}
