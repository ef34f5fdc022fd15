use axum::{
    extract::{FromRef, FromRequestParts},
    http::request::Parts,
};
use std::marker::PhantomData;

use crate::{
    common::error::AppError,
    config::AppState,
    models::usuario::{Rol, Usuario},
};

// Extrae el token del header `Authorization: Bearer <token>`.
fn extraer_bearer(parts: &Parts) -> Result<&str, AppError> {
    parts
        .headers
        .get("Authorization")
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .ok_or(AppError::Unauthorized)
}

// El token crudo del header, sin consultar la base. Lo usa el logout,
// que borra la sesión exista o no.
pub struct BearerToken(pub String);

impl<S> FromRequestParts<S> for BearerToken
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let token = extraer_bearer(parts)?;
        Ok(BearerToken(token.to_owned()))
    }
}

// Extractor de autenticación: valida el token contra la base en cada
// request (sesión viva + usuario activo) y entrega el usuario al handler.
pub struct AuthenticatedUser(pub Usuario);

impl<S> FromRequestParts<S> for AuthenticatedUser
where
    S: Send + Sync,
    AppState: FromRef<S>,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let app_state = AppState::from_ref(state);
        let token = extraer_bearer(parts)?;
        let usuario = app_state.auth_service.authenticate(token).await?;
        Ok(AuthenticatedUser(usuario))
    }
}

// 1. El trait que define un rol exigible por tipo.
pub trait RolDef: Send + Sync + 'static {
    fn rol() -> Rol;
}

// 2. El extractor guardián: autentica y exige exactamente el rol de T.
// Lleva el usuario adentro para que el handler no lo busque de nuevo.
pub struct RequireRol<T>(pub Usuario, pub PhantomData<T>);

// 3. Implementación del FromRequestParts
impl<T, S> FromRequestParts<S> for RequireRol<T>
where
    T: RolDef,
    S: Send + Sync,
    AppState: FromRef<S>,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let AuthenticatedUser(usuario) =
            AuthenticatedUser::from_request_parts(parts, state).await?;

        // Igualdad exacta, sin jerarquía de roles.
        if usuario.rol != T::rol() {
            return Err(AppError::RolInsuficiente(T::rol().as_str()));
        }

        Ok(RequireRol(usuario, PhantomData))
    }
}

// ---
// DEFINICIÓN DE LOS ROLES (TIPOS)
// ---

pub struct RolAdmin;
impl RolDef for RolAdmin {
    fn rol() -> Rol {
        Rol::Admin
    }
}
