use axum::{extract::State, http::StatusCode, Json};
use validator::Validate;

use crate::{
    common::error::AppError,
    config::AppState,
    middleware::auth::{AuthenticatedUser, BearerToken},
    models::usuario::{AuthResponse, CambiarPasswordPayload, LoginPayload, UsuarioPublico},
};

// Handler de login
pub async fn login(
    State(app_state): State<AppState>,
    Json(payload): Json<LoginPayload>,
) -> Result<Json<AuthResponse>, AppError> {
    payload.validate().map_err(AppError::ValidationError)?;

    let respuesta = app_state
        .auth_service
        .login(&payload.email, &payload.password)
        .await?;

    Ok(Json(respuesta))
}

// Handler de logout: borra la sesión del token presentado. No valida el
// token contra la base; un token desconocido también resulta en 204.
pub async fn logout(
    State(app_state): State<AppState>,
    BearerToken(token): BearerToken,
) -> Result<StatusCode, AppError> {
    app_state.auth_service.logout(&token).await?;
    Ok(StatusCode::NO_CONTENT)
}

// Handler de la ruta protegida /verify
pub async fn verify(AuthenticatedUser(usuario): AuthenticatedUser) -> Json<UsuarioPublico> {
    Json(UsuarioPublico::from(&usuario))
}

// Cambio de contraseña del propio usuario autenticado
pub async fn cambiar_password(
    State(app_state): State<AppState>,
    AuthenticatedUser(usuario): AuthenticatedUser,
    Json(payload): Json<CambiarPasswordPayload>,
) -> Result<StatusCode, AppError> {
    payload.validate().map_err(AppError::ValidationError)?;

    app_state
        .auth_service
        .cambiar_password(&usuario, &payload.password_actual, &payload.password_nueva)
        .await?;

    Ok(StatusCode::NO_CONTENT)
}
