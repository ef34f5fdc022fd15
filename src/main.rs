//src/main.rs

use std::env;

use tokio::net::TcpListener;

use llantera_backend::config::AppState;
use llantera_backend::models::usuario::Rol;
use llantera_backend::routes::crear_router;

#[tokio::main]
async fn main() {
    // Inicializa el logger.
    tracing_subscriber::fmt().with_target(false).compact().init();

    // .expect() está bien acá: si la configuración falla, la aplicación no debe arrancar.
    let app_state = AppState::new()
        .await
        .expect("Falla al inicializar el estado de la aplicación.");

    // Corre las migraciones de SQLx al arrancar.
    sqlx::migrate!()
        .run(&app_state.db_pool)
        .await
        .expect("Falla al correr las migraciones de la base de datos.");

    tracing::info!("✅ Migraciones de la base de datos ejecutadas con éxito!");

    sembrar_admin(&app_state).await;

    let app = crear_router(app_state);

    // Inicia el servidor
    let addr = "0.0.0.0:3000";
    let listener = TcpListener::bind(addr)
        .await
        .expect("Falla al iniciar el listener TCP");
    tracing::info!("🚀 Servidor escuchando en {}", listener.local_addr().unwrap());
    axum::serve(listener, app)
        .await
        .expect("Error en el servidor Axum");
}

/// Crea el primer administrador a partir de SEED_ADMIN_EMAIL y
/// SEED_ADMIN_PASSWORD, si todavía no existe. Sin esas variables el
/// arranque sigue, pero avisa cuando no hay ningún admin en la base.
async fn sembrar_admin(app_state: &AppState) {
    let email = env::var("SEED_ADMIN_EMAIL").ok();
    let password = env::var("SEED_ADMIN_PASSWORD").ok();

    match (email, password) {
        (Some(email), Some(password)) => {
            let existente = app_state
                .usuario_repo
                .find_by_email(&email)
                .await
                .expect("Falla al consultar el admin semilla");

            if existente.is_none() {
                app_state
                    .empleado_service
                    .create_empleado(&email, &password, "Administrador", Rol::Admin)
                    .await
                    .expect("Falla al crear el admin semilla");
                tracing::info!("👷 Admin semilla creado: {}", email);
            }
        }
        _ => {
            let admins = app_state
                .usuario_repo
                .count_admins()
                .await
                .expect("Falla al contar administradores");

            if admins == 0 {
                tracing::warn!(
                    "⚠️ No hay ningún administrador; define SEED_ADMIN_EMAIL y SEED_ADMIN_PASSWORD para crear uno."
                );
            }
        }
    }
}
