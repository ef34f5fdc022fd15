// src/config.rs

use sqlx::{
    sqlite::{SqliteConnectOptions, SqlitePoolOptions},
    SqlitePool,
};
use std::{env, str::FromStr, time::Duration};

use crate::{
    db::{
        CotizacionRepository, InventarioRepository, SesionRepository, SolicitudRepository,
        UsuarioRepository,
    },
    services::{
        AuthService, CotizacionService, EmpleadoService, InventarioService, SolicitudService,
    },
};

// Horas de vida de una sesión cuando el entorno no dice otra cosa.
const DEFAULT_SESSION_EXPIRY_HOURS: i64 = 8;

#[derive(Clone)]
pub struct AppState {
    pub db_pool: SqlitePool,
    pub usuario_repo: UsuarioRepository,
    pub auth_service: AuthService,
    pub empleado_service: EmpleadoService,
    pub solicitud_service: SolicitudService,
    pub inventario_service: InventarioService,
    pub cotizacion_service: CotizacionService,
}

impl AppState {
    // Lee el entorno, abre el pool y arma el grafo de dependencias.
    pub async fn new() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let database_url = env::var("DATABASE_URL").expect("DATABASE_URL debe estar definida");

        let session_expiry_hours = env::var("SESSION_EXPIRY_HOURS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(DEFAULT_SESSION_EXPIRY_HOURS);

        let options = SqliteConnectOptions::from_str(&database_url)?
            .create_if_missing(true)
            .foreign_keys(true);

        // Conecta a la base de datos, usando '?' para propagar errores
        let db_pool = SqlitePoolOptions::new()
            .max_connections(5)
            .acquire_timeout(Duration::from_secs(3))
            .connect_with(options)
            .await?;

        tracing::info!("✅ Conexión con la base de datos establecida con éxito!");

        Ok(Self::build(db_pool, session_expiry_hours))
    }

    // Arma el estado desde un pool ya abierto. Los tests de integración
    // entran por acá con su base de datos propia.
    pub fn build(db_pool: SqlitePool, session_expiry_hours: i64) -> Self {
        // --- Monta el grafo de dependencias ---
        let usuario_repo = UsuarioRepository::new(db_pool.clone());
        let sesion_repo = SesionRepository::new(db_pool.clone());
        let solicitud_repo = SolicitudRepository::new(db_pool.clone());
        let inventario_repo = InventarioRepository::new(db_pool.clone());
        let cotizacion_repo = CotizacionRepository::new(db_pool.clone());

        let auth_service = AuthService::new(
            usuario_repo.clone(),
            sesion_repo,
            session_expiry_hours,
            db_pool.clone(),
        );
        let empleado_service = EmpleadoService::new(usuario_repo.clone(), db_pool.clone());
        let solicitud_service =
            SolicitudService::new(solicitud_repo, usuario_repo.clone(), db_pool.clone());
        let inventario_service = InventarioService::new(inventario_repo, db_pool.clone());
        let cotizacion_service = CotizacionService::new(cotizacion_repo, db_pool.clone());

        Self {
            db_pool,
            usuario_repo,
            auth_service,
            empleado_service,
            solicitud_service,
            inventario_service,
            cotizacion_service,
        }
    }
}
