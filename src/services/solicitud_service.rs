// src/services/solicitud_service.rs

use sqlx::SqlitePool;

use crate::{
    common::{error::AppError, random},
    db::{SolicitudRepository, UsuarioRepository},
    models::solicitud::{
        Asignacion, EstadoSolicitud, Solicitud, SolicitudConAsignacion, TrackerResponse, Urgencia,
    },
    models::usuario::Usuario,
};

// Cuántos códigos candidatos se prueban antes de rendirse.
const MAX_INTENTOS_CODIGO: u32 = 5;

#[derive(Clone)]
pub struct SolicitudService {
    solicitud_repo: SolicitudRepository,
    usuario_repo: UsuarioRepository,
    pool: SqlitePool,
}

impl SolicitudService {
    pub fn new(
        solicitud_repo: SolicitudRepository,
        usuario_repo: UsuarioRepository,
        pool: SqlitePool,
    ) -> Self {
        Self {
            solicitud_repo,
            usuario_repo,
            pool,
        }
    }

    // Alta pública: genera el código de seguimiento y reintenta con uno
    // nuevo si choca con uno ya emitido.
    pub async fn create_solicitud(
        &self,
        proveedor_nombre: &str,
        proveedor_email: &str,
        proveedor_telefono: Option<&str>,
        tipo_servicio: &str,
        descripcion: &str,
        urgencia: Urgencia,
    ) -> Result<Solicitud, AppError> {
        for _ in 0..MAX_INTENTOS_CODIGO {
            let codigo = random::generar_codigo_tracker();
            let insertada = self
                .solicitud_repo
                .insert_solicitud(
                    &self.pool,
                    &codigo,
                    proveedor_nombre,
                    proveedor_email,
                    proveedor_telefono,
                    tipo_servicio,
                    descripcion,
                    urgencia,
                )
                .await?;

            if let Some(solicitud) = insertada {
                tracing::info!(
                    "📬 Solicitud {} creada con código {}",
                    solicitud.id,
                    solicitud.codigo_tracker
                );
                return Ok(solicitud);
            }

            tracing::warn!("⚠️ Colisión del código de seguimiento {}, reintentando", codigo);
        }

        Err(anyhow::anyhow!("No se pudo generar un código de seguimiento único").into())
    }

    pub async fn update_solicitud(
        &self,
        id: i64,
        estado: EstadoSolicitud,
        notas_taller: Option<&str>,
        actor: &Usuario,
    ) -> Result<Solicitud, AppError> {
        let existente = self
            .solicitud_repo
            .find_by_id(id)
            .await?
            .ok_or(AppError::SolicitudNotFound)?;

        let mut tx = self.pool.begin().await?;

        let actualizada = self
            .solicitud_repo
            .update_estado(&mut *tx, id, estado, notas_taller)
            .await?
            .ok_or(AppError::SolicitudNotFound)?;

        // Solo un cambio real de estado deja rastro en la bitácora.
        if existente.estado != estado {
            let descripcion = format!(
                "Estado cambiado de '{}' a '{}'",
                existente.estado.as_str(),
                estado.as_str()
            );
            self.solicitud_repo
                .insert_evento(&mut *tx, id, "cambio_estado", &descripcion, actor.id, None)
                .await?;
        }

        tx.commit().await?;
        Ok(actualizada)
    }

    // La consulta pública del tracker: la solicitud y su línea de tiempo.
    pub async fn tracker(&self, codigo: &str) -> Result<TrackerResponse, AppError> {
        let solicitud = self
            .solicitud_repo
            .find_by_codigo(codigo)
            .await?
            .ok_or(AppError::SolicitudNotFound)?;

        let timeline = self.solicitud_repo.list_bitacora(solicitud.id).await?;

        Ok(TrackerResponse {
            solicitud,
            timeline,
        })
    }

    pub async fn list_solicitudes(&self) -> Result<Vec<SolicitudConAsignacion>, AppError> {
        self.solicitud_repo.list_con_asignacion().await
    }

    pub async fn mis_solicitudes(&self, usuario_id: i64) -> Result<Vec<Solicitud>, AppError> {
        self.solicitud_repo.list_asignadas_a(usuario_id).await
    }

    // Asignación con auditoría: o se escriben la asignación Y su evento de
    // bitácora, o ninguno de los dos.
    pub async fn asignar(
        &self,
        solicitud_id: i64,
        empleado_id: i64,
        notas: Option<&str>,
        actor: &Usuario,
    ) -> Result<Asignacion, AppError> {
        // 1. Validaciones. Fallar acá no deja ninguna fila escrita.
        self.solicitud_repo
            .find_by_id(solicitud_id)
            .await?
            .ok_or(AppError::SolicitudNotFound)?;

        let empleado = self
            .usuario_repo
            .find_by_id(empleado_id)
            .await?
            .ok_or(AppError::EmpleadoNotFound)?;

        if !empleado.activo {
            return Err(AppError::EmpleadoInactivo);
        }

        let mut tx = self.pool.begin().await?;

        // 2. ¿Primera asignación o reasignación?
        let previa = self
            .solicitud_repo
            .find_asignacion(&mut *tx, solicitud_id)
            .await?;

        let (tipo_evento, descripcion) = match &previa {
            None => (
                "asignacion",
                format!("Solicitud asignada a {}", empleado.nombre),
            ),
            Some(_) => (
                "reasignacion",
                format!("Solicitud reasignada a {}", empleado.nombre),
            ),
        };

        // 3. UPSERT de la asignación vigente.
        let asignacion = self
            .solicitud_repo
            .upsert_asignacion(&mut *tx, solicitud_id, empleado_id, notas)
            .await?;

        // 4. El evento de bitácora, con un snapshot de la asignación.
        let datos_extra = serde_json::json!({
            "empleado_id": empleado_id,
            "empleado_nombre": empleado.nombre,
            "notas": notas,
        })
        .to_string();

        self.solicitud_repo
            .insert_evento(
                &mut *tx,
                solicitud_id,
                tipo_evento,
                &descripcion,
                actor.id,
                Some(&datos_extra),
            )
            .await?;

        // 5. Todo o nada.
        tx.commit().await?;

        tracing::info!(
            "🔧 Solicitud {} asignada al empleado {}",
            solicitud_id,
            empleado_id
        );
        Ok(asignacion)
    }
}
