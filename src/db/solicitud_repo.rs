// src/db/solicitud_repo.rs

use sqlx::{Executor, Sqlite, SqlitePool};

use crate::{
    common::error::AppError,
    models::solicitud::{
        Asignacion, EstadoSolicitud, EventoBitacora, Solicitud, SolicitudConAsignacion, Urgencia,
    },
};

// Repositorio del libro de solicitudes: las solicitudes en sí, la
// asignación vigente de cada una y su bitácora de eventos.
#[derive(Clone)]
pub struct SolicitudRepository {
    pool: SqlitePool,
}

impl SolicitudRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    // ---
    // Solicitudes
    // ---

    // Inserta la solicitud con el código dado. Devuelve None si el código
    // chocó con el UNIQUE de `codigo_tracker`, para que el servicio
    // reintente con un código nuevo.
    pub async fn insert_solicitud<'e, E>(
        &self,
        executor: E,
        codigo_tracker: &str,
        proveedor_nombre: &str,
        proveedor_email: &str,
        proveedor_telefono: Option<&str>,
        tipo_servicio: &str,
        descripcion: &str,
        urgencia: Urgencia,
    ) -> Result<Option<Solicitud>, AppError>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let resultado = sqlx::query_as::<_, Solicitud>(
            r#"
            INSERT INTO solicitudes
                (codigo_tracker, proveedor_nombre, proveedor_email, proveedor_telefono,
                 tipo_servicio, descripcion, urgencia)
            VALUES (?, ?, ?, ?, ?, ?, ?)
            RETURNING *
            "#,
        )
        .bind(codigo_tracker)
        .bind(proveedor_nombre)
        .bind(proveedor_email)
        .bind(proveedor_telefono)
        .bind(tipo_servicio)
        .bind(descripcion)
        .bind(urgencia)
        .fetch_one(executor)
        .await;

        match resultado {
            Ok(solicitud) => Ok(Some(solicitud)),
            Err(sqlx::Error::Database(db_err)) if db_err.is_unique_violation() => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    pub async fn find_by_id(&self, id: i64) -> Result<Option<Solicitud>, AppError> {
        let maybe = sqlx::query_as::<_, Solicitud>(
            "SELECT * FROM solicitudes WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(maybe)
    }

    pub async fn find_by_codigo(&self, codigo: &str) -> Result<Option<Solicitud>, AppError> {
        let maybe = sqlx::query_as::<_, Solicitud>(
            "SELECT * FROM solicitudes WHERE codigo_tracker = ?",
        )
        .bind(codigo)
        .fetch_optional(&self.pool)
        .await?;
        Ok(maybe)
    }

    // Actualiza estado y notas del taller. Si `notas_taller` viene vacío se
    // conservan las notas existentes (COALESCE).
    pub async fn update_estado<'e, E>(
        &self,
        executor: E,
        id: i64,
        estado: EstadoSolicitud,
        notas_taller: Option<&str>,
    ) -> Result<Option<Solicitud>, AppError>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let maybe = sqlx::query_as::<_, Solicitud>(
            r#"
            UPDATE solicitudes
            SET estado = ?,
                notas_taller = COALESCE(?, notas_taller),
                updated_at = datetime('now')
            WHERE id = ?
            RETURNING *
            "#,
        )
        .bind(estado)
        .bind(notas_taller)
        .bind(id)
        .fetch_optional(executor)
        .await?;
        Ok(maybe)
    }

    // Listado del portal: cada solicitud con su asignado actual (si tiene).
    pub async fn list_con_asignacion(&self) -> Result<Vec<SolicitudConAsignacion>, AppError> {
        let filas = sqlx::query_as::<_, SolicitudConAsignacion>(
            r#"
            SELECT
                s.id, s.codigo_tracker, s.proveedor_nombre, s.proveedor_email,
                s.proveedor_telefono, s.tipo_servicio, s.descripcion, s.urgencia,
                s.estado, s.notas_taller, s.created_at, s.updated_at,
                u.id     AS asignado_id,
                u.nombre AS asignado_nombre,
                a.notas  AS notas_asignacion
            FROM solicitudes s
            LEFT JOIN asignaciones a ON a.solicitud_id = s.id
            LEFT JOIN usuarios u ON u.id = a.usuario_id
            ORDER BY s.id DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(filas)
    }

    // Las solicitudes asignadas actualmente a un empleado.
    pub async fn list_asignadas_a(&self, usuario_id: i64) -> Result<Vec<Solicitud>, AppError> {
        let solicitudes = sqlx::query_as::<_, Solicitud>(
            r#"
            SELECT s.*
            FROM solicitudes s
            INNER JOIN asignaciones a ON a.solicitud_id = s.id
            WHERE a.usuario_id = ?
            ORDER BY s.id DESC
            "#,
        )
        .bind(usuario_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(solicitudes)
    }

    // ---
    // Asignaciones
    // ---

    pub async fn find_asignacion<'e, E>(
        &self,
        executor: E,
        solicitud_id: i64,
    ) -> Result<Option<Asignacion>, AppError>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let maybe = sqlx::query_as::<_, Asignacion>(
            "SELECT * FROM asignaciones WHERE solicitud_id = ?",
        )
        .bind(solicitud_id)
        .fetch_optional(executor)
        .await?;
        Ok(maybe)
    }

    // UPSERT por solicitud: si ya había una asignación la fila se actualiza
    // en el lugar, conservando el invariante de "a lo sumo una por solicitud".
    pub async fn upsert_asignacion<'e, E>(
        &self,
        executor: E,
        solicitud_id: i64,
        usuario_id: i64,
        notas: Option<&str>,
    ) -> Result<Asignacion, AppError>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let asignacion = sqlx::query_as::<_, Asignacion>(
            r#"
            INSERT INTO asignaciones (solicitud_id, usuario_id, notas)
            VALUES (?, ?, ?)
            ON CONFLICT(solicitud_id) DO UPDATE SET
                usuario_id  = excluded.usuario_id,
                notas       = excluded.notas,
                assigned_at = datetime('now')
            RETURNING *
            "#,
        )
        .bind(solicitud_id)
        .bind(usuario_id)
        .bind(notas)
        .fetch_one(executor)
        .await?;

        Ok(asignacion)
    }

    // ---
    // Bitácora
    // ---

    pub async fn insert_evento<'e, E>(
        &self,
        executor: E,
        solicitud_id: i64,
        tipo_evento: &str,
        descripcion: &str,
        actor_usuario_id: i64,
        datos_extra: Option<&str>,
    ) -> Result<EventoBitacora, AppError>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let evento = sqlx::query_as::<_, EventoBitacora>(
            r#"
            INSERT INTO bitacora
                (solicitud_id, tipo_evento, descripcion, actor_usuario_id, datos_extra)
            VALUES (?, ?, ?, ?, ?)
            RETURNING *
            "#,
        )
        .bind(solicitud_id)
        .bind(tipo_evento)
        .bind(descripcion)
        .bind(actor_usuario_id)
        .bind(datos_extra)
        .fetch_one(executor)
        .await?;

        Ok(evento)
    }

    // La línea de tiempo pública del tracker, del evento más viejo al más
    // nuevo. El orden por id es el orden de inserción.
    pub async fn list_bitacora(&self, solicitud_id: i64) -> Result<Vec<EventoBitacora>, AppError> {
        let eventos = sqlx::query_as::<_, EventoBitacora>(
            "SELECT * FROM bitacora WHERE solicitud_id = ? ORDER BY id ASC",
        )
        .bind(solicitud_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(eventos)
    }
}
