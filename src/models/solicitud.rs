// src/models/solicitud.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// Estados de una solicitud. No hay máquina de estados: cualquier
// estado puede seguir a cualquier otro.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum EstadoSolicitud {
    Pendiente,
    EnProceso,
    Completado,
    Rechazado,
}

impl EstadoSolicitud {
    pub fn as_str(&self) -> &'static str {
        match self {
            EstadoSolicitud::Pendiente => "pendiente",
            EstadoSolicitud::EnProceso => "en_proceso",
            EstadoSolicitud::Completado => "completado",
            EstadoSolicitud::Rechazado => "rechazado",
        }
    }
}

// Etiqueta de prioridad elegida por el cliente; el servidor no le
// asocia ningún SLA.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum Urgencia {
    Baja,
    Media,
    Alta,
    Critica,
}

// Una solicitud de servicio tal como viene de la base de datos
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct Solicitud {
    pub id: i64,
    pub codigo_tracker: String,
    pub proveedor_nombre: String,
    pub proveedor_email: String,
    pub proveedor_telefono: Option<String>,
    pub tipo_servicio: String,
    pub descripcion: String,
    pub urgencia: Urgencia,
    pub estado: EstadoSolicitud,
    pub notas_taller: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// La asignación vigente de una solicitud (a lo sumo una por solicitud)
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct Asignacion {
    pub id: i64,
    pub solicitud_id: i64,
    pub usuario_id: i64,
    pub notas: Option<String>,
    pub assigned_at: DateTime<Utc>,
}

// Un evento de la bitácora. Solo se insertan filas, nunca se editan.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct EventoBitacora {
    pub id: i64,
    pub solicitud_id: i64,
    pub tipo_evento: String,
    pub descripcion: String,
    pub actor_usuario_id: i64,
    pub datos_extra: Option<String>,
    pub occurred_at: DateTime<Utc>,
}

// Fila del listado del portal: la solicitud junto con su asignado actual
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct SolicitudConAsignacion {
    pub id: i64,
    pub codigo_tracker: String,
    pub proveedor_nombre: String,
    pub proveedor_email: String,
    pub proveedor_telefono: Option<String>,
    pub tipo_servicio: String,
    pub descripcion: String,
    pub urgencia: Urgencia,
    pub estado: EstadoSolicitud,
    pub notas_taller: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub asignado_id: Option<i64>,
    pub asignado_nombre: Option<String>,
    pub notas_asignacion: Option<String>,
}

// Respuesta pública del tracker: la solicitud con su línea de tiempo
#[derive(Debug, Serialize)]
pub struct TrackerResponse {
    #[serde(flatten)]
    pub solicitud: Solicitud,
    pub timeline: Vec<EventoBitacora>,
}
