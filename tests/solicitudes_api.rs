//! Tests de integración HTTP para las solicitudes de servicio: alta
//! pública, tracker, portal interno, asignaciones y bitácora.

mod common;

use axum::http::StatusCode;
use common::{body_json, build_test_app, get, get_auth, post_json, post_json_auth, put_json_auth};
use sqlx::SqlitePool;

use llantera_backend::db::UsuarioRepository;
use llantera_backend::models::usuario::Rol;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

const PASSWORD: &str = "secreto123";

async fn crear_empleado(pool: &SqlitePool, email: &str, rol: Rol) -> i64 {
    let hash = bcrypt::hash(PASSWORD, 4).expect("el hash debe calcularse");
    let repo = UsuarioRepository::new(pool.clone());
    let usuario = repo
        .create_usuario(pool, email, &hash, "Empleado de Prueba", rol)
        .await
        .expect("el alta del empleado debe funcionar");
    usuario.id
}

async fn login(pool: &SqlitePool, email: &str) -> String {
    let app = build_test_app(pool.clone());
    let body = serde_json::json!({ "email": email, "password": PASSWORD });
    let response = post_json(app, "/api/empleado/login", body).await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    json["token"].as_str().expect("el login debe devolver token").to_string()
}

/// Da de alta una solicitud por el endpoint público y devuelve
/// (id, codigo_tracker).
async fn crear_solicitud(pool: &SqlitePool) -> (i64, String) {
    let app = build_test_app(pool.clone());
    let body = serde_json::json!({
        "proveedor_nombre": "Carlos Mendoza",
        "proveedor_email": "carlos@transportes.mx",
        "proveedor_telefono": "555-0134",
        "tipo_servicio": "montaje",
        "descripcion": "Cambio de cuatro llantas 215/65 R16"
    });
    let response = post_json(app, "/api/solicitudes", body).await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let json = body_json(response).await;
    let id = json["id"].as_i64().expect("la solicitud debe traer id");
    let codigo = json["codigo_tracker"]
        .as_str()
        .expect("la solicitud debe traer codigo_tracker")
        .to_string();
    (id, codigo)
}

fn asignar_body(empleado_id: i64) -> serde_json::Value {
    serde_json::json!({ "empleado_id": empleado_id, "notas": "Llegó en grúa" })
}

// ---------------------------------------------------------------------------
// Alta pública
// ---------------------------------------------------------------------------

/// El alta no pide sesión y devuelve el código de seguimiento con el
/// formato de siempre: TM más seis caracteres A-Z0-9.
#[sqlx::test(migrations = "./migrations")]
async fn alta_publica_devuelve_codigo_tracker(pool: SqlitePool) {
    let app = build_test_app(pool);
    let body = serde_json::json!({
        "proveedor_nombre": "Carlos Mendoza",
        "proveedor_email": "carlos@transportes.mx",
        "tipo_servicio": "balanceo",
        "descripcion": "Vibración al pasar de 100 km/h"
    });
    let response = post_json(app, "/api/solicitudes", body).await;

    assert_eq!(response.status(), StatusCode::CREATED);
    let json = body_json(response).await;

    let codigo = json["codigo_tracker"].as_str().expect("debe traer codigo_tracker");
    assert_eq!(codigo.len(), 8, "TM más seis caracteres");
    assert!(codigo.starts_with("TM"));
    assert!(
        codigo[2..].chars().all(|c| c.is_ascii_uppercase() || c.is_ascii_digit()),
        "el sufijo solo usa A-Z y 0-9, vino: {codigo}"
    );

    assert_eq!(json["estado"], "pendiente");
    // Sin urgencia explícita, entra como 'media'.
    assert_eq!(json["urgencia"], "media");
}

/// La urgencia del payload se respeta.
#[sqlx::test(migrations = "./migrations")]
async fn alta_publica_con_urgencia_explicita(pool: SqlitePool) {
    let app = build_test_app(pool);
    let body = serde_json::json!({
        "proveedor_nombre": "Carlos Mendoza",
        "proveedor_email": "carlos@transportes.mx",
        "tipo_servicio": "reparación",
        "descripcion": "Ponchadura en carretera",
        "urgencia": "critica"
    });
    let response = post_json(app, "/api/solicitudes", body).await;

    assert_eq!(response.status(), StatusCode::CREATED);
    let json = body_json(response).await;
    assert_eq!(json["urgencia"], "critica");
}

/// Un e-mail inválido se rechaza con el detalle del campo.
#[sqlx::test(migrations = "./migrations")]
async fn alta_publica_email_invalido(pool: SqlitePool) {
    let app = build_test_app(pool);
    let body = serde_json::json!({
        "proveedor_nombre": "Carlos Mendoza",
        "proveedor_email": "esto-no-es-un-email",
        "tipo_servicio": "montaje",
        "descripcion": "Cambio de llantas"
    });
    let response = post_json(app, "/api/solicitudes", body).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert!(json["details"]["proveedor_email"].is_array());
}

// ---------------------------------------------------------------------------
// Tracker público
// ---------------------------------------------------------------------------

/// Una solicitud recién creada se consulta por código sin sesión y su
/// historial arranca vacío.
#[sqlx::test(migrations = "./migrations")]
async fn tracker_muestra_solicitud_con_historial_vacio(pool: SqlitePool) {
    let (id, codigo) = crear_solicitud(&pool).await;

    let app = build_test_app(pool);
    let response = get(app, &format!("/api/tracker/{codigo}")).await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["id"], id);
    assert_eq!(json["codigo_tracker"], codigo.as_str());
    assert_eq!(json["estado"], "pendiente");

    let timeline = json["timeline"].as_array().expect("debe traer timeline");
    assert!(timeline.is_empty(), "una solicitud nueva no tiene eventos");
}

/// Un código que no existe devuelve 404.
#[sqlx::test(migrations = "./migrations")]
async fn tracker_codigo_desconocido(pool: SqlitePool) {
    let app = build_test_app(pool);
    let response = get(app, "/api/tracker/TMZZZZZZ").await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

// ---------------------------------------------------------------------------
// Portal interno: listado y actualización
// ---------------------------------------------------------------------------

/// El listado del portal pide sesión.
#[sqlx::test(migrations = "./migrations")]
async fn listado_requiere_sesion(pool: SqlitePool) {
    crear_solicitud(&pool).await;

    let app = build_test_app(pool);
    let response = get(app, "/api/solicitudes").await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

/// El listado llega con la más reciente primero.
#[sqlx::test(migrations = "./migrations")]
async fn listado_ordena_mas_reciente_primero(pool: SqlitePool) {
    let (primera_id, _) = crear_solicitud(&pool).await;
    let (segunda_id, _) = crear_solicitud(&pool).await;

    crear_empleado(&pool, "ana@llantera.mx", Rol::Recepcionista).await;
    let token = login(&pool, "ana@llantera.mx").await;

    let app = build_test_app(pool);
    let response = get_auth(app, "/api/solicitudes", &token).await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    let solicitudes = json.as_array().expect("el cuerpo debe ser un arreglo");
    assert_eq!(solicitudes.len(), 2);
    assert_eq!(solicitudes[0]["id"], segunda_id);
    assert_eq!(solicitudes[1]["id"], primera_id);
    // Sin asignar, las columnas del asignado vienen en null.
    assert!(solicitudes[0]["asignado_id"].is_null());
}

/// Cambiar el estado actualiza la solicitud y deja un evento en la
/// bitácora con el estado anterior y el nuevo.
#[sqlx::test(migrations = "./migrations")]
async fn actualizar_estado_escribe_bitacora(pool: SqlitePool) {
    let (id, codigo) = crear_solicitud(&pool).await;
    crear_empleado(&pool, "beto@llantera.mx", Rol::Mecanico).await;
    let token = login(&pool, "beto@llantera.mx").await;

    let app = build_test_app(pool.clone());
    let body = serde_json::json!({ "estado": "en_proceso", "notas_taller": "Llanta desmontada" });
    let response = put_json_auth(app, &format!("/api/solicitudes/{id}"), body, &token).await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["estado"], "en_proceso");
    assert_eq!(json["notas_taller"], "Llanta desmontada");

    let app = build_test_app(pool);
    let response = get(app, &format!("/api/tracker/{codigo}")).await;
    let json = body_json(response).await;
    let timeline = json["timeline"].as_array().expect("debe traer timeline");
    assert_eq!(timeline.len(), 1);
    assert_eq!(timeline[0]["tipo_evento"], "cambio_estado");
    let descripcion = timeline[0]["descripcion"].as_str().unwrap_or("");
    assert!(
        descripcion.contains("pendiente") && descripcion.contains("en_proceso"),
        "la descripción nombra ambos estados, vino: {descripcion}"
    );
}

/// Reafirmar el mismo estado no ensucia la bitácora.
#[sqlx::test(migrations = "./migrations")]
async fn reafirmar_estado_no_duplica_bitacora(pool: SqlitePool) {
    let (id, _) = crear_solicitud(&pool).await;
    crear_empleado(&pool, "beto@llantera.mx", Rol::Mecanico).await;
    let token = login(&pool, "beto@llantera.mx").await;

    let app = build_test_app(pool.clone());
    let body = serde_json::json!({ "estado": "pendiente" });
    let response = put_json_auth(app, &format!("/api/solicitudes/{id}"), body, &token).await;
    assert_eq!(response.status(), StatusCode::OK);

    let eventos = sqlx::query_scalar::<_, i64>(
        "SELECT COUNT(*) FROM bitacora WHERE solicitud_id = ?",
    )
    .bind(id)
    .fetch_one(&pool)
    .await
    .expect("la consulta debe funcionar");
    assert_eq!(eventos, 0);
}

/// Si el payload no trae notas, las notas previas del taller se quedan
/// como estaban.
#[sqlx::test(migrations = "./migrations")]
async fn actualizar_sin_notas_conserva_las_previas(pool: SqlitePool) {
    let (id, _) = crear_solicitud(&pool).await;
    crear_empleado(&pool, "beto@llantera.mx", Rol::Mecanico).await;
    let token = login(&pool, "beto@llantera.mx").await;

    let app = build_test_app(pool.clone());
    let body = serde_json::json!({ "estado": "en_proceso", "notas_taller": "Rin dañado" });
    put_json_auth(app, &format!("/api/solicitudes/{id}"), body, &token).await;

    let app = build_test_app(pool);
    let body = serde_json::json!({ "estado": "completado" });
    let response = put_json_auth(app, &format!("/api/solicitudes/{id}"), body, &token).await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["estado"], "completado");
    assert_eq!(json["notas_taller"], "Rin dañado");
}

/// Un estado fuera del catálogo ni siquiera llega al servicio: el
/// deserializador lo rechaza.
#[sqlx::test(migrations = "./migrations")]
async fn actualizar_estado_desconocido(pool: SqlitePool) {
    let (id, _) = crear_solicitud(&pool).await;
    crear_empleado(&pool, "beto@llantera.mx", Rol::Mecanico).await;
    let token = login(&pool, "beto@llantera.mx").await;

    let app = build_test_app(pool);
    let body = serde_json::json!({ "estado": "volando" });
    let response = put_json_auth(app, &format!("/api/solicitudes/{id}"), body, &token).await;

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

/// Actualizar una solicitud inexistente: 404.
#[sqlx::test(migrations = "./migrations")]
async fn actualizar_solicitud_inexistente(pool: SqlitePool) {
    crear_empleado(&pool, "beto@llantera.mx", Rol::Mecanico).await;
    let token = login(&pool, "beto@llantera.mx").await;

    let app = build_test_app(pool);
    let body = serde_json::json!({ "estado": "en_proceso" });
    let response = put_json_auth(app, "/api/solicitudes/999", body, &token).await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

// ---------------------------------------------------------------------------
// Asignaciones
// ---------------------------------------------------------------------------

/// Asignar es terreno de admin: un mecánico recibe 403 y no queda rastro.
#[sqlx::test(migrations = "./migrations")]
async fn asignar_rechaza_no_admin(pool: SqlitePool) {
    let (id, _) = crear_solicitud(&pool).await;
    let mecanico_id = crear_empleado(&pool, "beto@llantera.mx", Rol::Mecanico).await;
    let token = login(&pool, "beto@llantera.mx").await;

    let app = build_test_app(pool.clone());
    let response = post_json_auth(
        app,
        &format!("/api/solicitudes/{id}/asignar"),
        asignar_body(mecanico_id),
        &token,
    )
    .await;

    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let asignaciones = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM asignaciones")
        .fetch_one(&pool)
        .await
        .expect("la consulta debe funcionar");
    assert_eq!(asignaciones, 0);
}

/// Asignar y reasignar: la solicitud conserva una sola asignación
/// vigente y la bitácora acumula ambos eventos, en orden.
#[sqlx::test(migrations = "./migrations")]
async fn asignar_y_reasignar_acumula_bitacora(pool: SqlitePool) {
    let (id, codigo) = crear_solicitud(&pool).await;
    crear_empleado(&pool, "jefa@llantera.mx", Rol::Admin).await;
    let beto_id = crear_empleado(&pool, "beto@llantera.mx", Rol::Mecanico).await;
    let chuy_id = crear_empleado(&pool, "chuy@llantera.mx", Rol::Mecanico).await;
    let token = login(&pool, "jefa@llantera.mx").await;

    let app = build_test_app(pool.clone());
    let response = post_json_auth(
        app,
        &format!("/api/solicitudes/{id}/asignar"),
        asignar_body(beto_id),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["usuario_id"], beto_id);

    let app = build_test_app(pool.clone());
    let response = post_json_auth(
        app,
        &format!("/api/solicitudes/{id}/asignar"),
        asignar_body(chuy_id),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["usuario_id"], chuy_id);

    // Una sola fila vigente por solicitud.
    let asignaciones = sqlx::query_scalar::<_, i64>(
        "SELECT COUNT(*) FROM asignaciones WHERE solicitud_id = ?",
    )
    .bind(id)
    .fetch_one(&pool)
    .await
    .expect("la consulta debe funcionar");
    assert_eq!(asignaciones, 1);

    // La bitácora conserva la historia completa, en orden de inserción.
    let app = build_test_app(pool);
    let response = get(app, &format!("/api/tracker/{codigo}")).await;
    let json = body_json(response).await;
    let timeline = json["timeline"].as_array().expect("debe traer timeline");
    assert_eq!(timeline.len(), 2);
    assert_eq!(timeline[0]["tipo_evento"], "asignacion");
    assert_eq!(timeline[1]["tipo_evento"], "reasignacion");
}

/// Asignar a un empleado inexistente falla completo: ni asignación ni
/// evento de bitácora a medias.
#[sqlx::test(migrations = "./migrations")]
async fn asignar_empleado_inexistente_no_escribe_nada(pool: SqlitePool) {
    let (id, _) = crear_solicitud(&pool).await;
    crear_empleado(&pool, "jefa@llantera.mx", Rol::Admin).await;
    let token = login(&pool, "jefa@llantera.mx").await;

    let app = build_test_app(pool.clone());
    let response = post_json_auth(
        app,
        &format!("/api/solicitudes/{id}/asignar"),
        asignar_body(999),
        &token,
    )
    .await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let asignaciones = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM asignaciones")
        .fetch_one(&pool)
        .await
        .expect("la consulta debe funcionar");
    let eventos = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM bitacora")
        .fetch_one(&pool)
        .await
        .expect("la consulta debe funcionar");
    assert_eq!(asignaciones, 0);
    assert_eq!(eventos, 0);
}

/// Tampoco se asigna a un empleado dado de baja.
#[sqlx::test(migrations = "./migrations")]
async fn asignar_empleado_inactivo(pool: SqlitePool) {
    let (id, _) = crear_solicitud(&pool).await;
    crear_empleado(&pool, "jefa@llantera.mx", Rol::Admin).await;
    let beto_id = crear_empleado(&pool, "beto@llantera.mx", Rol::Mecanico).await;
    sqlx::query("UPDATE usuarios SET activo = 0 WHERE id = ?")
        .bind(beto_id)
        .execute(&pool)
        .await
        .expect("la baja directa debe funcionar");
    let token = login(&pool, "jefa@llantera.mx").await;

    let app = build_test_app(pool.clone());
    let response = post_json_auth(
        app,
        &format!("/api/solicitudes/{id}/asignar"),
        asignar_body(beto_id),
        &token,
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let asignaciones = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM asignaciones")
        .fetch_one(&pool)
        .await
        .expect("la consulta debe funcionar");
    assert_eq!(asignaciones, 0);
}

/// El listado del portal muestra el nombre del asignado tras asignar.
#[sqlx::test(migrations = "./migrations")]
async fn listado_muestra_asignado(pool: SqlitePool) {
    let (id, _) = crear_solicitud(&pool).await;
    crear_empleado(&pool, "jefa@llantera.mx", Rol::Admin).await;
    let beto_id = crear_empleado(&pool, "beto@llantera.mx", Rol::Mecanico).await;
    let token = login(&pool, "jefa@llantera.mx").await;

    let app = build_test_app(pool.clone());
    post_json_auth(
        app,
        &format!("/api/solicitudes/{id}/asignar"),
        asignar_body(beto_id),
        &token,
    )
    .await;

    let app = build_test_app(pool);
    let response = get_auth(app, "/api/solicitudes", &token).await;
    let json = body_json(response).await;
    let solicitudes = json.as_array().expect("el cuerpo debe ser un arreglo");
    assert_eq!(solicitudes[0]["asignado_id"], beto_id);
    assert_eq!(solicitudes[0]["asignado_nombre"], "Empleado de Prueba");
    assert_eq!(solicitudes[0]["notas_asignacion"], "Llegó en grúa");
}

// ---------------------------------------------------------------------------
// Mis solicitudes
// ---------------------------------------------------------------------------

/// Cada mecánico ve únicamente lo que tiene asignado.
#[sqlx::test(migrations = "./migrations")]
async fn mis_solicitudes_solo_lo_propio(pool: SqlitePool) {
    let (primera_id, _) = crear_solicitud(&pool).await;
    let (segunda_id, _) = crear_solicitud(&pool).await;
    crear_empleado(&pool, "jefa@llantera.mx", Rol::Admin).await;
    let beto_id = crear_empleado(&pool, "beto@llantera.mx", Rol::Mecanico).await;
    let chuy_id = crear_empleado(&pool, "chuy@llantera.mx", Rol::Mecanico).await;

    let token_admin = login(&pool, "jefa@llantera.mx").await;
    let app = build_test_app(pool.clone());
    post_json_auth(
        app,
        &format!("/api/solicitudes/{primera_id}/asignar"),
        asignar_body(beto_id),
        &token_admin,
    )
    .await;
    let app = build_test_app(pool.clone());
    post_json_auth(
        app,
        &format!("/api/solicitudes/{segunda_id}/asignar"),
        asignar_body(chuy_id),
        &token_admin,
    )
    .await;

    let token_beto = login(&pool, "beto@llantera.mx").await;
    let app = build_test_app(pool);
    let response = get_auth(app, "/api/empleado/mis-solicitudes", &token_beto).await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    let solicitudes = json.as_array().expect("el cuerpo debe ser un arreglo");
    assert_eq!(solicitudes.len(), 1);
    assert_eq!(solicitudes[0]["id"], primera_id);
}
