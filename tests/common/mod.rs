// Cada binario de tests compila su propia copia de este módulo y no
// todos usan todos los helpers.
#![allow(dead_code)]

use axum::body::Body;
use axum::http::header::{AUTHORIZATION, CONTENT_TYPE};
use axum::http::{Method, Request};
use axum::response::Response;
use axum::Router;
use http_body_util::BodyExt;
use sqlx::SqlitePool;
use tower::ServiceExt;

use llantera_backend::config::AppState;
use llantera_backend::routes::crear_router;

/// Expiración corta y conocida para las sesiones de los tests.
pub const TEST_SESSION_EXPIRY_HOURS: i64 = 8;

/// Arma el router completo de la aplicación sobre el pool de test.
///
/// Refleja la construcción de `main.rs` para que los tests ejerciten
/// exactamente el mismo árbol de rutas y extractores que producción.
pub fn build_test_app(pool: SqlitePool) -> Router {
    let app_state = AppState::build(pool, TEST_SESSION_EXPIRY_HOURS);
    crear_router(app_state)
}

// ---------------------------------------------------------------------------
// Helpers HTTP (tower::ServiceExt::oneshot contra el router)
// ---------------------------------------------------------------------------

async fn send(app: Router, request: Request<Body>) -> Response {
    app.oneshot(request).await.expect("la request no debe fallar")
}

fn json_request(method: Method, path: &str, body: serde_json::Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(path)
        .header(CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .expect("request válida")
}

fn json_request_auth(
    method: Method,
    path: &str,
    body: serde_json::Value,
    token: &str,
) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(path)
        .header(CONTENT_TYPE, "application/json")
        .header(AUTHORIZATION, format!("Bearer {token}"))
        .body(Body::from(body.to_string()))
        .expect("request válida")
}

pub async fn get(app: Router, path: &str) -> Response {
    let request = Request::builder()
        .method(Method::GET)
        .uri(path)
        .body(Body::empty())
        .expect("request válida");
    send(app, request).await
}

pub async fn get_auth(app: Router, path: &str, token: &str) -> Response {
    let request = Request::builder()
        .method(Method::GET)
        .uri(path)
        .header(AUTHORIZATION, format!("Bearer {token}"))
        .body(Body::empty())
        .expect("request válida");
    send(app, request).await
}

pub async fn post_json(app: Router, path: &str, body: serde_json::Value) -> Response {
    send(app, json_request(Method::POST, path, body)).await
}

pub async fn post_json_auth(
    app: Router,
    path: &str,
    body: serde_json::Value,
    token: &str,
) -> Response {
    send(app, json_request_auth(Method::POST, path, body, token)).await
}

pub async fn post_auth(app: Router, path: &str, token: &str) -> Response {
    let request = Request::builder()
        .method(Method::POST)
        .uri(path)
        .header(AUTHORIZATION, format!("Bearer {token}"))
        .body(Body::empty())
        .expect("request válida");
    send(app, request).await
}

pub async fn put_json_auth(
    app: Router,
    path: &str,
    body: serde_json::Value,
    token: &str,
) -> Response {
    send(app, json_request_auth(Method::PUT, path, body, token)).await
}

pub async fn delete_auth(app: Router, path: &str, token: &str) -> Response {
    let request = Request::builder()
        .method(Method::DELETE)
        .uri(path)
        .header(AUTHORIZATION, format!("Bearer {token}"))
        .body(Body::empty())
        .expect("request válida");
    send(app, request).await
}

/// Lee el cuerpo completo de la respuesta y lo parsea como JSON.
pub async fn body_json(response: Response) -> serde_json::Value {
    let bytes = response
        .into_body()
        .collect()
        .await
        .expect("el cuerpo debe poder leerse")
        .to_bytes();
    serde_json::from_slice(&bytes).expect("el cuerpo debe ser JSON válido")
}

/// Lee el cuerpo completo de la respuesta como texto plano.
pub async fn body_text(response: Response) -> String {
    let bytes = response
        .into_body()
        .collect()
        .await
        .expect("el cuerpo debe poder leerse")
        .to_bytes();
    String::from_utf8(bytes.to_vec()).expect("el cuerpo debe ser UTF-8")
}
