// src/common/random.rs

use rand::Rng;

/// Longitud del token opaco de sesión.
pub const TOKEN_SESION_LEN: usize = 32;

/// Prefijo fijo de todo código de seguimiento.
pub const TRACKER_PREFIX: &str = "TM";

/// Cantidad de caracteres aleatorios después del prefijo.
pub const TRACKER_SUFIJO_LEN: usize = 6;

// Alfabeto del código de seguimiento: solo mayúsculas y dígitos.
const TRACKER_ALFABETO: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

/// Genera un token de sesión opaco (alfanumérico, CSPRNG del sistema).
pub fn generar_token_sesion() -> String {
    rand::rng()
        .sample_iter(&rand::distr::Alphanumeric)
        .take(TOKEN_SESION_LEN)
        .map(char::from)
        .collect()
}

/// Genera un código de seguimiento candidato, p. ej. `TM4K9ZQ2`.
///
/// La unicidad no se garantiza acá: el alta reintenta con otro código
/// cuando la inserción choca con el índice UNIQUE de `codigo_tracker`.
pub fn generar_codigo_tracker() -> String {
    let mut rng = rand::rng();
    let mut codigo = String::with_capacity(TRACKER_PREFIX.len() + TRACKER_SUFIJO_LEN);
    codigo.push_str(TRACKER_PREFIX);
    for _ in 0..TRACKER_SUFIJO_LEN {
        let idx = rng.random_range(0..TRACKER_ALFABETO.len());
        codigo.push(TRACKER_ALFABETO[idx] as char);
    }
    codigo
}
