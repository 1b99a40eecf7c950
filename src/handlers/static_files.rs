//! # Contenido Estático
//! src/handlers/static_files.rs
//!
//! Lee un archivo ya resuelto y lo devuelve sin transformar (binario seguro).
//!
//! | Condición                                  | Resultado |
//! |--------------------------------------------|-----------|
//! | no existe                                  | 404       |
//! | no es archivo regular o sin permiso        | 403       |
//! | legible                                    | 200       |

use crate::error::HandlerError;
use crate::http::Response;
use std::fs;
use std::io::{self, ErrorKind};
use std::path::Path;

/// Tipo MIME según la extensión del archivo
///
/// # Ejemplo
/// ```
/// use pool_server::handlers::static_files::mime_type;
///
/// assert_eq!(mime_type("./public//home.html"), "text/html");
/// assert_eq!(mime_type("./public//cat.jpeg"), "image/jpeg");
/// assert_eq!(mime_type("./public//notes.txt"), "text/plain");
/// ```
pub fn mime_type(path: &str) -> &'static str {
    match Path::new(path).extension().and_then(|ext| ext.to_str()) {
        Some("html") => "text/html",
        Some("jpg") | Some("jpeg") => "image/jpeg",
        Some("gif") => "image/gif",
        _ => "text/plain",
    }
}

/// Sirve el archivo en `resolved`
pub fn serve(resolved: &str) -> Result<Response, HandlerError> {
    let metadata = fs::metadata(resolved).map_err(|e| io_to_handler_error(e, resolved))?;
    if !metadata.is_file() {
        return Err(HandlerError::Forbidden {
            path: resolved.to_string(),
        });
    }

    let bytes = fs::read(resolved).map_err(|e| io_to_handler_error(e, resolved))?;
    Ok(Response::content(mime_type(resolved), bytes))
}

fn io_to_handler_error(e: io::Error, resolved: &str) -> HandlerError {
    let path = resolved.to_string();
    match e.kind() {
        ErrorKind::NotFound => HandlerError::NotFound { path },
        _ => HandlerError::Forbidden { path },
    }
}
