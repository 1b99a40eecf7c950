//! # Errores del Servidor
//! src/error.rs
//!
//! Dos niveles de error:
//!
//! - [`ServerError`]: fallas del proceso (bind, configuración, señales). Suben
//!   hasta `main` y terminan el programa.
//! - [`HandlerError`]: fallas de un request. Se convierten en una respuesta de
//!   error y nunca salen del worker que las produjo.

use crate::http::{ParseError, Response, StatusCode};
use thiserror::Error;

/// Errores a nivel de proceso
#[derive(Debug, Error)]
pub enum ServerError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("could not install signal handler: {0}")]
    Signal(#[from] ctrlc::Error),

    #[error("could not initialise logging: {0}")]
    Logging(String),
}

/// Errores a nivel de request
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum HandlerError {
    /// El path resuelto no existe
    #[error("not found: {path}")]
    NotFound { path: String },

    /// El path resuelto existe pero no es legible
    #[error("forbidden: {path}")]
    Forbidden { path: String },

    /// Método distinto de GET/POST
    #[error("method not implemented: {method}")]
    NotImplemented { method: String },

    /// Request line imposible de parsear
    #[error("malformed request: {0}")]
    MalformedRequest(ParseError),
}

impl HandlerError {
    /// Código HTTP asociado a cada tipo de error
    pub fn status(&self) -> StatusCode {
        match self {
            HandlerError::NotFound { .. } => StatusCode::NotFound,
            HandlerError::Forbidden { .. } => StatusCode::Forbidden,
            HandlerError::NotImplemented { .. } => StatusCode::NotImplemented,
            HandlerError::MalformedRequest(_) => StatusCode::BadRequest,
        }
    }

    /// Construye la página de error correspondiente
    pub fn to_response(&self) -> Response {
        let status = self.status();
        match self {
            HandlerError::NotFound { path } => {
                Response::error(status, "OS-HW3 Server could not find this file", path)
            }
            HandlerError::Forbidden { path } => {
                Response::error(status, "OS-HW3 Server could not read this file", path)
            }
            HandlerError::NotImplemented { method } => {
                Response::error(status, "OS-HW3 Server does not implement this method", method)
            }
            HandlerError::MalformedRequest(e) => Response::error(
                status,
                "OS-HW3 Server could not parse this request",
                &e.to_string(),
            ),
        }
    }
}

impl From<ParseError> for HandlerError {
    fn from(e: ParseError) -> Self {
        match e {
            ParseError::UnsupportedMethod(method) => HandlerError::NotImplemented { method },
            other => HandlerError::MalformedRequest(other),
        }
    }
}
