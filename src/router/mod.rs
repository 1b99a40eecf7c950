//! # Sistema de Routing
//! src/router/mod.rs
//!
//! Clasifica cada request ya parseado en una [`Route`] y la ejecuta con el
//! handler correspondiente.
//!
//! ```text
//! Request → Router::resolve → Route → handler → (RequestKind, Response)
//! ```
//!
//! | Request                   | Route         |
//! |---------------------------|---------------|
//! | `POST <cualquier path>`   | `StatsReport` |
//! | `GET /output.cgi?<secs>`  | `Dynamic`     |
//! | `GET /otro.cgi` inexistente | 404         |
//! | `GET /otro.cgi` existente | 403           |
//! | `GET /` o `GET /dir/`     | `Static` con `home.html` |
//! | `GET /<path>`             | `Static`      |

use crate::error::HandlerError;
use crate::handlers;
use crate::http::{Method, Request, Response};
use crate::stats::{Registry, RequestKind};
use std::fs;
use std::io::ErrorKind;

/// Nombre del único script dinámico
pub const DYNAMIC_SCRIPT: &str = "/output.cgi";

/// Archivo servido cuando el path termina en '/'
pub const INDEX_FILE: &str = "home.html";

/// Destino de un request
#[derive(Debug, Clone, PartialEq)]
pub enum Route {
    /// Archivo bajo el directorio de contenido (path ya resuelto)
    Static { resolved: String },

    /// Script dinámico con sus segundos de espera
    Dynamic { seconds: f64 },

    /// Reporte del log de estadísticas
    StatsReport,
}

/// Router con el directorio raíz del contenido
#[derive(Debug, Clone)]
pub struct Router {
    content_root: String,
}

impl Router {
    pub fn new(content_root: impl Into<String>) -> Self {
        Self {
            content_root: content_root.into(),
        }
    }

    pub fn content_root(&self) -> &str {
        &self.content_root
    }

    /// Path en disco para un path de request
    ///
    /// Se concatena tal cual, sin normalizar: `/x.html` con raíz `./public`
    /// queda `./public//x.html`.
    ///
    /// # Ejemplo
    /// ```
    /// use pool_server::router::Router;
    ///
    /// let router = Router::new("./public");
    /// assert_eq!(router.resolve_path("/"), "./public//home.html");
    /// assert_eq!(router.resolve_path("/a.gif"), "./public//a.gif");
    /// ```
    pub fn resolve_path(&self, path: &str) -> String {
        let mut resolved = format!("{}/{}", self.content_root, path);
        if path.ends_with('/') {
            resolved.push_str(INDEX_FILE);
        }
        resolved
    }

    /// Decide la ruta de un request
    pub fn resolve(&self, request: &Request) -> Result<Route, HandlerError> {
        if request.method() == Method::POST {
            return Ok(Route::StatsReport);
        }

        let path = request.path();

        if path.ends_with(".cgi") {
            if path == DYNAMIC_SCRIPT {
                return Ok(Route::Dynamic {
                    seconds: parse_seconds(request.query()),
                });
            }
            return Err(unknown_script(self.resolve_path(path)));
        }

        let resolved = self.resolve_path(path);
        if path.split('/').any(|segment| segment == "..") {
            return Err(HandlerError::Forbidden { path: resolved });
        }

        Ok(Route::Static { resolved })
    }

    /// Resuelve y ejecuta el request
    ///
    /// Retorna el tipo de request para los contadores junto con la respuesta.
    pub fn route(
        &self,
        request: &Request,
        registry: &Registry,
    ) -> Result<(RequestKind, Response), HandlerError> {
        match self.resolve(request)? {
            Route::Static { resolved } => {
                let response = handlers::static_files::serve(&resolved)?;
                Ok((RequestKind::Static, response))
            }
            Route::Dynamic { seconds } => {
                let response = handlers::dynamic::run(seconds, registry);
                Ok((RequestKind::Dynamic, response))
            }
            Route::StatsReport => {
                let response = handlers::stats_report::report(registry);
                Ok((RequestKind::Post, response))
            }
        }
    }
}

impl Default for Router {
    fn default() -> Self {
        Self::new("./public")
    }
}

/// Error para un `.cgi` distinto de `output.cgi`
///
/// Si el archivo existe no es un script ejecutable por el servidor: 403.
/// Si no existe: 404.
fn unknown_script(resolved: String) -> HandlerError {
    match fs::metadata(&resolved) {
        Err(e) if e.kind() == ErrorKind::NotFound => HandlerError::NotFound { path: resolved },
        _ => HandlerError::Forbidden { path: resolved },
    }
}

/// Segundos pedidos al script dinámico
///
/// Cualquier valor ausente, no numérico, negativo o infinito vale 0.
pub fn parse_seconds(query: Option<&str>) -> f64 {
    query
        .and_then(|q| q.trim().parse::<f64>().ok())
        .filter(|secs| secs.is_finite() && *secs >= 0.0)
        .unwrap_or(0.0)
}
