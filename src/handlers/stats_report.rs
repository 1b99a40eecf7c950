//! # Reporte de Estadísticas
//! src/handlers/stats_report.rs
//!
//! Respuesta a cualquier POST: el log de bloques `Stat-*` en texto plano.

use crate::http::Response;
use crate::stats::Registry;

pub fn report(registry: &Registry) -> Response {
    Response::content("text/plain", registry.log().render().into_bytes())
}
