//! # Contenido Dinámico
//! src/handlers/dynamic.rs
//!
//! Simula un script CGI: duerme los segundos pedidos y responde con los
//! contadores globales leídos después de dormir.
//!
//! Solo bloquea al worker que lo atiende; el resto del pool sigue sacando
//! jobs de la cola.

use crate::http::Response;
use crate::stats::{Registry, StatsSnapshot};
use std::thread;
use std::time::Duration;

/// Duerme `seconds` y arma la página
pub fn run(seconds: f64, registry: &Registry) -> Response {
    let delay = Duration::try_from_secs_f64(seconds).unwrap_or(Duration::ZERO);
    if !delay.is_zero() {
        thread::sleep(delay);
    }

    let body = render(&registry.snapshot(), seconds);
    Response::content("text/html", body.into_bytes())
}

/// Body del script
///
/// # Ejemplo
/// ```
/// use pool_server::handlers::dynamic::render;
/// use pool_server::stats::StatsSnapshot;
///
/// let snapshot = StatsSnapshot {
///     total_requests: 4,
///     static_requests: 2,
///     dynamic_requests: 1,
///     post_requests: 0,
/// };
/// assert_eq!(render(&snapshot, 1.0).len(), 123);
/// ```
pub fn render(snapshot: &StatsSnapshot, seconds: f64) -> String {
    format!(
        "<p>Welcome to the dynamic CGI program</p>\r\n\
         <p>Requests served: {} Static: {} Dynamic: {}</p>\r\n\
         <p>I slept for {:.1} seconds</p>\r\n",
        snapshot.total_requests, snapshot.static_requests, snapshot.dynamic_requests, seconds,
    )
}
