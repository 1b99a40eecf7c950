//! # Registro de Estadísticas
//! src/stats/registry.rs
//!
//! Contadores globales y por worker, más el bloque de headers `Stat-*` que
//! acompaña a cada respuesta.
//!
//! - [`GlobalStats`] lo modifican todos los workers: usa atómicos.
//! - [`WorkerState`] lo modifica solo su worker dueño: campos planos, sin lock.
//!
//! El conteo es inclusivo: los headers de una respuesta ya reflejan el
//! incremento del propio request.

use crate::http::Response;
use serde::Serialize;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

pub const STAT_REQ_ARRIVAL: &str = "Stat-Req-Arrival:";
pub const STAT_REQ_DISPATCH: &str = "Stat-Req-Dispatch:";
pub const STAT_THREAD_ID: &str = "Stat-Thread-Id:";
pub const STAT_THREAD_COUNT: &str = "Stat-Thread-Count:";
pub const STAT_THREAD_STATIC: &str = "Stat-Thread-Static:";
pub const STAT_THREAD_DYNAMIC: &str = "Stat-Thread-Dynamic:";
pub const STAT_THREAD_POST: &str = "Stat-Thread-Post:";

/// Tipo de request ya resuelto, para decidir qué contadores mover
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestKind {
    /// Archivo servido desde el directorio de contenido
    Static,

    /// Script dinámico (`output.cgi`)
    Dynamic,

    /// Reporte de estadísticas
    Post,

    /// Cualquier respuesta de error
    Error,
}

/// Contadores de todo el proceso
#[derive(Debug, Default)]
pub struct GlobalStats {
    total_requests: AtomicU64,
    static_requests: AtomicU64,
    dynamic_requests: AtomicU64,
    post_requests: AtomicU64,
}

/// Foto de los contadores globales
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct StatsSnapshot {
    pub total_requests: u64,
    pub static_requests: u64,
    pub dynamic_requests: u64,
    pub post_requests: u64,
}

impl GlobalStats {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registra un request terminado y retorna los contadores resultantes
    ///
    /// Cada campo se incrementa con su propio `fetch_add`; el valor devuelto
    /// para el contador que se movió incluye este request.
    pub fn record(&self, kind: RequestKind) -> StatsSnapshot {
        let total_requests = self.total_requests.fetch_add(1, Ordering::SeqCst) + 1;

        let bump = |counter: &AtomicU64, hit: bool| {
            if hit {
                counter.fetch_add(1, Ordering::SeqCst) + 1
            } else {
                counter.load(Ordering::SeqCst)
            }
        };

        StatsSnapshot {
            total_requests,
            static_requests: bump(&self.static_requests, kind == RequestKind::Static),
            dynamic_requests: bump(&self.dynamic_requests, kind == RequestKind::Dynamic),
            post_requests: bump(&self.post_requests, kind == RequestKind::Post),
        }
    }

    /// Lee los contadores sin modificarlos
    pub fn snapshot(&self) -> StatsSnapshot {
        StatsSnapshot {
            total_requests: self.total_requests.load(Ordering::SeqCst),
            static_requests: self.static_requests.load(Ordering::SeqCst),
            dynamic_requests: self.dynamic_requests.load(Ordering::SeqCst),
            post_requests: self.post_requests.load(Ordering::SeqCst),
        }
    }
}

/// Identidad y contadores de un worker
///
/// Se crea al levantar el pool y vive dentro del thread dueño.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkerState {
    id: usize,
    count: u64,
    static_count: u64,
    dynamic_count: u64,
}

impl WorkerState {
    /// `id` empieza en 1
    pub fn new(id: usize) -> Self {
        Self {
            id,
            count: 0,
            static_count: 0,
            dynamic_count: 0,
        }
    }

    pub fn record(&mut self, kind: RequestKind) {
        self.count += 1;
        match kind {
            RequestKind::Static => self.static_count += 1,
            RequestKind::Dynamic => self.dynamic_count += 1,
            RequestKind::Post | RequestKind::Error => {}
        }
    }

    pub fn id(&self) -> usize {
        self.id
    }

    pub fn count(&self) -> u64 {
        self.count
    }

    pub fn static_count(&self) -> u64 {
        self.static_count
    }

    pub fn dynamic_count(&self) -> u64 {
        self.dynamic_count
    }
}

/// Valores del bloque `Stat-*` de una respuesta
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatHeaders {
    pub arrival: Duration,
    pub dispatch: Duration,
    pub thread_id: usize,
    pub thread_count: u64,
    pub thread_static: u64,
    pub thread_dynamic: u64,
    pub post_count: u64,
}

/// Formato `segundos.microsegundos` con 6 dígitos
pub fn format_timeval(d: Duration) -> String {
    format!("{}.{:06}", d.as_secs(), d.subsec_micros())
}

impl StatHeaders {
    /// Pares nombre/valor en el orden del contrato
    ///
    /// Los nombres llevan ':' al final, por eso en el cable quedan como
    /// `Stat-Thread-Id:: 1`.
    pub fn lines(&self) -> [(&'static str, String); 7] {
        [
            (STAT_REQ_ARRIVAL, format_timeval(self.arrival)),
            (STAT_REQ_DISPATCH, format_timeval(self.dispatch)),
            (STAT_THREAD_ID, self.thread_id.to_string()),
            (STAT_THREAD_COUNT, self.thread_count.to_string()),
            (STAT_THREAD_STATIC, self.thread_static.to_string()),
            (STAT_THREAD_DYNAMIC, self.thread_dynamic.to_string()),
            (STAT_THREAD_POST, self.post_count.to_string()),
        ]
    }

    /// Agrega el bloque al final de los headers de la respuesta
    pub fn apply(&self, response: &mut Response) {
        for (name, value) in self.lines() {
            response.add_header(name, &value);
        }
    }

    /// Entrada para el log de requests: las siete líneas unidas por `\r\n`
    pub fn log_entry(&self) -> String {
        self.lines()
            .iter()
            .map(|(name, value)| format!("{}: {}", name, value))
            .collect::<Vec<_>>()
            .join("\r\n")
    }
}
