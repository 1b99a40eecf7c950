//! # Estadísticas del Servidor
//! src/stats/mod.rs
//!
//! Estado compartido por todos los workers: contadores globales, log de
//! requests servidos y el último path atendido.

pub mod log;
pub mod registry;

pub use log::RequestLog;
pub use registry::{format_timeval, GlobalStats, RequestKind, StatHeaders, StatsSnapshot, WorkerState};

use std::sync::{Mutex, PoisonError};
use std::time::Duration;

/// Estado compartido entre workers
#[derive(Debug, Default)]
pub struct Registry {
    global: GlobalStats,
    log: RequestLog,
    last_path: Mutex<Option<String>>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registra un request terminado y arma sus headers `Stat-*`
    ///
    /// Primero se actualiza el worker, después los contadores globales. Los
    /// valores devueltos ya incluyen este request.
    pub fn record(
        &self,
        worker: &mut WorkerState,
        kind: RequestKind,
        arrival: Duration,
        dispatch: Duration,
    ) -> StatHeaders {
        worker.record(kind);
        let global = self.global.record(kind);

        StatHeaders {
            arrival,
            dispatch,
            thread_id: worker.id(),
            thread_count: worker.count(),
            thread_static: worker.static_count(),
            thread_dynamic: worker.dynamic_count(),
            post_count: global.post_requests,
        }
    }

    /// Guarda el bloque `Stat-*` en el log de requests
    pub fn log_response(&self, headers: &StatHeaders) {
        self.log.append(headers.log_entry());
    }

    pub fn set_last_path(&self, path: &str) {
        *self.last_path.lock().unwrap_or_else(PoisonError::into_inner) = Some(path.to_string());
    }

    /// Último path atendido, si hubo alguno
    pub fn last_path(&self) -> Option<String> {
        self.last_path
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn snapshot(&self) -> StatsSnapshot {
        self.global.snapshot()
    }

    pub fn log(&self) -> &RequestLog {
        &self.log
    }
}
