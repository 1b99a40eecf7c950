//! # Pool de Workers
//! src/pool/worker.rs
//!
//! `N` threads fijos creados al arrancar. Cada uno repite:
//!
//! 1. Bloquearse en la cola hasta tener un job
//! 2. Medir el dispatch (llegada → ahora)
//! 3. Atender la conexión completa con el handler
//!
//! El pool nunca crece ni se achica: un pánico dentro del handler se registra
//! y el worker sigue con el próximo job. Al cerrar la cola los workers
//! terminan los jobs pendientes y salen del loop.

use crate::pool::{AdmissionQueue, Job};
use crate::stats::WorkerState;
use std::io;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

/// Función que atiende un job en el thread del worker
///
/// Recibe el job, su tiempo de dispatch y el estado del worker.
pub type JobHandler = Arc<dyn Fn(Job, Duration, &mut WorkerState) + Send + Sync + 'static>;

/// Un thread del pool
struct Worker {
    id: usize,
    handle: JoinHandle<WorkerState>,
}

/// Pool fijo de workers
pub struct WorkerPool {
    workers: Vec<Worker>,
    queue: AdmissionQueue<Job>,
}

impl WorkerPool {
    /// Levanta `size` workers consumiendo de `queue`
    ///
    /// Los ids van de 1 a `size`.
    pub fn new(size: usize, queue: AdmissionQueue<Job>, handler: JobHandler) -> io::Result<Self> {
        let mut workers = Vec::with_capacity(size);

        for id in 1..=size {
            let queue_clone = queue.clone();
            let handler = Arc::clone(&handler);

            let spawned = thread::Builder::new()
                .name(format!("worker-{}", id))
                .spawn(move || worker_loop(WorkerState::new(id), queue_clone, handler));

            match spawned {
                Ok(handle) => workers.push(Worker { id, handle }),
                Err(e) => {
                    // Los workers ya creados salen al ver la cola cerrada
                    queue.close();
                    return Err(e);
                }
            }
        }

        info!(workers = size, "worker pool started");
        Ok(Self { workers, queue })
    }

    /// Cantidad de workers vivos
    pub fn size(&self) -> usize {
        self.workers.len()
    }

    /// Cierra la cola y espera a que todos los workers terminen
    ///
    /// Retorna el estado final de cada worker, en orden de id.
    pub fn shutdown(self) -> Vec<WorkerState> {
        self.queue.close();

        let mut states = Vec::with_capacity(self.workers.len());
        for worker in self.workers {
            match worker.handle.join() {
                Ok(state) => states.push(state),
                Err(_) => warn!(worker = worker.id, "worker panicked"),
            }
        }

        info!("worker pool stopped");
        states
    }
}

/// Loop principal del worker
fn worker_loop(mut state: WorkerState, queue: AdmissionQueue<Job>, handler: JobHandler) -> WorkerState {
    debug!(worker = state.id(), "worker started");

    while let Some(job) = queue.dequeue() {
        let dispatch = job.dispatch_at(Instant::now());
        debug!(
            worker = state.id(),
            dispatch_us = dispatch.as_micros() as u64,
            "job dispatched"
        );
        let outcome = panic::catch_unwind(AssertUnwindSafe(|| handler(job, dispatch, &mut state)));
        if outcome.is_err() {
            warn!(worker = state.id(), "handler panicked, connection dropped");
        }
    }

    debug!(worker = state.id(), served = state.count(), "worker exiting");
    state
}
