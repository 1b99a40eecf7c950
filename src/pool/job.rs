//! # Job
//! src/pool/job.rs
//!
//! Un job es una conexión aceptada más el instante en que llegó. Lo crea el
//! acceptor, lo guarda la cola y lo consume exactamente un worker.

use std::net::TcpStream;
use std::time::{Duration, Instant, SystemTime, UNIX_EPOCH};

/// Conexión pendiente de atender
#[derive(Debug)]
pub struct Job {
    /// Socket del cliente; se cierra al soltar el job
    stream: TcpStream,

    /// Hora de pared de llegada (para `Stat-Req-Arrival`)
    arrival: SystemTime,

    /// Reloj monótono de llegada (para medir el dispatch)
    arrived_at: Instant,
}

impl Job {
    /// Crea un job estampando la hora actual
    pub fn new(stream: TcpStream) -> Self {
        Self {
            stream,
            arrival: SystemTime::now(),
            arrived_at: Instant::now(),
        }
    }

    /// Hora de llegada como duración desde la época Unix
    pub fn arrival(&self) -> Duration {
        self.arrival.duration_since(UNIX_EPOCH).unwrap_or_default()
    }

    /// Tiempo transcurrido entre la llegada y `now`
    pub fn dispatch_at(&self, now: Instant) -> Duration {
        now.saturating_duration_since(self.arrived_at)
    }

    /// Entrega el socket y la hora de llegada al worker
    pub fn into_parts(self) -> (TcpStream, Duration) {
        let arrival = self.arrival();
        (self.stream, arrival)
    }
}
