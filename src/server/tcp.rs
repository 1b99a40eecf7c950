//! # Servidor TCP con Pool Fijo
//! src/server/tcp.rs
//!
//! El thread principal solo acepta conexiones y las encola. Todo el trabajo
//! (leer, parsear, rutear, responder) lo hacen los workers del pool.
//!
//! ```text
//! accept → Job → try_enqueue ─┬─ Ok   → worker → handle_connection
//!                             └─ Full → se cierra la conexión sin responder
//! ```

use crate::config::Config;
use crate::error::{HandlerError, ServerError};
use crate::http::request::find_header_end;
use crate::http::Request;
use crate::pool::{AdmissionQueue, EnqueueError, Job, JobHandler, WorkerPool};
use crate::router::Router;
use crate::stats::{Registry, RequestKind, StatsSnapshot, WorkerState};
use serde::Serialize;
use std::io::{self, Read, Write};
use std::net::{IpAddr, Ipv4Addr, Ipv6Addr, Shutdown, SocketAddr, TcpListener, TcpStream};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Tamaño de cada lectura del socket
const READ_CHUNK: usize = 4096;

/// Máximo de bytes aceptados para request line + headers
const MAX_HEAD_BYTES: usize = 64 * 1024;

/// Máximo de bytes de body que se consumen en un POST
const MAX_BODY_BYTES: usize = 64 * 1024;

/// Un cliente que no envía nada no retiene al worker para siempre
const READ_TIMEOUT: Duration = Duration::from_secs(30);

/// Servidor HTTP/1.0 con cola de admisión y pool fijo
pub struct Server {
    config: Config,
    listener: TcpListener,
    router: Arc<Router>,
    registry: Arc<Registry>,
    running: Arc<AtomicBool>,
}

/// Permite detener el accept loop desde otro thread (señales, tests)
#[derive(Debug, Clone)]
pub struct ShutdownHandle {
    running: Arc<AtomicBool>,
    wake_addr: SocketAddr,
}

/// Resultado de una ejecución completa del servidor
#[derive(Debug, Clone, Serialize)]
pub struct ServerSummary {
    pub stats: StatsSnapshot,
    pub last_path: Option<String>,
    pub served_per_worker: Vec<u64>,
}

impl ShutdownHandle {
    /// Marca el servidor como detenido y despierta al accept bloqueado
    ///
    /// Llamarlo más de una vez no tiene efecto.
    pub fn shutdown(&self) {
        if self.running.swap(false, Ordering::SeqCst) {
            // El accept loop revisa la bandera al recibir esta conexión
            let _ = TcpStream::connect(self.wake_addr);
        }
    }
}

impl Server {
    /// Valida la configuración y abre el socket de escucha
    ///
    /// Después de esta llamada el kernel ya acepta conexiones (quedan en el
    /// backlog hasta que arranque [`Server::run`]).
    pub fn bind(config: Config) -> Result<Self, ServerError> {
        config.validate().map_err(ServerError::InvalidConfig)?;

        let address = config.address();
        let listener = TcpListener::bind(&address)?;
        info!(address = %address, "listening");

        let router = Router::new(config.public_dir.clone());

        Ok(Self {
            config,
            listener,
            router: Arc::new(router),
            registry: Arc::new(Registry::new()),
            running: Arc::new(AtomicBool::new(true)),
        })
    }

    /// Dirección real del socket (útil con puerto 0)
    pub fn local_addr(&self) -> Result<SocketAddr, ServerError> {
        Ok(self.listener.local_addr()?)
    }

    pub fn shutdown_handle(&self) -> Result<ShutdownHandle, ServerError> {
        let mut wake_addr = self.local_addr()?;
        // 0.0.0.0 / :: no son destinos válidos en todas las plataformas
        match wake_addr.ip() {
            IpAddr::V4(ip) if ip.is_unspecified() => wake_addr.set_ip(IpAddr::V4(Ipv4Addr::LOCALHOST)),
            IpAddr::V6(ip) if ip.is_unspecified() => wake_addr.set_ip(IpAddr::V6(Ipv6Addr::LOCALHOST)),
            _ => {}
        }
        Ok(ShutdownHandle {
            running: Arc::clone(&self.running),
            wake_addr,
        })
    }

    /// Levanta el pool y corre el accept loop hasta recibir shutdown
    ///
    /// Al salir cierra la cola, deja terminar los jobs ya admitidos y espera
    /// a todos los workers.
    pub fn run(self) -> Result<ServerSummary, ServerError> {
        let queue: AdmissionQueue<Job> = AdmissionQueue::new(self.config.queue_size);

        let handler: JobHandler = {
            let router = Arc::clone(&self.router);
            let registry = Arc::clone(&self.registry);
            Arc::new(move |job: Job, dispatch: Duration, worker: &mut WorkerState| {
                if let Err(e) = handle_connection(job, dispatch, worker, &router, &registry) {
                    warn!(worker = worker.id(), error = %e, "connection error");
                }
            })
        };
        let pool = WorkerPool::new(self.config.threads, queue.clone(), handler)?;

        info!(
            threads = self.config.threads,
            queue_size = self.config.queue_size,
            public_dir = %self.config.public_dir,
            "server started"
        );

        for stream in self.listener.incoming() {
            if !self.running.load(Ordering::SeqCst) {
                break;
            }

            let stream = match stream {
                Ok(stream) => stream,
                Err(e) => {
                    warn!(error = %e, "accept failed");
                    continue;
                }
            };

            let peer = stream
                .peer_addr()
                .map(|addr| addr.to_string())
                .unwrap_or_else(|_| "unknown".to_string());

            match queue.try_enqueue(Job::new(stream)) {
                Ok(()) => debug!(peer = %peer, "connection queued"),
                Err(EnqueueError::Full(job)) => {
                    warn!(peer = %peer, capacity = queue.capacity(), "queue full, dropping connection");
                    drop(job);
                }
                Err(EnqueueError::Closed(_)) => break,
            }
        }

        info!("accept loop stopped, draining queue");
        let states = pool.shutdown();

        Ok(ServerSummary {
            stats: self.registry.snapshot(),
            last_path: self.registry.last_path(),
            served_per_worker: states.iter().map(|s| s.count()).collect(),
        })
    }
}

/// Atiende una conexión completa en el thread del worker
///
/// Lee un request, lo rutea, actualiza contadores, agrega el bloque
/// `Stat-*` y cierra. Una conexión que se cierra sin enviar bytes no cuenta
/// como request.
pub fn handle_connection(
    job: Job,
    dispatch: Duration,
    worker: &mut WorkerState,
    router: &Router,
    registry: &Registry,
) -> io::Result<()> {
    let (mut stream, arrival) = job.into_parts();
    stream.set_read_timeout(Some(READ_TIMEOUT))?;

    let raw = read_request(&mut stream)?;
    if raw.is_empty() {
        debug!(worker = worker.id(), "connection closed without data");
        return Ok(());
    }

    let (outcome, target) = match Request::parse(&raw) {
        Ok(request) => {
            debug!(
                worker = worker.id(),
                method = request.method().as_str(),
                path = request.path(),
                "request"
            );
            (router.route(&request, registry), Some(request.path().to_string()))
        }
        Err(e) => (Err(HandlerError::from(e)), None),
    };

    let (kind, mut response) = match outcome {
        Ok(handled) => handled,
        Err(e) => {
            debug!(worker = worker.id(), error = %e, "request failed");
            (RequestKind::Error, e.to_response())
        }
    };

    let stats = registry.record(worker, kind, arrival, dispatch);
    stats.apply(&mut response);
    if matches!(kind, RequestKind::Static | RequestKind::Dynamic) {
        registry.log_response(&stats);
    }
    if let Some(target) = &target {
        registry.set_last_path(target);
    }

    stream.write_all(&response.to_bytes())?;
    stream.flush()?;
    let _ = stream.shutdown(Shutdown::Write);

    debug!(
        worker = worker.id(),
        status = response.status().as_u16(),
        "response sent"
    );
    Ok(())
}

/// Lee headers hasta `\r\n\r\n` y luego el body anunciado por
/// `Content-Length`, ambos con tope
fn read_request(stream: &mut TcpStream) -> io::Result<Vec<u8>> {
    let mut buffer = Vec::with_capacity(READ_CHUNK);
    let mut chunk = [0u8; READ_CHUNK];

    let head_end = loop {
        if let Some(end) = find_header_end(&buffer) {
            break Some(end);
        }
        if buffer.len() >= MAX_HEAD_BYTES {
            break None;
        }
        let n = stream.read(&mut chunk)?;
        if n == 0 {
            break None;
        }
        buffer.extend_from_slice(&chunk[..n]);
    };

    let Some(end) = head_end else {
        return Ok(buffer);
    };

    let declared = Request::parse(&buffer[..end])
        .ok()
        .and_then(|request| request.content_length())
        .unwrap_or(0)
        .min(MAX_BODY_BYTES);

    while buffer.len() < end + declared {
        let n = stream.read(&mut chunk)?;
        if n == 0 {
            break;
        }
        buffer.extend_from_slice(&chunk[..n]);
    }

    Ok(buffer)
}
