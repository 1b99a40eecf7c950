//! # Pool Server
//! src/lib.rs
//!
//! Servidor HTTP/1.0 multi-thread con una cola de admisión acotada y un pool
//! fijo de workers. Demuestra conceptos de sistemas operativos: productor /
//! consumidor, sincronización sin busy-wait, control de carga por descarte y
//! estadísticas por thread.
//!
//! ## Arquitectura
//!
//! - `config`: argumentos de línea de comandos
//! - `http`: parsing de requests y construcción de responses
//! - `pool`: jobs, cola de admisión y pool de workers
//! - `router`: clasificación de requests (estático, dinámico, reporte)
//! - `handlers`: generación de cada tipo de respuesta
//! - `stats`: contadores globales, por worker y log de requests
//! - `server`: accept loop y atención de conexiones
//!
//! ## Ejemplo de uso
//!
//! ```no_run
//! use pool_server::config::Config;
//! use pool_server::server::Server;
//!
//! let config = Config::default();
//! let server = Server::bind(config).unwrap();
//! let summary = server.run().unwrap();
//! println!("{:?}", summary.last_path);
//! ```

pub mod config;
pub mod error;
pub mod handlers;
pub mod http;
pub mod pool;
pub mod router;
pub mod server;
pub mod stats;
