//! # Módulo del Servidor HTTP
//! src/server/mod.rs
//!
//! Accept loop, admisión a la cola y atención de cada conexión en el pool.

pub mod tcp;

pub use tcp::{handle_connection, Server, ServerSummary, ShutdownHandle};
