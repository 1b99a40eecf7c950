//! # Pool de Workers y Cola de Admisión
//! src/pool/mod.rs
//!
//! ```text
//! acceptor → AdmissionQueue<Job> (capacidad Q) → WorkerPool (N threads)
//! ```

pub mod job;
pub mod queue;
pub mod worker;

pub use job::Job;
pub use queue::{AdmissionQueue, EnqueueError};
pub use worker::{JobHandler, WorkerPool};
