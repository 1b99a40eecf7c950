//! # Handlers
//! src/handlers/mod.rs
//!
//! Un handler por tipo de ruta:
//!
//! - `static_files`: archivos bajo el directorio de contenido
//! - `dynamic`: el script `output.cgi`
//! - `stats_report`: reporte del log de estadísticas (POST)

pub mod dynamic;
pub mod static_files;
pub mod stats_report;
