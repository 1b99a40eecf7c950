//! # Log de Requests
//! src/stats/log.rs
//!
//! Historial de los bloques `Stat-*` de cada respuesta estática o dinámica
//! exitosa. Muchos lectores (reportes POST) y pocos escritores: `RwLock`.

use std::sync::{PoisonError, RwLock};

/// Separador que cierra cada entrada dentro del reporte
const ENTRY_TERMINATOR: &str = "\r\n\r\n";

/// Log compartido por todos los workers
#[derive(Debug, Default)]
pub struct RequestLog {
    entries: RwLock<Vec<String>>,
}

impl RequestLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Agrega una entrada al final
    pub fn append(&self, entry: String) {
        self.entries
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .push(entry);
    }

    /// Texto del reporte: cada entrada seguida de `\r\n\r\n`, unidas por `\n`
    ///
    /// Un log vacío produce un string vacío.
    ///
    /// # Ejemplo
    /// ```
    /// use pool_server::stats::RequestLog;
    ///
    /// let log = RequestLog::new();
    /// log.append("a".to_string());
    /// log.append("b".to_string());
    /// assert_eq!(log.render(), "a\r\n\r\n\nb\r\n\r\n");
    /// ```
    pub fn render(&self) -> String {
        let entries = self.entries.read().unwrap_or_else(PoisonError::into_inner);
        entries
            .iter()
            .map(|entry| format!("{}{}", entry, ENTRY_TERMINATOR))
            .collect::<Vec<_>>()
            .join("\n")
    }

    pub fn len(&self) -> usize {
        self.entries.read().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
