//! # Configuración del Servidor
//! src/config.rs
//!
//! Configuración inmutable del servidor. Se arma una sola vez al arrancar y
//! se comparte en modo lectura durante toda la vida del proceso.
//!
//! ## Ejemplo de uso
//!
//! ```bash
//! ./server 8080 4 16
//! ./server 8080 4 16 --public-dir ./public --log-level debug
//! ```
//!
//! No se leen variables de entorno ni archivos de configuración.

use clap::Parser;

/// Configuración del servidor HTTP/1.0
#[derive(Debug, Clone, Parser)]
#[command(name = "server")]
#[command(about = "Servidor HTTP/1.0 con pool fijo de workers y cola de admisión acotada")]
#[command(version = "0.1.0")]
pub struct Config {
    /// Puerto en el que escucha el servidor (0 = efímero)
    pub port: u16,

    /// Número de workers del pool
    pub threads: usize,

    /// Capacidad máxima de la cola de admisión
    pub queue_size: usize,

    /// Host/IP en el que escucha
    #[arg(long, default_value = "0.0.0.0")]
    pub host: String,

    /// Directorio raíz del contenido estático
    #[arg(long = "public-dir", default_value = "./public")]
    pub public_dir: String,

    /// Filtro de logging (ej: "info", "pool_server=debug")
    #[arg(long = "log-level", default_value = "info")]
    pub log_level: String,
}

impl Config {
    /// Crea una nueva configuración parseando argumentos CLI
    pub fn new() -> Self {
        Config::parse()
    }

    /// Obtiene la dirección completa para bind (host:port)
    ///
    /// # Ejemplo
    /// ```rust
    /// use pool_server::config::Config;
    ///
    /// let config = Config::default();
    /// assert_eq!(config.address(), "0.0.0.0:8080");
    /// ```
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Valida la configuración
    ///
    /// Retorna errores si hay valores inválidos
    pub fn validate(&self) -> Result<(), String> {
        if self.threads == 0 {
            return Err("threads must be >= 1".to_string());
        }
        if self.queue_size == 0 {
            return Err("queue size must be >= 1".to_string());
        }
        if self.public_dir.is_empty() {
            return Err("public dir must not be empty".to_string());
        }
        Ok(())
    }
}

impl Default for Config {
    /// Configuración por defecto (usada por tests)
    fn default() -> Self {
        Self {
            port: 8080,
            threads: 4,
            queue_size: 16,
            host: "0.0.0.0".to_string(),
            public_dir: "./public".to_string(),
            log_level: "info".to_string(),
        }
    }
}
