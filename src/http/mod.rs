//! # Módulo HTTP
//!
//! Implementación del protocolo HTTP/1.0 desde cero, sin librerías de alto
//! nivel:
//!
//! - Parsing de requests HTTP/1.0
//! - Construcción de responses HTTP con headers ordenados
//! - Manejo de status codes
//!
//! ### Formato de Request
//!
//! ```text
//! GET /path?query HTTP/1.0\r\n
//! Header-Name: Header-Value\r\n
//! \r\n
//! ```
//!
//! ### Formato de Response
//!
//! ```text
//! HTTP/1.0 200 OK\r\n
//! Server: OS-HW3 Web Server\r\n
//! Content-Length: 13\r\n
//! Content-Type: text/html\r\n
//! \r\n
//! <p>hola</p>
//! ```

pub mod request;   // Parsing de HTTP requests
pub mod response;  // Construcción de HTTP responses
pub mod status;    // Códigos de estado HTTP

// Re-exportamos los tipos principales para facilitar su uso
pub use request::{Method, ParseError, Request};
pub use response::Response;
pub use status::StatusCode;
