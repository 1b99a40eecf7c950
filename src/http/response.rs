//! # Construcción de Respuestas HTTP
//!
//! API para construir respuestas HTTP/1.0 y convertirlas a bytes.
//!
//! A diferencia de un `HashMap`, los headers se guardan en un `Vec` porque el
//! orden de inserción es parte del contrato: los clientes comparan el bloque
//! de headers línea por línea.
//!
//! ## Formato de una respuesta exitosa
//!
//! ```text
//! HTTP/1.0 200 OK\r\n
//! Server: OS-HW3 Web Server\r\n
//! Content-Length: 8\r\n
//! Content-Type: image/gif\r\n
//! Stat-Req-Arrival:: 1718000000.123456\r\n
//! ...
//! \r\n
//! I am gif
//! ```
//!
//! ## Ejemplo de uso
//!
//! ```
//! use pool_server::http::{Response, StatusCode};
//!
//! let response = Response::content("text/plain", b"hola".to_vec());
//! assert_eq!(response.status(), StatusCode::Ok);
//! assert_eq!(response.header("Content-Length"), Some("4"));
//! ```

use super::StatusCode;

/// Valor del header `Server` en las respuestas exitosas
pub const SERVER_NAME: &str = "OS-HW3 Web Server";

/// Representa una respuesta HTTP/1.0 completa
#[derive(Debug, Clone)]
pub struct Response {
    /// Código de estado HTTP (200, 404, etc.)
    status: StatusCode,

    /// Headers en orden de inserción
    headers: Vec<(String, String)>,

    /// Cuerpo de la respuesta (puede ser vacío)
    body: Vec<u8>,
}

impl Response {
    /// Crea una nueva respuesta sin headers ni body
    pub fn new(status: StatusCode) -> Self {
        Self {
            status,
            headers: Vec::new(),
            body: Vec::new(),
        }
    }

    /// Agrega un header a la respuesta
    ///
    /// Si el header ya existe se reemplaza su valor sin moverlo de lugar.
    ///
    /// # Ejemplo
    /// ```
    /// use pool_server::http::{Response, StatusCode};
    ///
    /// let response = Response::new(StatusCode::Ok)
    ///     .with_header("Content-Type", "text/html")
    ///     .with_header("Server", "x")
    ///     .with_header("Content-Type", "text/plain");
    ///
    /// let names: Vec<&str> = response.headers().iter().map(|(n, _)| n.as_str()).collect();
    /// assert_eq!(names, ["Content-Type", "Server"]);
    /// ```
    pub fn with_header(mut self, name: &str, value: &str) -> Self {
        self.add_header(name, value);
        self
    }

    /// Agrega un header a una respuesta existente (versión mutable)
    pub fn add_header(&mut self, name: &str, value: &str) {
        match self.headers.iter_mut().find(|(n, _)| n == name) {
            Some(entry) => entry.1 = value.to_string(),
            None => self.headers.push((name.to_string(), value.to_string())),
        }
    }

    /// Establece el cuerpo de la respuesta desde un string
    ///
    /// Automáticamente calcula y agrega el header `Content-Length`.
    pub fn with_body(self, body: &str) -> Self {
        self.with_body_bytes(body.as_bytes().to_vec())
    }

    /// Establece el cuerpo de la respuesta desde bytes
    ///
    /// Los bytes se envían sin transformar (imágenes, binarios, etc.)
    pub fn with_body_bytes(mut self, body: Vec<u8>) -> Self {
        self.body = body;
        let length = self.body.len().to_string();
        self.add_header("Content-Length", &length);
        self
    }

    /// Respuesta 200 con contenido
    ///
    /// Orden de headers: `Server`, `Content-Length`, `Content-Type`.
    pub fn content(content_type: &str, body: Vec<u8>) -> Self {
        Self::new(StatusCode::Ok)
            .with_header("Server", SERVER_NAME)
            .with_body_bytes(body)
            .with_header("Content-Type", content_type)
    }

    /// Crea una respuesta de error con la página HTML del servidor
    ///
    /// `cause` es lo que provocó el error (path resuelto, método, etc.).
    /// Orden de headers: `Content-Type`, `Content-Length`.
    ///
    /// # Ejemplo
    /// ```
    /// use pool_server::http::{Response, StatusCode};
    ///
    /// let response = Response::error(
    ///     StatusCode::NotFound,
    ///     "OS-HW3 Server could not find this file",
    ///     "./public//missing.html",
    /// );
    /// let body = String::from_utf8(response.body().to_vec()).unwrap();
    /// assert!(body.contains("404: Not found"));
    /// assert!(body.contains("./public//missing.html"));
    /// ```
    pub fn error(status: StatusCode, long_message: &str, cause: &str) -> Self {
        let body = format!(
            "<html><title>OS-HW3 Error</title><body bgcolor=fffff>\r\n\
             {}: {}\r\n\
             <p>{}: {}\r\n\
             <hr>{}\r\n",
            status.as_u16(),
            status.reason_phrase(),
            long_message,
            cause,
            SERVER_NAME,
        );
        Self::new(status)
            .with_header("Content-Type", "text/html")
            .with_body(&body)
    }

    /// Convierte la respuesta a bytes listos para enviar por el socket
    ///
    /// - Status line: `HTTP/1.0 200 OK\r\n`
    /// - Headers en orden: `Header-Name: Value\r\n`
    /// - Línea vacía: `\r\n`
    /// - Body: contenido binario
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut result = Vec::with_capacity(256 + self.body.len());

        result.extend_from_slice(format!("HTTP/1.0 {}\r\n", self.status).as_bytes());

        for (name, value) in &self.headers {
            result.extend_from_slice(format!("{}: {}\r\n", name, value).as_bytes());
        }

        result.extend_from_slice(b"\r\n");
        result.extend_from_slice(&self.body);

        result
    }

    /// Obtiene el código de estado de la respuesta
    pub fn status(&self) -> StatusCode {
        self.status
    }

    /// Obtiene los headers en orden
    pub fn headers(&self) -> &[(String, String)] {
        &self.headers
    }

    /// Obtiene el valor de un header
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    /// Obtiene una referencia al body
    pub fn body(&self) -> &[u8] {
        &self.body
    }
}
