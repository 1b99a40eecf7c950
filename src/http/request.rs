//! # Parsing de Requests HTTP/1.0
//! src/http/request.rs
//!
//! Parser HTTP/1.0 escrito desde cero. El servidor atiende exactamente un
//! request por conexión (sin keep-alive ni pipelining).
//!
//! ## Formato de un Request HTTP/1.0
//!
//! ```text
//! GET /output.cgi?0.3 HTTP/1.0\r\n
//! Host: localhost:8080\r\n
//! User-Agent: curl/7.68.0\r\n
//! \r\n
//! ```
//!
//! ## Componentes
//!
//! 1. **Request Line**: `METHOD /path?query HTTP/1.x`
//! 2. **Headers**: Pares `Name: Value` (uno por línea)
//! 3. **Empty Line**: `\r\n` que separa headers del body
//! 4. **Body**: (Opcional, solo se conserva en POST)

use std::collections::HashMap;

/// Separador entre el bloque de headers y el body
pub const HEADER_TERMINATOR: &[u8] = b"\r\n\r\n";

/// Métodos HTTP soportados
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    /// GET - Obtener un recurso (estático o dinámico)
    GET,

    /// POST - Reporte de estadísticas, sin importar el path
    POST,
}

impl Method {
    /// Parsea un método HTTP desde un string
    ///
    /// # Errores
    ///
    /// Retorna `UnsupportedMethod` con el método original para que el
    /// servidor pueda responder 501 mencionándolo.
    fn from_str(s: &str) -> Result<Self, ParseError> {
        match s {
            "GET" => Ok(Method::GET),
            "POST" => Ok(Method::POST),
            _ => Err(ParseError::UnsupportedMethod(s.to_string())),
        }
    }

    /// Convierte el método a string
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::GET => "GET",
            Method::POST => "POST",
        }
    }
}

/// Representa un request HTTP/1.0 parseado. Inmutable una vez construido.
#[derive(Debug, Clone)]
pub struct Request {
    /// Método HTTP (GET, POST)
    method: Method,

    /// Path de la petición sin query (ej: "/output.cgi")
    path: String,

    /// Query string cruda, sin el '?' (ej: "0.3")
    query: Option<String>,

    /// Headers HTTP (ej: {"Host": "localhost:8080"})
    headers: HashMap<String, String>,

    /// Bloque de headers tal como llegó, sin la request line
    raw_headers: String,

    /// Body del request para métodos POST
    body: Vec<u8>,
}

/// Errores que pueden ocurrir durante el parsing
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// Formato inválido de la request line
    InvalidRequestLine,

    /// Método HTTP no soportado
    UnsupportedMethod(String),

    /// Versión HTTP incorrecta
    InvalidHttpVersion(String),

    /// Header malformado
    InvalidHeader(String),

    /// Request vacío
    EmptyRequest,
}

impl std::fmt::Display for ParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ParseError::InvalidRequestLine => write!(f, "Invalid request line format"),
            ParseError::UnsupportedMethod(m) => write!(f, "Unsupported HTTP method: {}", m),
            ParseError::InvalidHttpVersion(v) => write!(f, "Invalid HTTP version: {}", v),
            ParseError::InvalidHeader(h) => write!(f, "Invalid header: {}", h),
            ParseError::EmptyRequest => write!(f, "Empty request"),
        }
    }
}

impl std::error::Error for ParseError {}

/// Busca el fin del bloque de headers (`\r\n\r\n`)
///
/// Retorna la posición del primer byte del body.
pub fn find_header_end(buffer: &[u8]) -> Option<usize> {
    buffer
        .windows(HEADER_TERMINATOR.len())
        .position(|w| w == HEADER_TERMINATOR)
        .map(|pos| pos + HEADER_TERMINATOR.len())
}

impl Request {
    /// Parsea un request HTTP/1.0 desde bytes
    ///
    /// Solo el bloque de headers tiene que ser UTF-8; el body se conserva
    /// como bytes crudos.
    ///
    /// # Ejemplo
    ///
    /// ```
    /// use pool_server::http::Request;
    ///
    /// let raw = b"GET /output.cgi?0.5 HTTP/1.0\r\n\r\n";
    /// let request = Request::parse(raw).unwrap();
    ///
    /// assert_eq!(request.path(), "/output.cgi");
    /// assert_eq!(request.query(), Some("0.5"));
    /// ```
    pub fn parse(buffer: &[u8]) -> Result<Self, ParseError> {
        let (head, body) = match find_header_end(buffer) {
            Some(end) => (&buffer[..end], &buffer[end..]),
            None => (buffer, &[][..]),
        };

        // Solo validamos UTF-8 en la parte de headers
        let head_str = std::str::from_utf8(head).map_err(|_| ParseError::InvalidRequestLine)?;

        if head_str.trim().is_empty() {
            return Err(ParseError::EmptyRequest);
        }

        let mut lines = head_str.split("\r\n");
        let request_line = lines.next().unwrap_or_default();

        // 1. Request line
        let (method, path, query) = Self::parse_request_line(request_line)?;

        // 2. Headers (resto de líneas hasta la línea vacía)
        let header_lines: Vec<&str> = lines.take_while(|l| !l.trim().is_empty()).collect();
        let headers = Self::parse_headers(&header_lines)?;
        let raw_headers = header_lines.join("\r\n");

        // 3. Body (solo POST)
        let body = if method == Method::POST {
            body.to_vec()
        } else {
            Vec::new()
        };

        Ok(Request {
            method,
            path,
            query,
            headers,
            raw_headers,
            body,
        })
    }

    /// Parsea la request line (primera línea del request)
    ///
    /// Formato: `GET /path?query HTTP/1.0`
    fn parse_request_line(
        line: &str,
    ) -> Result<(Method, String, Option<String>), ParseError> {
        let parts: Vec<&str> = line.split_whitespace().collect();

        // Debe tener exactamente 3 partes: METHOD PATH VERSION
        if parts.len() != 3 {
            return Err(ParseError::InvalidRequestLine);
        }

        let method = Method::from_str(parts[0])?;

        if !parts[1].starts_with('/') {
            return Err(ParseError::InvalidRequestLine);
        }
        let (path, query) = match parts[1].split_once('?') {
            Some((path, query)) => (path.to_string(), Some(query.to_string())),
            None => (parts[1].to_string(), None),
        };

        // HTTP/1.1 también se acepta; la respuesta siempre es HTTP/1.0
        let version = parts[2];
        if version != "HTTP/1.0" && version != "HTTP/1.1" {
            return Err(ParseError::InvalidHttpVersion(version.to_string()));
        }

        Ok((method, path, query))
    }

    /// Parsea los headers HTTP
    ///
    /// Cada header tiene formato: "Name: Value"
    fn parse_headers(lines: &[&str]) -> Result<HashMap<String, String>, ParseError> {
        let mut headers = HashMap::new();

        for line in lines {
            if let Some((name, value)) = line.split_once(':') {
                headers.insert(name.trim().to_string(), value.trim().to_string());
            } else {
                // Header sin ':' es inválido
                return Err(ParseError::InvalidHeader(line.to_string()));
            }
        }

        Ok(headers)
    }

    // === Métodos públicos para acceder a los campos ===

    /// Obtiene el método HTTP del request
    pub fn method(&self) -> Method {
        self.method
    }

    /// Obtiene el path del request (sin query)
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Obtiene la query string cruda
    pub fn query(&self) -> Option<&str> {
        self.query.as_deref()
    }

    /// Obtiene un header específico (sin distinguir mayúsculas)
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }

    /// Bloque de headers tal cual llegó
    pub fn raw_headers(&self) -> &str {
        &self.raw_headers
    }

    /// Valor del header `Content-Length`, si es un número válido
    pub fn content_length(&self) -> Option<usize> {
        self.header("Content-Length").and_then(|v| v.parse().ok())
    }

    /// Obtiene el body del request
    pub fn body(&self) -> &[u8] {
        &self.body
    }
}
