//! HTTP request parsing
//!
//! Only the request line matters to the dashboard. The parser is fed
//! bytes as they arrive from the socket and yields a [`Request`] once
//! the blank line ending the header block has been seen. Headers are
//! skipped and request bodies are not supported.

use heapless::{String, Vec};

/// Maximum size of the request line plus headers
pub const MAX_REQUEST_SIZE: usize = 512;

/// Maximum length of the request target (path and query)
pub const MAX_TARGET_LEN: usize = 128;

const HEADER_END: &[u8] = b"\r\n\r\n";

/// Errors that can occur while parsing a request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum RequestError {
    /// Header block exceeds [`MAX_REQUEST_SIZE`]
    HeaderTooLarge,
    /// Request line is not `METHOD target HTTP/x.y`
    Malformed,
    /// Method other than GET
    UnsupportedMethod,
}

/// Supported request methods
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Method {
    /// GET
    Get,
}

/// A parsed request line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Request {
    /// Request method
    pub method: Method,
    target: String<MAX_TARGET_LEN>,
}

impl Request {
    /// Parse a request line such as `GET /act?btn_fwd=1 HTTP/1.1`
    pub fn parse_line(line: &str) -> Result<Self, RequestError> {
        let mut parts = line.split(' ').filter(|p| !p.is_empty());
        let method = parts.next().ok_or(RequestError::Malformed)?;
        let target = parts.next().ok_or(RequestError::Malformed)?;
        let version = parts.next().ok_or(RequestError::Malformed)?;

        if parts.next().is_some() || !version.starts_with("HTTP/") || !target.starts_with('/') {
            return Err(RequestError::Malformed);
        }

        let method = match method {
            "GET" => Method::Get,
            m if m.bytes().all(|b| b.is_ascii_uppercase()) => {
                return Err(RequestError::UnsupportedMethod)
            }
            _ => return Err(RequestError::Malformed),
        };

        let target = String::try_from(target).map_err(|_| RequestError::HeaderTooLarge)?;
        Ok(Self { method, target })
    }

    /// Path without the query string
    pub fn path(&self) -> &str {
        match self.target.split_once('?') {
            Some((path, _)) => path,
            None => &self.target,
        }
    }

    /// Query string, without the `?`
    pub fn query(&self) -> Option<&str> {
        self.target.split_once('?').map(|(_, query)| query)
    }
}

/// Incremental request parser
#[derive(Debug, Clone, Default)]
pub struct RequestParser {
    buffer: Vec<u8, MAX_REQUEST_SIZE>,
}

impl RequestParser {
    /// Create a new request parser
    pub fn new() -> Self {
        Self { buffer: Vec::new() }
    }

    /// Reset the parser state
    pub fn reset(&mut self) {
        self.buffer.clear();
    }

    /// Number of bytes buffered
    pub fn buffered(&self) -> usize {
        self.buffer.len()
    }

    /// Feed a single byte to the parser
    ///
    /// Returns `Ok(Some(request))` once the header block is complete,
    /// `Ok(None)` when more bytes are needed. The parser resets after
    /// either outcome or an error.
    pub fn feed(&mut self, byte: u8) -> Result<Option<Request>, RequestError> {
        if self.buffer.push(byte).is_err() {
            self.reset();
            return Err(RequestError::HeaderTooLarge);
        }

        if !self.buffer.ends_with(HEADER_END) {
            return Ok(None);
        }

        let result = self.parse_buffer();
        self.reset();
        result.map(Some)
    }

    /// Feed multiple bytes to the parser
    ///
    /// Returns the first complete request found, if any.
    /// Remaining bytes after a complete request are not consumed.
    pub fn feed_bytes(&mut self, bytes: &[u8]) -> Result<Option<Request>, RequestError> {
        for &byte in bytes {
            if let Some(request) = self.feed(byte)? {
                return Ok(Some(request));
            }
        }
        Ok(None)
    }

    fn parse_buffer(&self) -> Result<Request, RequestError> {
        let line_end = self
            .buffer
            .windows(2)
            .position(|w| w == b"\r\n")
            .ok_or(RequestError::Malformed)?;
        let line =
            core::str::from_utf8(&self.buffer[..line_end]).map_err(|_| RequestError::Malformed)?;
        Request::parse_line(line)
    }
}
