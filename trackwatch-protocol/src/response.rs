//! Response heads
//!
//! Every response closes the connection, so each head carries an exact
//! `Content-Length`.

use core::fmt::Write;

use heapless::String;

use crate::status::WriteError;

/// Buffer size that always holds a response head
pub const HEAD_CAPACITY: usize = 160;

/// Status codes used by the dashboard server
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum StatusCode {
    /// 200
    Ok,
    /// 302
    Found,
    /// 400
    BadRequest,
    /// 405
    MethodNotAllowed,
    /// 431
    HeaderTooLarge,
}

impl StatusCode {
    /// Status line text after the version
    pub const fn reason(&self) -> &'static str {
        match self {
            StatusCode::Ok => "200 OK",
            StatusCode::Found => "302 Found",
            StatusCode::BadRequest => "400 Bad Request",
            StatusCode::MethodNotAllowed => "405 Method Not Allowed",
            StatusCode::HeaderTooLarge => "431 Request Header Fields Too Large",
        }
    }
}

/// Body content types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ContentType {
    /// Dashboard page
    Html,
    /// Status document
    Json,
    /// Empty or error bodies
    Text,
}

impl ContentType {
    /// Header value
    pub const fn as_str(&self) -> &'static str {
        match self {
            ContentType::Html => "text/html",
            // Served as the dashboard script has always expected it
            ContentType::Json => "text/json",
            ContentType::Text => "text/plain",
        }
    }
}

/// Response status line and headers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ResponseHead {
    /// Status code
    pub status: StatusCode,
    /// Body type
    pub content_type: ContentType,
    /// Body length in bytes
    pub content_length: usize,
    /// Redirect target
    pub location: Option<&'static str>,
}

impl ResponseHead {
    /// 200 with a body
    pub const fn ok(content_type: ContentType, content_length: usize) -> Self {
        Self {
            status: StatusCode::Ok,
            content_type,
            content_length,
            location: None,
        }
    }

    /// 302 to `location` with an empty body
    pub const fn redirect(location: &'static str) -> Self {
        Self {
            status: StatusCode::Found,
            content_type: ContentType::Text,
            content_length: 0,
            location: Some(location),
        }
    }

    /// Error status with an empty body
    pub const fn error(status: StatusCode) -> Self {
        Self {
            status,
            content_type: ContentType::Text,
            content_length: 0,
            location: None,
        }
    }

    /// Render the head, including the blank line, replacing `out`
    pub fn write<const N: usize>(&self, out: &mut String<N>) -> Result<(), WriteError> {
        out.clear();
        write!(out, "HTTP/1.1 {}\r\n", self.status.reason())?;
        write!(out, "Content-Type: {}\r\n", self.content_type.as_str())?;
        write!(out, "Content-Length: {}\r\n", self.content_length)?;
        if let Some(location) = self.location {
            write!(out, "Location: {}\r\n", location)?;
        }
        out.push_str("Connection: close\r\n\r\n")
            .map_err(|_| WriteError::BufferFull)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn render(head: ResponseHead) -> String<HEAD_CAPACITY> {
        let mut out = String::new();
        head.write(&mut out).unwrap();
        out
    }

    #[test]
    fn test_ok_json_head() {
        assert_eq!(
            render(ResponseHead::ok(ContentType::Json, 412)).as_str(),
            "HTTP/1.1 200 OK\r\nContent-Type: text/json\r\nContent-Length: 412\r\n\
             Connection: close\r\n\r\n"
        );
    }

    #[test]
    fn test_redirect_head() {
        let head = render(ResponseHead::redirect("/"));
        assert!(head.starts_with("HTTP/1.1 302 Found\r\n"));
        assert!(head.contains("Location: /\r\n"));
        assert!(head.contains("Content-Length: 0\r\n"));
        assert!(head.ends_with("\r\n\r\n"));
    }

    #[test]
    fn test_longest_head_fits() {
        let mut head = ResponseHead::error(StatusCode::HeaderTooLarge);
        head.content_length = usize::MAX;
        head.location = Some("/");
        let out = render(head);
        assert!(out.len() <= HEAD_CAPACITY);
    }

    #[test]
    fn test_buffer_full() {
        let mut out: String<16> = String::new();
        assert_eq!(
            ResponseHead::ok(ContentType::Html, 1).write(&mut out),
            Err(WriteError::BufferFull)
        );
    }
}
