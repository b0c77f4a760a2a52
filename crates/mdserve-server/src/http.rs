use std::io::{self, Write};

/// A complete response: hand-formatted status line and header block
/// followed by the payload.
pub struct Response {
    status: u16,
    reason: &'static str,
    content_type: String,
    body: Vec<u8>,
}

impl Response {
    pub fn ok(content_type: &str, body: Vec<u8>) -> Self {
        Self {
            status: 200,
            reason: "OK",
            content_type: content_type.to_string(),
            body,
        }
    }

    pub fn not_found() -> Self {
        Self {
            status: 404,
            reason: "NOT FOUND",
            content_type: "text/html".to_string(),
            body: Vec::new(),
        }
    }

    pub fn status(&self) -> u16 {
        self.status
    }

    fn header(&self) -> String {
        format!(
            "HTTP/1.1 {} {}\r\nContent-Type: {}\r\nContent-Length: {}\r\n\r\n",
            self.status,
            self.reason,
            self.content_type,
            self.body.len()
        )
    }

    pub fn write_to(&self, stream: &mut impl Write) -> io::Result<()> {
        stream.write_all(self.header().as_bytes())?;
        stream.write_all(&self.body)?;
        stream.flush()
    }
}

/// Extracts the request target from a `GET <path> HTTP/x` request line.
/// Anything else is rejected.
pub fn request_path(request_line: &str) -> Option<String> {
    let mut parts = request_line.split_whitespace();
    if parts.next()? != "GET" {
        return None;
    }
    let path = parts.next()?;
    if !parts.next()?.starts_with("HTTP") {
        return None;
    }
    Some(path.to_string())
}
