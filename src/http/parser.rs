use crate::http::headers::{parse_header_line, Headers};
use crate::http::request::Method;
use crate::http::scanner::find;

const CRLF: &[u8] = b"\r\n";
const HEADER_END: &[u8] = b"\r\n\r\n";

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ParseError {
    #[error("no CRLF-terminated request line")]
    MissingRequestLine,
    #[error("request line is not `METHOD target version`")]
    InvalidRequestLine,
    #[error("method {0:?} is not allowed")]
    MethodNotAllowed(String),
    #[error("request target has an empty path")]
    EmptyPath,
    #[error("header block is not valid UTF-8")]
    InvalidHeader,
}

/// Everything before the body, plus where the body starts in the buffer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestHead {
    pub method: Method,
    pub path: String,
    /// Raw query string without the `?`.
    pub query: Option<String>,
    pub version: String,
    pub headers: Headers,
    /// Offset of the first body byte, or `None` when no blank line was found.
    pub body_offset: Option<usize>,
    /// Declared body length; 0 when absent or unparseable.
    pub content_length: usize,
}

/// Parses the request line and header block at the start of `buf`.
///
/// A missing blank line is tolerated: the request is treated as having no
/// headers and no body. Header lines without a name and colon are skipped.
pub fn parse_request_head(buf: &[u8], allowed: &[Method]) -> Result<RequestHead, ParseError> {
    let line_end = find(buf, CRLF, 0, buf.len()).ok_or(ParseError::MissingRequestLine)?;
    let line =
        std::str::from_utf8(&buf[..line_end]).map_err(|_| ParseError::InvalidRequestLine)?;

    let (method, target, version) = split_request_line(line)?;

    let method = Method::from_str(method)
        .filter(|m| allowed.contains(m))
        .ok_or_else(|| ParseError::MethodNotAllowed(method.to_string()))?;

    let (path, query) = match target.split_once('?') {
        Some((path, query)) => (path, Some(query.to_string())),
        None => (target, None),
    };
    if path.is_empty() {
        return Err(ParseError::EmptyPath);
    }

    let mut headers = Headers::new();
    let mut body_offset = None;

    if let Some(end) = find(buf, HEADER_END, line_end, buf.len()) {
        let block = &buf[line_end + CRLF.len()..end.max(line_end + CRLF.len())];
        let block = std::str::from_utf8(block).map_err(|_| ParseError::InvalidHeader)?;

        for line in block.split("\r\n").filter(|l| !l.is_empty()) {
            match parse_header_line(line) {
                Ok((name, value)) => headers.append(name, value),
                Err(e) => tracing::debug!(line, error = %e, "Skipping header line"),
            }
        }
        body_offset = Some(end + HEADER_END.len());
    }

    let content_length = headers
        .get("Content-Length")
        .and_then(|v| v.trim().parse::<usize>().ok())
        .unwrap_or(0);

    Ok(RequestHead {
        method,
        path: path.to_string(),
        query,
        version: version.to_string(),
        headers,
        body_offset,
        content_length,
    })
}

fn split_request_line(line: &str) -> Result<(&str, &str, &str), ParseError> {
    let parts: Vec<&str> = line.split(' ').collect();
    match parts.as_slice() {
        [method, target, version]
            if !method.is_empty() && !target.is_empty() && !version.is_empty() =>
        {
            Ok((*method, *target, *version))
        }
        _ => Err(ParseError::InvalidRequestLine),
    }
}
