//! `multipart/form-data` body decoding.
//!
//! The body is split on `--boundary` delimiters. Each part carries a header
//! block terminated by a blank line, from which `Content-Disposition` (field
//! name, optional filename) and `Content-Type` are read.
//!
//! Decoding is best-effort: a malformed or truncated body stops the decoder,
//! but every part completed before the failure is still returned.

use bytes::Bytes;

use crate::http::headers::{parse_header_line, ContentDisposition};
use crate::http::scanner::ByteCursor;

const CRLF: &[u8] = b"\r\n";
const HEADER_END: &[u8] = b"\r\n\r\n";

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum MultipartError {
    #[error("multipart Content-Type has no boundary parameter")]
    MissingBoundary,
    #[error("opening boundary not found")]
    MissingFirstBoundary,
    #[error("boundary not followed by CRLF or closing dashes")]
    MalformedBoundary,
    #[error("part headers are not terminated by a blank line")]
    UnterminatedHeaders,
    #[error("part has no Content-Disposition name")]
    MissingFieldName,
    #[error("body ended before the closing boundary")]
    Truncated,
}

/// One decoded part of a multipart body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Part {
    pub field_name: String,
    pub content_type: Option<String>,
    pub file_name: Option<String>,
    pub body: Bytes,
}

impl Part {
    /// A part without a `filename` parameter is a plain form field.
    pub fn is_form_field(&self) -> bool {
        self.file_name.is_none()
    }

    pub fn text(&self) -> Option<&str> {
        std::str::from_utf8(&self.body).ok()
    }
}

/// Boundary-driven decoder for one body.
#[derive(Debug, Clone)]
pub struct MultipartDecoder {
    // "--" + boundary
    delimiter: Vec<u8>,
    // CRLF + "--" + boundary
    body_delimiter: Vec<u8>,
}

impl MultipartDecoder {
    pub fn new(boundary: &str) -> Self {
        let mut delimiter = b"--".to_vec();
        delimiter.extend_from_slice(boundary.as_bytes());
        let body_delimiter = [CRLF, delimiter.as_slice()].concat();
        Self {
            delimiter,
            body_delimiter,
        }
    }

    /// Decodes every part it can, logging the failure that stopped it, if any.
    pub fn decode(&self, body: &[u8]) -> Vec<Part> {
        let mut parts = Vec::new();
        if let Err(e) = self.try_decode(body, &mut parts) {
            tracing::warn!(
                error = %e,
                decoded = parts.len(),
                "Multipart body decoding stopped early"
            );
        }
        parts
    }

    /// Decodes into `parts`, leaving already-completed parts in place on error.
    pub fn try_decode(&self, body: &[u8], parts: &mut Vec<Part>) -> Result<(), MultipartError> {
        let mut cur = ByteCursor::new(body);

        // Preamble
        let first = cur
            .find_delimiter(&self.delimiter)
            .ok_or(MultipartError::MissingFirstBoundary)?;
        cur.seek(first + self.delimiter.len());

        loop {
            if cur.skip_prefix(b"--") {
                return Ok(());
            }
            skip_transport_padding(&mut cur);
            if !cur.skip_prefix(CRLF) {
                return Err(if cur.is_empty() {
                    MultipartError::Truncated
                } else {
                    MultipartError::MalformedBoundary
                });
            }

            let header_block = if cur.skip_prefix(CRLF) {
                &[][..]
            } else {
                cur.read_until(HEADER_END)
                    .ok_or(MultipartError::UnterminatedHeaders)?
            };

            let mut disposition = None;
            let mut content_type = None;
            for line in String::from_utf8_lossy(header_block).split("\r\n") {
                let Ok((name, value)) = parse_header_line(line) else {
                    continue;
                };
                if name.eq_ignore_ascii_case("Content-Disposition") {
                    disposition = Some(ContentDisposition::parse(&value));
                } else if name.eq_ignore_ascii_case("Content-Type") {
                    content_type = Some(value);
                }
            }

            let disposition = disposition.unwrap_or_else(|| ContentDisposition::parse(""));
            let field_name = disposition.name.ok_or(MultipartError::MissingFieldName)?;

            let data = cur
                .read_until(&self.body_delimiter)
                .ok_or(MultipartError::Truncated)?;

            parts.push(Part {
                field_name,
                content_type,
                file_name: disposition.filename,
                body: Bytes::copy_from_slice(data),
            });
        }
    }
}

fn skip_transport_padding(cur: &mut ByteCursor<'_>) {
    while cur.skip_prefix(b" ") || cur.skip_prefix(b"\t") {}
}
