use std::fmt;

use bytes::Bytes;
use serde::Deserialize;

use crate::http::form::{self, FieldMap};
use crate::http::headers::{Headers, MediaType};
use crate::http::multipart::{MultipartDecoder, MultipartError, Part};

/// HTTP request methods.
///
/// Which of these a server actually accepts is decided by its configured
/// allow-list; anything else is answered like a missing route.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
pub enum Method {
    /// GET - Retrieve a resource
    GET,
    /// POST - Create or submit data
    POST,
    /// PUT - Replace a resource
    PUT,
    /// DELETE - Delete a resource
    DELETE,
    /// HEAD - Like GET but without the response body
    HEAD,
    /// OPTIONS - Describe communication options
    OPTIONS,
    /// PATCH - Partial modification of a resource
    PATCH,
}

impl Method {
    /// Parses an HTTP method from a string.
    ///
    /// # Arguments
    ///
    /// * `s` - String representation of the method (case-sensitive, typically uppercase)
    ///
    /// # Returns
    ///
    /// `Some(Method)` if the string matches a known method, `None` otherwise.
    ///
    /// # Example
    ///
    /// ```
    /// # use hearth::http::request::Method;
    /// assert_eq!(Method::from_str("GET"), Some(Method::GET));
    /// assert_eq!(Method::from_str("get"), None);
    /// ```
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "GET" => Some(Method::GET),
            "POST" => Some(Method::POST),
            "PUT" => Some(Method::PUT),
            "DELETE" => Some(Method::DELETE),
            "HEAD" => Some(Method::HEAD),
            "OPTIONS" => Some(Method::OPTIONS),
            "PATCH" => Some(Method::PATCH),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Method::GET => "GET",
            Method::POST => "POST",
            Method::PUT => "PUT",
            Method::DELETE => "DELETE",
            Method::HEAD => "HEAD",
            Method::OPTIONS => "OPTIONS",
            Method::PATCH => "PATCH",
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Decoded request body.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Body {
    #[default]
    Empty,
    /// Bytes with no form content type.
    Raw(Bytes),
    /// `application/x-www-form-urlencoded` fields.
    Form(FieldMap<String>),
    /// `multipart/form-data` parts grouped by field name.
    Multipart(FieldMap<Part>),
}

impl Body {
    /// Picks a decoding from the request's `Content-Type`.
    pub fn decode(content_type: Option<&MediaType>, bytes: Vec<u8>) -> Self {
        match content_type {
            Some(ct) if ct.is("multipart/form-data") => {
                let mut parts = FieldMap::new();
                match ct.boundary() {
                    Some(boundary) => {
                        for part in MultipartDecoder::new(boundary).decode(&bytes) {
                            let name = part.field_name.clone();
                            parts.push(name, part);
                        }
                    }
                    None => {
                        tracing::warn!(
                            "Multipart body ignored: {}",
                            MultipartError::MissingBoundary
                        );
                    }
                }
                Body::Multipart(parts)
            }
            Some(ct) if ct.is("application/x-www-form-urlencoded") => {
                Body::Form(form::decode(&bytes))
            }
            _ if bytes.is_empty() => Body::Empty,
            _ => Body::Raw(Bytes::from(bytes)),
        }
    }
}

/// A parsed HTTP request.
///
/// Built once per connection after the head and body have been read, and
/// handed to a route handler by reference.
#[derive(Debug, Clone)]
pub struct Request {
    /// The HTTP method (GET, POST, etc.)
    pub method: Method,
    /// The request path without the query string (e.g., "/index.html")
    pub path: String,
    /// HTTP version (typically "HTTP/1.1")
    pub version: String,
    /// Decoded query string pairs in order
    pub query: Vec<(String, String)>,
    /// Request headers in encounter order
    pub headers: Headers,
    /// Decoded request body
    pub body: Body,
}

/// Builder for constructing Request objects.
#[derive(Default)]
pub struct RequestBuilder {
    method: Option<Method>,
    path: Option<String>,
    version: Option<String>,
    query: Option<String>,
    headers: Headers,
    body: Vec<u8>,
}

impl RequestBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn method(mut self, method: Method) -> Self {
        self.method = Some(method);
        self
    }

    pub fn path(mut self, path: impl Into<String>) -> Self {
        self.path = Some(path.into());
        self
    }

    pub fn version(mut self, version: impl Into<String>) -> Self {
        self.version = Some(version.into());
        self
    }

    /// Raw query string, without the leading `?`.
    pub fn query(mut self, query: impl Into<String>) -> Self {
        self.query = Some(query.into());
        self
    }

    pub fn header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.append(key, value);
        self
    }

    pub fn headers(mut self, headers: Headers) -> Self {
        self.headers = headers;
        self
    }

    pub fn body(mut self, body: Vec<u8>) -> Self {
        self.body = body;
        self
    }

    /// Builds the request, decoding the query string and body.
    pub fn build(self) -> Result<Request, &'static str> {
        let method = self.method.ok_or("method missing")?;
        let path = self.path.ok_or("path missing")?;
        if path.is_empty() {
            return Err("path empty");
        }

        let query = self
            .query
            .as_deref()
            .map(|q| form::parse_pairs(q.as_bytes()))
            .unwrap_or_default();
        let content_type = self.headers.get("Content-Type").map(MediaType::parse);
        let body = Body::decode(content_type.as_ref(), self.body);

        Ok(Request {
            method,
            path,
            version: self.version.unwrap_or_else(|| "HTTP/1.1".to_string()),
            query,
            headers: self.headers,
            body,
        })
    }
}

impl Request {
    /// Retrieves a header value by name, case-insensitively.
    ///
    /// Returns the first value when the header was sent more than once.
    pub fn header(&self, key: &str) -> Option<&str> {
        self.headers.get(key)
    }

    /// Raw `Name: value` header lines in the order they were received.
    pub fn header_lines(&self) -> Vec<String> {
        self.headers.lines()
    }

    /// Retrieves the Content-Length header value and parses it as a usize.
    ///
    /// Returns 0 if the header is missing or not a valid number.
    pub fn content_length(&self) -> usize {
        self.header("Content-Length")
            .and_then(|v| v.trim().parse().ok())
            .unwrap_or(0)
    }

    pub fn content_type(&self) -> Option<MediaType> {
        self.header("Content-Type").map(MediaType::parse)
    }

    pub fn query_params(&self) -> &[(String, String)] {
        &self.query
    }

    /// First query value for `name`.
    pub fn query_param(&self, name: &str) -> Option<&str> {
        self.query
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    /// URL-encoded form fields, if the body was a form.
    pub fn post_params(&self) -> Option<&FieldMap<String>> {
        match &self.body {
            Body::Form(fields) => Some(fields),
            _ => None,
        }
    }

    pub fn post_param(&self, name: &str) -> Option<&[String]> {
        self.post_params().and_then(|f| f.get(name))
    }

    /// Multipart parts, if the body was `multipart/form-data`.
    pub fn parts(&self) -> Option<&FieldMap<Part>> {
        match &self.body {
            Body::Multipart(parts) => Some(parts),
            _ => None,
        }
    }

    pub fn part(&self, name: &str) -> Option<&[Part]> {
        self.parts().and_then(|p| p.get(name))
    }

    pub fn is_multipart(&self) -> bool {
        matches!(self.body, Body::Multipart(_))
    }
}
