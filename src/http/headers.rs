//! Header grammars.
//!
//! Three narrow parsers live here:
//!
//! - header lines: `Name: value`
//! - parameterized values: `type/subtype; param=value; ...`, used for both
//!   `Content-Type` and `Content-Disposition`
//! - the ordered, case-insensitive [`Headers`] collection built from them

use std::fmt;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum HeaderError {
    #[error("header line has no ':' separator")]
    MissingColon,
    #[error("header line has an empty name")]
    EmptyName,
}

/// Splits a raw header line into trimmed name and value.
pub fn parse_header_line(line: &str) -> Result<(String, String), HeaderError> {
    let (name, value) = line.split_once(':').ok_or(HeaderError::MissingColon)?;
    let name = name.trim();
    if name.is_empty() {
        return Err(HeaderError::EmptyName);
    }
    Ok((name.to_string(), value.trim().to_string()))
}

/// Request headers in encounter order. Duplicates are kept.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Headers {
    entries: Vec<(String, String)>,
}

impl Headers {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn append(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.entries.push((name.into(), value.into()));
    }

    /// First value for `name`, compared case-insensitively.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    pub fn get_all<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a str> + 'a {
        self.entries
            .iter()
            .filter(move |(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Headers rendered back as `Name: value` lines.
    pub fn lines(&self) -> Vec<String> {
        self.entries
            .iter()
            .map(|(k, v)| format!("{}: {}", k, v))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// A header value of the form `token; name=value; name="quoted value"`.
///
/// `value` is lowercased (`multipart/form-data`, `form-data`), parameter
/// names are lowercased, parameter values are unquoted but otherwise kept
/// as sent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaType {
    pub value: String,
    pub params: Vec<(String, String)>,
}

impl MediaType {
    pub fn parse(raw: &str) -> Self {
        let mut segments = split_params(raw).into_iter();
        let value = segments
            .next()
            .map(|s| s.trim().to_ascii_lowercase())
            .unwrap_or_default();

        let params = segments
            .filter_map(|segment| {
                let (name, value) = segment.split_once('=')?;
                let name = name.trim().to_ascii_lowercase();
                if name.is_empty() {
                    return None;
                }
                Some((name, unquote(value.trim())))
            })
            .collect();

        Self { value, params }
    }

    pub fn param(&self, name: &str) -> Option<&str> {
        self.params
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    pub fn is(&self, essence: &str) -> bool {
        self.value.eq_ignore_ascii_case(essence)
    }

    pub fn boundary(&self) -> Option<&str> {
        self.param("boundary").filter(|b| !b.is_empty())
    }
}

impl fmt::Display for MediaType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.value)?;
        for (k, v) in &self.params {
            write!(f, "; {}={}", k, v)?;
        }
        Ok(())
    }
}

/// `Content-Disposition` of a multipart part.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentDisposition {
    pub disposition: String,
    pub name: Option<String>,
    pub filename: Option<String>,
}

impl ContentDisposition {
    pub fn parse(raw: &str) -> Self {
        let parsed = MediaType::parse(raw);
        Self {
            name: parsed.param("name").map(str::to_string),
            filename: parsed.param("filename").map(|f| f.trim().to_string()),
            disposition: parsed.value,
        }
    }
}

// Splits on ';' outside of double quotes.
fn split_params(raw: &str) -> Vec<&str> {
    let mut out = Vec::new();
    let mut start = 0;
    let mut in_quotes = false;
    let mut escaped = false;

    for (i, ch) in raw.char_indices() {
        match ch {
            _ if escaped => escaped = false,
            '\\' if in_quotes => escaped = true,
            '"' => in_quotes = !in_quotes,
            ';' if !in_quotes => {
                out.push(&raw[start..i]);
                start = i + 1;
            }
            _ => {}
        }
    }
    out.push(&raw[start..]);
    out
}

fn unquote(value: &str) -> String {
    if value.len() >= 2 && value.starts_with('"') && value.ends_with('"') {
        let inner = &value[1..value.len() - 1];
        let mut out = String::with_capacity(inner.len());
        let mut chars = inner.chars();
        while let Some(ch) = chars.next() {
            if ch != '\\' {
                out.push(ch);
                continue;
            }
            // Only `\"` and `\\` are escapes; other backslashes are literal.
            match chars.clone().next() {
                Some(next @ ('"' | '\\')) => {
                    chars.next();
                    out.push(next);
                }
                _ => out.push(ch),
            }
        }
        out
    } else {
        value.to_string()
    }
}
