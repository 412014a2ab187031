//! `application/x-www-form-urlencoded` bodies and query strings.

use url::form_urlencoded;

/// Ordered multimap from field name to values.
///
/// Keys keep the order in which they were first seen; values under one key
/// keep insertion order and may repeat.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldMap<T> {
    fields: Vec<(String, Vec<T>)>,
}

impl<T> Default for FieldMap<T> {
    fn default() -> Self {
        Self { fields: Vec::new() }
    }
}

impl<T> FieldMap<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, name: impl Into<String>, value: T) {
        let name = name.into();
        match self.fields.iter_mut().find(|(k, _)| *k == name) {
            Some((_, values)) => values.push(value),
            None => self.fields.push((name, vec![value])),
        }
    }

    pub fn get(&self, name: &str) -> Option<&[T]> {
        self.fields
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_slice())
    }

    pub fn first(&self, name: &str) -> Option<&T> {
        self.get(name).and_then(|v| v.first())
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|(k, _)| k.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[T])> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v.as_slice()))
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

/// Decodes `a=1&b=2` into ordered pairs. `+` and percent escapes are decoded.
pub fn parse_pairs(input: &[u8]) -> Vec<(String, String)> {
    form_urlencoded::parse(input)
        .filter(|(k, _)| !k.is_empty())
        .map(|(k, v)| (k.into_owned(), v.into_owned()))
        .collect()
}

/// Decodes a form body into a [`FieldMap`].
pub fn decode(body: &[u8]) -> FieldMap<String> {
    let mut map = FieldMap::new();
    for (k, v) in parse_pairs(body) {
        map.push(k, v);
    }
    map
}

/// Encodes pairs as a form body or query string.
pub fn encode<I, K, V>(pairs: I) -> String
where
    I: IntoIterator<Item = (K, V)>,
    K: AsRef<str>,
    V: AsRef<str>,
{
    form_urlencoded::Serializer::new(String::new())
        .extend_pairs(pairs)
        .finish()
}
