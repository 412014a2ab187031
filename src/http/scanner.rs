//! Delimiter search over byte buffers.
//!
//! Request lines, header blocks and multipart boundaries are all located by
//! searching for a fixed byte sequence inside a bounded window. [`find`] is the
//! stateless primitive; [`ByteCursor`] wraps it with explicit position
//! bookkeeping so callers never juggle raw offsets.

/// Finds the first occurrence of `needle` in `haystack[start..end]`.
///
/// Returns the absolute index into `haystack`, or `None` when the needle is
/// empty, the range is out of bounds, or there is no match.
pub fn find(haystack: &[u8], needle: &[u8], start: usize, end: usize) -> Option<usize> {
    let end = end.min(haystack.len());
    if needle.is_empty() || start >= end || end - start < needle.len() {
        return None;
    }

    haystack[start..end]
        .windows(needle.len())
        .position(|w| w == needle)
        .map(|i| start + i)
}

/// Read cursor over an in-memory buffer.
#[derive(Debug, Clone)]
pub struct ByteCursor<'a> {
    buf: &'a [u8],
    pos: usize,
}

impl<'a> ByteCursor<'a> {
    pub fn new(buf: &'a [u8]) -> Self {
        Self { buf, pos: 0 }
    }

    pub fn position(&self) -> usize {
        self.pos
    }

    /// Bytes not yet consumed.
    pub fn remaining(&self) -> &'a [u8] {
        &self.buf[self.pos..]
    }

    pub fn is_empty(&self) -> bool {
        self.pos >= self.buf.len()
    }

    pub fn starts_with(&self, prefix: &[u8]) -> bool {
        self.remaining().starts_with(prefix)
    }

    /// Absolute index of the next `needle`, without consuming anything.
    pub fn find_delimiter(&self, needle: &[u8]) -> Option<usize> {
        find(self.buf, needle, self.pos, self.buf.len())
    }

    /// Consumes exactly `n` bytes, or nothing if fewer remain.
    pub fn read_n(&mut self, n: usize) -> Option<&'a [u8]> {
        let end = self.pos.checked_add(n)?;
        if end > self.buf.len() {
            return None;
        }
        let out = &self.buf[self.pos..end];
        self.pos = end;
        Some(out)
    }

    /// Consumes bytes up to and including `needle`, returning the bytes before it.
    pub fn read_until(&mut self, needle: &[u8]) -> Option<&'a [u8]> {
        let at = self.find_delimiter(needle)?;
        let out = &self.buf[self.pos..at];
        self.pos = at + needle.len();
        Some(out)
    }

    /// Advances past `prefix` if the cursor is positioned on it.
    pub fn skip_prefix(&mut self, prefix: &[u8]) -> bool {
        if self.starts_with(prefix) {
            self.pos += prefix.len();
            true
        } else {
            false
        }
    }

    /// Moves the cursor to an absolute offset obtained from [`find_delimiter`].
    ///
    /// [`find_delimiter`]: ByteCursor::find_delimiter
    pub fn seek(&mut self, pos: usize) {
        self.pos = pos.min(self.buf.len());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn find_respects_bounds() {
        let buf = b"GET / HTTP/1.1\r\nHost: a\r\n\r\n";
        assert_eq!(find(buf, b"\r\n", 0, buf.len()), Some(14));
        assert_eq!(find(buf, b"\r\n\r\n", 0, buf.len()), Some(23));
        assert_eq!(find(buf, b"\r\n\r\n", 0, 20), None);
        assert_eq!(find(buf, b"\r\n", 15, buf.len()), Some(23));
    }

    #[test]
    fn find_handles_degenerate_input() {
        assert_eq!(find(b"abc", b"", 0, 3), None);
        assert_eq!(find(b"abc", b"abcd", 0, 3), None);
        assert_eq!(find(b"abc", b"c", 5, 10), None);
        assert_eq!(find(b"abc", b"c", 0, 100), Some(2));
    }

    #[test]
    fn cursor_reads_in_sequence() {
        let mut cur = ByteCursor::new(b"one\r\ntwo\r\nrest");
        assert_eq!(cur.read_until(b"\r\n"), Some(&b"one"[..]));
        assert_eq!(cur.read_until(b"\r\n"), Some(&b"two"[..]));
        assert_eq!(cur.read_until(b"\r\n"), None);
        assert_eq!(cur.read_n(2), Some(&b"re"[..]));
        assert_eq!(cur.read_n(3), None);
        assert_eq!(cur.remaining(), b"st");
        assert!(cur.skip_prefix(b"st"));
        assert!(cur.is_empty());
    }
}
