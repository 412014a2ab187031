//! Shared helpers for connection and server tests.

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};

static NEXT_DIR: AtomicUsize = AtomicUsize::new(0);

/// A throwaway resource root, removed on drop.
pub struct ResourceRoot {
    path: PathBuf,
}

impl ResourceRoot {
    pub fn new() -> Self {
        let path = std::env::temp_dir().join(format!(
            "hearth-test-{}-{}",
            std::process::id(),
            NEXT_DIR.fetch_add(1, Ordering::Relaxed)
        ));
        std::fs::create_dir_all(&path).unwrap();
        Self { path }
    }

    pub fn with_file(self, name: &str, contents: &[u8]) -> Self {
        let file = self.path.join(name);
        if let Some(parent) = file.parent() {
            std::fs::create_dir_all(parent).unwrap();
        }
        std::fs::write(file, contents).unwrap();
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for ResourceRoot {
    fn drop(&mut self) {
        let _ = std::fs::remove_dir_all(&self.path);
    }
}

/// Splits a raw response into status line, header lines and body.
#[allow(dead_code)]
pub fn split_response(raw: &[u8]) -> (String, Vec<String>, Vec<u8>) {
    let end = raw
        .windows(4)
        .position(|w| w == b"\r\n\r\n")
        .expect("response has no header terminator");
    let head = String::from_utf8(raw[..end].to_vec()).unwrap();
    let mut lines = head.split("\r\n").map(str::to_string);
    let status = lines.next().unwrap();
    (status, lines.collect(), raw[end + 4..].to_vec())
}
