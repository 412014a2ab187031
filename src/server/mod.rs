//! Accepting connections and deciding what answers them.
//!
//! - **`listener`**: binds the socket and runs the accept loop over a bounded worker pool
//! - **`router`**: the `(method, path)` handler table
//! - **`static_files`**: fallback file lookup under the resource root

pub mod listener;
pub mod router;
pub mod static_files;

pub use listener::Server;
pub use router::{Handler, Router};
pub use static_files::{StaticFile, StaticFiles};

use crate::config::Config;
use crate::http::request::Method;

/// State every connection worker reads. Only the router is ever mutated,
/// and it handles its own synchronization.
pub struct ServerState {
    pub allowed_methods: Vec<Method>,
    pub read_buffer_size: usize,
    pub max_body_size: usize,
    pub router: Router,
    pub static_files: StaticFiles,
}

impl ServerState {
    pub fn new(config: &Config) -> Self {
        Self {
            allowed_methods: config.allowed_methods.clone(),
            read_buffer_size: config.read_buffer_size,
            max_body_size: config.max_body_size,
            router: Router::new(),
            static_files: StaticFiles::new(config.resource_root.clone()),
        }
    }
}
