//! Route table mapping `(method, path)` to handlers.
//!
//! Lookups happen on every connection while registrations are rare, so the
//! table is a sharded concurrent map: readers never wait on each other.

use std::sync::Arc;

use dashmap::mapref::entry::Entry;
use dashmap::DashMap;

use crate::http::request::{Method, Request};
use crate::http::writer::ResponseSink;

/// Application callback for a matched route.
///
/// The handler writes the complete response, status line included, into
/// the sink.
pub trait Handler: Send + Sync + 'static {
    fn handle(&self, request: &Request, sink: &mut ResponseSink) -> anyhow::Result<()>;
}

impl<F> Handler for F
where
    F: Fn(&Request, &mut ResponseSink) -> anyhow::Result<()> + Send + Sync + 'static,
{
    fn handle(&self, request: &Request, sink: &mut ResponseSink) -> anyhow::Result<()> {
        self(request, sink)
    }
}

type RouteKey = (Method, String);

#[derive(Default)]
pub struct Router {
    routes: DashMap<RouteKey, Arc<dyn Handler>>,
}

impl Router {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `handler` for `method` and `path`.
    ///
    /// The first registration for a key wins. Later attempts are logged and
    /// return `false`.
    pub fn register<H: Handler>(
        &self,
        method: Method,
        path: impl Into<String>,
        handler: H,
    ) -> bool {
        let path = path.into();
        match self.routes.entry((method, path)) {
            Entry::Occupied(entry) => {
                let (method, path) = entry.key();
                tracing::warn!(
                    method = %method,
                    path = %path,
                    "A handler is already registered for this route"
                );
                false
            }
            Entry::Vacant(entry) => {
                tracing::debug!(method = %method, path = %entry.key().1, "Route registered");
                entry.insert(Arc::new(handler));
                true
            }
        }
    }

    pub fn resolve(&self, method: Method, path: &str) -> Option<Arc<dyn Handler>> {
        self.routes
            .get(&(method, path.to_string()))
            .map(|h| Arc::clone(h.value()))
    }

    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }
}
