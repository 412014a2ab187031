use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::Context;
use serde::Deserialize;

use crate::http::request::Method;

/// Server settings, fixed for the lifetime of the process.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Address to bind, `host:port`.
    pub listen_addr: String,
    /// Directory static files are served from.
    pub resource_root: PathBuf,
    /// Methods accepted on the request line; others are answered with 404.
    pub allowed_methods: Vec<Method>,
    /// Maximum number of connections processed at once.
    pub worker_pool_size: usize,
    /// Size of the initial read that must hold the request line and headers.
    pub read_buffer_size: usize,
    /// Largest Content-Length that will be read.
    pub max_body_size: usize,
    /// Optional deadline for a whole connection. Unset means no deadline.
    pub request_timeout_secs: Option<u64>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            listen_addr: "127.0.0.1:9999".to_string(),
            resource_root: PathBuf::from("./public"),
            allowed_methods: vec![Method::GET, Method::POST],
            worker_pool_size: 64,
            read_buffer_size: 4096,
            max_body_size: 10 * 1024 * 1024,
            request_timeout_secs: None,
        }
    }
}

impl Config {
    /// Loads from the YAML file named by `HEARTH_CONFIG`, or defaults.
    ///
    /// `LISTEN` overrides the bind address either way.
    pub fn load() -> anyhow::Result<Self> {
        let mut cfg = match std::env::var("HEARTH_CONFIG") {
            Ok(path) => Self::from_file(Path::new(&path))?,
            Err(_) => Self::default(),
        };

        if let Ok(listen) = std::env::var("LISTEN") {
            cfg.listen_addr = listen;
        }

        cfg.validate()?;
        Ok(cfg)
    }

    pub fn from_file(path: &Path) -> anyhow::Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        Self::from_yaml_str(&raw).with_context(|| format!("parsing config {}", path.display()))
    }

    pub fn from_yaml_str(raw: &str) -> anyhow::Result<Self> {
        let cfg: Config = serde_yaml::from_str(raw)?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        if self.worker_pool_size == 0 {
            anyhow::bail!("worker_pool_size must be at least 1");
        }
        if self.read_buffer_size == 0 {
            anyhow::bail!("read_buffer_size must be at least 1");
        }
        if self.allowed_methods.is_empty() {
            anyhow::bail!("allowed_methods must not be empty");
        }
        Ok(())
    }

    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout_secs.map(Duration::from_secs)
    }
}
