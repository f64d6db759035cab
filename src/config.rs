//! Configuration for the annotation pipeline.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Default Ensembl REST server (GRCh37 assembly).
pub const DEFAULT_SERVER: &str = "https://grch37.rest.ensembl.org";

/// Default request ceiling per one-second window.
pub const DEFAULT_REQS_PER_SEC: u32 = 10;

/// Default per-request timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Default maximum attempts for a server-throttled (429) request.
pub const DEFAULT_MAX_RETRIES: u32 = 5;

/// Settings for the VEP client and rate limiter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnnotateConfig {
    /// Base URL of the Ensembl REST server.
    #[serde(default = "default_server")]
    pub server: String,
    /// Maximum requests admitted per one-second window.
    #[serde(default = "default_reqs_per_sec")]
    pub reqs_per_sec: u32,
    /// Per-request timeout in seconds.
    #[serde(default = "default_timeout_secs")]
    pub request_timeout_secs: u64,
    /// Maximum attempts when the server answers 429 before the variant is
    /// reported as still throttled.
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,
}

fn default_server() -> String {
    DEFAULT_SERVER.to_string()
}

fn default_reqs_per_sec() -> u32 {
    DEFAULT_REQS_PER_SEC
}

fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

fn default_max_retries() -> u32 {
    DEFAULT_MAX_RETRIES
}

impl Default for AnnotateConfig {
    fn default() -> Self {
        Self {
            server: default_server(),
            reqs_per_sec: DEFAULT_REQS_PER_SEC,
            request_timeout_secs: DEFAULT_TIMEOUT_SECS,
            max_retries: DEFAULT_MAX_RETRIES,
        }
    }
}

impl AnnotateConfig {
    /// Per-request timeout as a `Duration`.
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}
