//! Resolver configuration: the base URL and the default header set.
//!
//! # Design
//! `Defaults` is built once and owned by a `Resolver`; nothing reads
//! process-wide state per call. `from_env` is the only place environment
//! variables are consulted.

use crate::http::set_header;

pub const DEFAULT_BASE_URL: &str = "https://api.github.com";
pub const DEFAULT_ACCEPT: &str = "application/vnd.github.v3+json";

pub const BASE_URL_ENV: &str = "REQUEST_BASE_URL";
pub const USER_AGENT_ENV: &str = "REQUEST_USER_AGENT";

/// `<product>/<version> (<os>; <arch>)` for this build.
pub fn default_user_agent() -> String {
    format!(
        "{}/{} ({}; {})",
        env!("CARGO_PKG_NAME"),
        env!("CARGO_PKG_VERSION"),
        std::env::consts::OS,
        std::env::consts::ARCH
    )
}

/// Immutable per-resolver defaults.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Defaults {
    base_url: String,
    headers: Vec<(String, String)>,
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            headers: vec![
                ("accept".to_string(), DEFAULT_ACCEPT.to_string()),
                ("user-agent".to_string(), default_user_agent()),
            ],
        }
    }
}

impl Defaults {
    pub fn new() -> Self {
        Self::default()
    }

    /// Defaults overridden by `REQUEST_BASE_URL` / `REQUEST_USER_AGENT` when set.
    pub fn from_env() -> Self {
        let mut defaults = Self::default();
        if let Ok(base_url) = std::env::var(BASE_URL_ENV) {
            if !base_url.trim().is_empty() {
                defaults = defaults.with_base_url(base_url.trim());
            }
        }
        if let Ok(user_agent) = std::env::var(USER_AGENT_ENV) {
            if !user_agent.trim().is_empty() {
                defaults = defaults.with_header("user-agent", user_agent.trim());
            }
        }
        defaults
    }

    pub fn with_base_url(mut self, base_url: &str) -> Self {
        self.base_url = base_url.trim_end_matches('/').to_string();
        self
    }

    pub fn with_header(mut self, name: &str, value: impl Into<String>) -> Self {
        set_header(&mut self.headers, name, value.into());
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn headers(&self) -> &[(String, String)] {
        &self.headers
    }
}
