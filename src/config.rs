use std::{net::SocketAddr, time::Duration};

use crate::{
    core::planner::DEFAULT_MODEL,
    error::{PlanningError, Result},
    services::openai_client::DEFAULT_BASE_URL,
};

pub const DEFAULT_ALLOWED_ORIGINS: &str = "http://localhost:3001";
pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 8000;

/// Process-wide settings, read once at startup.
#[derive(Debug, Clone, PartialEq)]
pub struct ServiceConfig {
    pub api_key: String,
    pub base_url: String,
    pub model: String,
    pub allowed_origins: Vec<String>,
    pub host: String,
    pub port: u16,
    /// Transport timeout for provider calls; `None` leaves it to the HTTP client
    pub request_timeout: Option<Duration>,
    pub strict_schema: bool,
    /// Return raw provider messages to clients instead of a generic message
    pub expose_provider_errors: bool,
}

impl ServiceConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
            allowed_origins: parse_origins(DEFAULT_ALLOWED_ORIGINS),
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            request_timeout: None,
            strict_schema: false,
            expose_provider_errors: true,
        }
    }

    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build the configuration from a key lookup (the environment in production)
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| {
            lookup(key)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        let api_key = get("OPENAI_API_KEY").ok_or_else(|| {
            PlanningError::Config(
                "OPENAI_API_KEY environment variable must be set before starting the service"
                    .to_string(),
            )
        })?;

        let mut config = Self::new(api_key);

        if let Some(base_url) = get("OPENAI_BASE_URL") {
            config.base_url = base_url;
        }
        if let Some(model) = get("PLANNING_MODEL") {
            config.model = model;
        }
        if let Some(origins) = get("ALLOWED_ORIGINS") {
            config.allowed_origins = parse_origins(&origins);
        }
        if let Some(host) = get("HOST") {
            config.host = host;
        }
        if let Some(port) = get("PORT") {
            config.port = port
                .parse()
                .map_err(|err| PlanningError::Config(format!("Invalid PORT `{port}`: {err}")))?;
        }
        if let Some(timeout) = get("PLANNING_REQUEST_TIMEOUT_SECS") {
            let seconds: u64 = timeout.parse().map_err(|err| {
                PlanningError::Config(format!(
                    "Invalid PLANNING_REQUEST_TIMEOUT_SECS `{timeout}`: {err}"
                ))
            })?;
            config.request_timeout = Some(Duration::from_secs(seconds));
        }
        if let Some(flag) = get("PLANNING_STRICT_SCHEMA") {
            config.strict_schema = parse_flag("PLANNING_STRICT_SCHEMA", &flag)?;
        }
        if let Some(flag) = get("PLANNING_EXPOSE_PROVIDER_ERRORS") {
            config.expose_provider_errors = parse_flag("PLANNING_EXPOSE_PROVIDER_ERRORS", &flag)?;
        }

        Ok(config)
    }

    pub fn bind_addr(&self) -> Result<SocketAddr> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .map_err(|err| {
                PlanningError::Config(format!(
                    "Invalid bind address {}:{}: {}",
                    self.host, self.port, err
                ))
            })
    }
}

/// Split a comma-separated origin list, dropping blanks
pub fn parse_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|origin| !origin.is_empty())
        .map(str::to_string)
        .collect()
}

fn parse_flag(key: &str, value: &str) -> Result<bool> {
    match value.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(PlanningError::Config(format!(
            "Invalid boolean for {key}: `{value}`"
        ))),
    }
}
