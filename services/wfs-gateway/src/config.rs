//! Gateway settings resolved from the environment (or flags) at startup.

use std::net::SocketAddr;
use std::time::Duration;

use clap::Parser;

pub const DEFAULT_ENVIRONMENT: &str = "production";
pub const DEFAULT_PORT: u16 = 8000;
pub const DEFAULT_ALLOWED_ORIGINS: &str = "*";
pub const DEFAULT_GEOSERVER_URL: &str = "http://localhost:8080/geoserver";
pub const DEFAULT_GEOSERVER_USER: &str = "admin";
pub const DEFAULT_GEOSERVER_PASS: &str = "geoserver";
pub const DEFAULT_SRS: &str = "EPSG:4326";
pub const DEFAULT_REQUEST_TIMEOUT_SECONDS: u64 = 15;

/// WFS Gateway settings
///
/// Each value can be set with a flag or its environment variable. Numeric
/// values that fail to parse abort startup.
#[derive(Parser, Debug, Clone)]
#[command(name = "wfs-gateway")]
#[command(about = "REST gateway in front of an OGC WFS server")]
pub struct Settings {
    /// Deployment environment ("development" enables human-readable logs)
    #[arg(long, env = "FLASK_ENV", default_value = DEFAULT_ENVIRONMENT)]
    pub environment: String,

    /// Listen port
    #[arg(long, env = "PORT", default_value_t = DEFAULT_PORT)]
    pub port: u16,

    /// Origins allowed to call /api/* ("*" or a comma-separated list)
    #[arg(long, env = "ALLOWED_ORIGINS", default_value = DEFAULT_ALLOWED_ORIGINS)]
    pub allowed_origins: String,

    /// Base URL of the GeoServer instance (the WFS endpoint is <url>/wfs)
    #[arg(long, env = "GEOSERVER_URL", default_value = DEFAULT_GEOSERVER_URL)]
    pub geoserver_url: String,

    /// Basic auth user for upstream requests
    #[arg(long, env = "GEOSERVER_USER", default_value = DEFAULT_GEOSERVER_USER)]
    pub geoserver_user: String,

    /// Basic auth password for upstream requests
    #[arg(long, env = "GEOSERVER_PASS", default_value = DEFAULT_GEOSERVER_PASS, hide_env_values = true)]
    pub geoserver_pass: String,

    /// Workspace prefixed to unqualified type names (empty = none)
    #[arg(long, env = "GEOSERVER_DEFAULT_WORKSPACE", default_value = "")]
    pub default_workspace: String,

    /// SRS used when a feature request does not name one
    #[arg(long, env = "GEOSERVER_DEFAULT_SRS", default_value = DEFAULT_SRS)]
    pub default_srs: String,

    /// Upper bound on each upstream request, in seconds
    #[arg(long, env = "REQUEST_TIMEOUT_SECONDS", default_value_t = DEFAULT_REQUEST_TIMEOUT_SECONDS)]
    pub request_timeout_seconds: u64,

    /// Log level
    #[arg(long, default_value = "info", env = "RUST_LOG")]
    pub log_level: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            environment: DEFAULT_ENVIRONMENT.to_string(),
            port: DEFAULT_PORT,
            allowed_origins: DEFAULT_ALLOWED_ORIGINS.to_string(),
            geoserver_url: DEFAULT_GEOSERVER_URL.to_string(),
            geoserver_user: DEFAULT_GEOSERVER_USER.to_string(),
            geoserver_pass: DEFAULT_GEOSERVER_PASS.to_string(),
            default_workspace: String::new(),
            default_srs: DEFAULT_SRS.to_string(),
            request_timeout_seconds: DEFAULT_REQUEST_TIMEOUT_SECONDS,
            log_level: "info".to_string(),
        }
    }
}

/// Which origins may make cross-origin requests to the API.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AllowedOrigins {
    Any,
    List(Vec<String>),
}

impl Settings {
    pub fn is_development(&self) -> bool {
        self.environment == "development"
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_seconds)
    }

    pub fn listen_addr(&self) -> SocketAddr {
        SocketAddr::from(([0, 0, 0, 0], self.port))
    }

    /// The WFS endpoint, `<geoserver_url>/wfs`, without doubled slashes.
    pub fn wfs_endpoint(&self) -> String {
        format!("{}/wfs", self.geoserver_url.trim_end_matches('/'))
    }

    pub fn cors_origins(&self) -> AllowedOrigins {
        let origins: Vec<String> = self
            .allowed_origins
            .split(',')
            .map(str::trim)
            .filter(|o| !o.is_empty())
            .map(str::to_string)
            .collect();

        if origins.is_empty() || origins.iter().any(|o| o == "*") {
            AllowedOrigins::Any
        } else {
            AllowedOrigins::List(origins)
        }
    }
}
