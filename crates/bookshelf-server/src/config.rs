//! Server configuration from environment variables.

use std::env;
use std::path::PathBuf;
use std::time::Duration;

/// Server configuration.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Server port to listen on.
    pub port: u16,
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,
    /// Largest limit a query may request.
    pub max_limit: usize,
    /// Languages kept at ingest.
    pub languages: Vec<String>,
    /// Download formats kept at ingest (friendly names).
    pub formats: Vec<String>,
    /// How often to re-fetch the catalog archive.
    pub refresh_time: Duration,
    /// Where the catalog archive lives: an http(s) URL, or a local path
    /// for testing.
    pub url: String,
    /// Load no more than this many books (0 = unlimited). Useful for
    /// debugging.
    pub load_at_most: usize,
    /// Directory holding the HTML templates.
    pub template_dir: PathBuf,
    /// Reload templates on every request (useful while editing them).
    pub no_cache_templates: bool,
    /// Path served under /static, if any.
    pub static_root: Option<PathBuf>,
}

/// The catalog URL current at gutenberg.org is
/// `http://www.gutenberg.org/cache/epub/feeds/rdf-files.tar.bz2`. Please do
/// not point tests at it; download a local copy and keep the default a
/// local path, overriding it only in production configuration.
const DEFAULT_URL: &str = "./data/rdf-files.tar.bz2";

/// Spread refreshes so we don't hit the upstream at the same time every day.
const DEFAULT_REFRESH: &str = "23h 17m";

const DEFAULT_FORMATS: &str = "plain_8859.1,plain_ascii,plain_utf8,mobi,epub";

fn split_csv(s: &str) -> Vec<String> {
    s.split(',')
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .map(str::to_string)
        .collect()
}

fn duration_var(name: &str, default: &str) -> Result<Duration, ConfigError> {
    let raw = env::var(name).unwrap_or_else(|_| default.to_string());
    humantime::parse_duration(&raw).map_err(|e| ConfigError::InvalidValue {
        name: name.to_string(),
        reason: e.to_string(),
    })
}

impl ServerConfig {
    /// Load configuration from environment variables.
    ///
    /// All variables are optional:
    /// - `PORT`: server port (default: 3000)
    /// - `LOG_LEVEL`: logging level (default: "info")
    /// - `MAX_LIMIT`: largest per-query limit (default: 100)
    /// - `LANGUAGES`: comma-separated ingest language allow-list
    ///   (default: "en")
    /// - `FORMATS`: comma-separated ingest format allow-list
    ///   (default: the most popular formats)
    /// - `REFRESH_TIME`: refresh interval (default: "23h 17m")
    /// - `URL`: catalog archive source (default: a local test path)
    /// - `LOAD_AT_MOST`: book cap, 0 = unlimited (default: 0)
    /// - `TEMPLATE_DIR`: template directory (default: "./data")
    /// - `NO_CACHE_TEMPLATES`: reload templates per request (default: false)
    /// - `STATIC_ROOT`: static file root; unset disables static service
    pub fn from_env() -> Result<Self, ConfigError> {
        let port = env::var("PORT")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(3000);

        let log_level = env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        let max_limit = env::var("MAX_LIMIT")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(100);

        let languages = split_csv(&env::var("LANGUAGES").unwrap_or_else(|_| "en".to_string()));
        let formats =
            split_csv(&env::var("FORMATS").unwrap_or_else(|_| DEFAULT_FORMATS.to_string()));

        let refresh_time = duration_var("REFRESH_TIME", DEFAULT_REFRESH)?;

        let url = env::var("URL").unwrap_or_else(|_| DEFAULT_URL.to_string());

        let load_at_most = env::var("LOAD_AT_MOST")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(0);

        let template_dir =
            PathBuf::from(env::var("TEMPLATE_DIR").unwrap_or_else(|_| "./data".to_string()));

        let no_cache_templates = env::var("NO_CACHE_TEMPLATES")
            .map(|s| s.to_lowercase() != "false" && s != "0" && !s.is_empty())
            .unwrap_or(false);

        let static_root = env::var("STATIC_ROOT").ok().map(PathBuf::from);

        Ok(Self {
            port,
            log_level,
            max_limit,
            languages,
            formats,
            refresh_time,
            url,
            load_at_most,
            template_dir,
            no_cache_templates,
            static_root,
        })
    }

    /// Get the socket address for the server.
    pub fn socket_addr(&self) -> std::net::SocketAddr {
        std::net::SocketAddr::from(([0, 0, 0, 0], self.port))
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Invalid environment variable value.
    #[error("invalid value for environment variable {name}: {reason}")]
    InvalidValue { name: String, reason: String },
}
