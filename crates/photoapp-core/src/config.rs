use crate::retry::RetryPolicy;
use crate::transport::CurlOptions;
use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use url::Url;

/// Base URLs shorter than this are treated as placeholders.
pub const MIN_BASE_URL_LEN: usize = 16;

/// `[client]` section: where the web service lives.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceConfig {
    /// Base URL of the web service, plain http only.
    pub webservice: String,
}

/// Network timeouts (optional section in the config file).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpConfig {
    pub connect_timeout_secs: u64,
    /// Upper bound on a whole attempt, transfer included.
    pub timeout_secs: u64,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            connect_timeout_secs: 10,
            timeout_secs: 30,
        }
    }
}

/// Retry policy parameters (optional section in the config file).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetryConfig {
    /// Maximum number of attempts per request (including the first).
    pub max_attempts: u32,
    /// Linear backoff step in seconds (e.g. 1.0 = sleep 1s, then 2s).
    pub backoff_unit_secs: f64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            backoff_unit_secs: 1.0,
        }
    }
}

/// Client configuration, by default loaded from `~/.config/photoapp/config.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientConfig {
    pub client: ServiceConfig,
    /// Optional timeouts; if missing, built-in defaults are used.
    #[serde(default)]
    pub http: Option<HttpConfig>,
    /// Optional retry policy; if missing, built-in defaults are used.
    #[serde(default)]
    pub retry: Option<RetryConfig>,
}

impl ClientConfig {
    /// Base URL of the web service.
    ///
    /// [`parse`] has already validated and normalized `webservice`; this only
    /// turns it into a [`Url`].
    pub fn base_url(&self) -> Result<Url> {
        let raw = &self.client.webservice;
        let url = Url::parse(raw).with_context(|| format!("invalid base URL '{}'", raw))?;
        if url.scheme() != "http" {
            bail!("base URL '{}' must use http, got scheme '{}'", raw, url.scheme());
        }
        Ok(url)
    }

    pub fn curl_options(&self) -> Result<CurlOptions> {
        let http = self.http.clone().unwrap_or_default();
        if http.connect_timeout_secs == 0 || http.timeout_secs == 0 {
            bail!("[http] timeouts must be at least one second");
        }
        Ok(CurlOptions {
            connect_timeout: Duration::from_secs(http.connect_timeout_secs),
            timeout: Duration::from_secs(http.timeout_secs),
        })
    }

    pub fn retry_policy(&self) -> Result<RetryPolicy> {
        let retry = self.retry.clone().unwrap_or_default();
        if retry.max_attempts == 0 {
            bail!("[retry] max_attempts must be at least 1");
        }
        let backoff_unit = Duration::try_from_secs_f64(retry.backoff_unit_secs)
            .with_context(|| format!("[retry] invalid backoff_unit_secs {}", retry.backoff_unit_secs))?;
        Ok(RetryPolicy {
            max_attempts: retry.max_attempts,
            backoff_unit,
        })
    }
}

/// Check a configured base URL and strip one trailing slash.
///
/// Rejects values that are too short to be real, anything starting with
/// `https` (TLS is not supported), and anything that does not parse as an
/// `http` URL.
pub fn normalize_base_url(raw: &str) -> Result<String> {
    if raw.len() < MIN_BASE_URL_LEN {
        bail!("base URL '{}' is empty or not nearly long enough", raw);
    }
    if raw.starts_with("https") {
        bail!("base URL '{}' starts with https, which is not supported (use http)", raw);
    }
    let trimmed = raw.strip_suffix('/').unwrap_or(raw);
    let parsed = Url::parse(trimmed).with_context(|| format!("invalid base URL '{}'", raw))?;
    if parsed.scheme() != "http" {
        bail!("base URL '{}' must use http, got scheme '{}'", raw, parsed.scheme());
    }
    Ok(trimmed.to_string())
}

pub fn config_path() -> Result<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("photoapp")?;
    Ok(xdg_dirs.get_config_file("config.toml"))
}

/// Parse and validate configuration text.
pub fn parse(data: &str) -> Result<ClientConfig> {
    let mut cfg: ClientConfig = toml::from_str(data)?;
    cfg.client.webservice = normalize_base_url(&cfg.client.webservice)?;
    cfg.curl_options()?;
    cfg.retry_policy()?;
    Ok(cfg)
}

/// Load configuration from `path`. A missing or invalid file is an error;
/// there is no usable default for the service URL.
pub fn load(path: &Path) -> Result<ClientConfig> {
    if !path.is_file() {
        bail!("config file '{}' does not exist", path.display());
    }
    let data = fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    let cfg = parse(&data).with_context(|| format!("invalid config {}", path.display()))?;
    tracing::debug!(path = %path.display(), webservice = %cfg.client.webservice, "loaded config");
    Ok(cfg)
}
