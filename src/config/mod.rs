use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, warn};

/// Application configuration
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Base URL of the shop's booking API
    pub base_url: String,

    /// Request timeout in seconds; unset leaves the transport default
    pub request_timeout_secs: Option<u64>,

    /// Log file for interactive mode
    pub log_file: Option<PathBuf>,

    /// Enable mouse support
    pub mouse_enabled: bool,

    /// Interval between UI ticks in milliseconds
    pub tick_rate_ms: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:5000".to_string(),
            request_timeout_secs: None,
            log_file: None,
            mouse_enabled: true,
            tick_rate_ms: 100,
        }
    }
}

impl Config {
    /// Initialize configuration from defaults, a config file and the environment.
    ///
    /// An explicitly given file must exist; otherwise the usual locations are
    /// searched and a missing file is not an error.
    pub async fn init(explicit: Option<&Path>) -> Result<Self> {
        debug!("Initializing configuration");

        let mut config = Self::default();

        let file_config = match explicit {
            Some(path) => Some(Self::load_from_path(path).await?),
            None => Self::load_from_file().await?,
        };
        if let Some(file_config) = file_config {
            config.merge_with(file_config);
        }

        config.load_from_env();
        Ok(config)
    }

    /// Configuration file candidates, highest priority first
    pub fn search_paths() -> Vec<PathBuf> {
        let mut paths = vec![
            PathBuf::from("./.barbertime.json"),
            PathBuf::from("./barbertime.json"),
        ];

        if let Some(config_dir) = dirs::config_dir() {
            paths.push(config_dir.join("barbertime").join("config.json"));
        }

        paths
    }

    /// Load the first configuration file found, if any
    pub async fn load_from_file() -> Result<Option<Self>> {
        for path in Self::search_paths() {
            if path.exists() {
                return Self::load_from_path(&path).await.map(Some);
            }
        }
        Ok(None)
    }

    pub async fn load_from_path(path: &Path) -> Result<Self> {
        debug!("Loading configuration from: {}", path.display());
        let content = tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        serde_json::from_str(&content)
            .with_context(|| format!("Invalid config file {}", path.display()))
    }

    /// Load configuration from environment variables
    pub fn load_from_env(&mut self) {
        self.apply_env(|key| std::env::var(key).ok());
    }

    fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(base_url) = lookup("BARBERTIME_BASE_URL") {
            self.base_url = base_url;
        }

        if let Some(timeout) = lookup("BARBERTIME_TIMEOUT") {
            match timeout.parse() {
                Ok(secs) => self.request_timeout_secs = Some(secs),
                Err(_) => warn!("Ignoring BARBERTIME_TIMEOUT={:?}: not a number of seconds", timeout),
            }
        }

        if let Some(log_file) = lookup("BARBERTIME_LOG_FILE") {
            self.log_file = Some(PathBuf::from(log_file));
        }

        if let Some(mouse) = lookup("BARBERTIME_MOUSE") {
            self.mouse_enabled = !matches!(mouse.to_lowercase().as_str(), "0" | "false" | "off");
        }

        if let Some(tick) = lookup("BARBERTIME_TICK_MS") {
            match tick.parse() {
                Ok(ms) => self.tick_rate_ms = ms,
                Err(_) => warn!("Ignoring BARBERTIME_TICK_MS={:?}: not a number", tick),
            }
        }
    }

    /// Merge another configuration into this one
    pub fn merge_with(&mut self, other: Self) {
        let defaults = Self::default();

        if other.base_url != defaults.base_url {
            self.base_url = other.base_url;
        }
        if other.request_timeout_secs.is_some() {
            self.request_timeout_secs = other.request_timeout_secs;
        }
        if other.log_file.is_some() {
            self.log_file = other.log_file;
        }
        if other.mouse_enabled != defaults.mouse_enabled {
            self.mouse_enabled = other.mouse_enabled;
        }
        if other.tick_rate_ms != defaults.tick_rate_ms {
            self.tick_rate_ms = other.tick_rate_ms;
        }
    }

    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout_secs.map(Duration::from_secs)
    }

    pub fn tick_rate(&self) -> Duration {
        Duration::from_millis(self.tick_rate_ms)
    }

    /// Where interactive mode writes its log
    pub fn log_path(&self) -> PathBuf {
        self.log_file.clone().unwrap_or_else(|| {
            dirs::cache_dir()
                .unwrap_or_else(std::env::temp_dir)
                .join("barbertime")
                .join("barbertime.log")
        })
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        let url = reqwest::Url::parse(&self.base_url)
            .with_context(|| format!("base_url {:?} is not a valid URL", self.base_url))?;

        if !matches!(url.scheme(), "http" | "https") {
            return Err(anyhow::anyhow!(
                "base_url must use http or https, got {}",
                url.scheme()
            ));
        }

        if self.request_timeout_secs == Some(0) {
            return Err(anyhow::anyhow!("request_timeout_secs must be greater than 0"));
        }

        if !(10..=1000).contains(&self.tick_rate_ms) {
            return Err(anyhow::anyhow!("tick_rate_ms must be between 10 and 1000"));
        }

        Ok(())
    }
}
