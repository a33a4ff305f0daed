use crate::error::{ExtractorError, Result};
use std::env;
use std::path::{Path, PathBuf};

pub const DEFAULT_BASE_URL: &str = "https://api.mistral.ai/v1";
pub const DEFAULT_MODEL: &str = "mistral-large-latest";
pub const DEFAULT_MAX_WORKERS: usize = 8;
pub const DEFAULT_TIMEOUT_SECS: u64 = 120;
pub const DEFAULT_SECRETS_FILE: &str = ".secrets.toml";
pub const API_KEY_NAME: &str = "MISTRAL_API_KEY";

#[derive(Debug, Clone)]
pub struct MistralConfig {
    pub api_key: Option<String>,
    pub base_url: String,
    pub model: String,
    pub max_workers: usize,
    pub timeout_secs: u64,
}

impl Default for MistralConfig {
    fn default() -> Self {
        MistralConfig {
            api_key: None,
            base_url: DEFAULT_BASE_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
            max_workers: DEFAULT_MAX_WORKERS,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

impl MistralConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_env() -> Self {
        let defaults = Self::default();
        let api_key = env::var(API_KEY_NAME).ok().filter(|k| !k.trim().is_empty());
        let base_url = env::var("MISTRAL_BASE_URL").unwrap_or(defaults.base_url);
        let model = env::var("MISTRAL_MODEL").unwrap_or(defaults.model);
        let max_workers = env::var("MISTRAL_MAX_WORKERS")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(defaults.max_workers);
        let timeout_secs = env::var("MISTRAL_TIMEOUT_SECS")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(defaults.timeout_secs);

        MistralConfig {
            api_key,
            base_url,
            model,
            max_workers: max_workers.max(1),
            timeout_secs,
        }
    }

    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_max_workers(mut self, max_workers: usize) -> Self {
        self.max_workers = max_workers.max(1);
        self
    }

    pub fn with_timeout_secs(mut self, timeout_secs: u64) -> Self {
        self.timeout_secs = timeout_secs;
        self
    }

    /// Returns the API key or the error shown to the user when none is configured.
    pub fn require_api_key(&self) -> Result<&str> {
        self.api_key.as_deref().ok_or_else(|| {
            ExtractorError::ConfigError(format!(
                "Mistral API key not found. Add {} to `{}` or the environment.",
                API_KEY_NAME, DEFAULT_SECRETS_FILE
            ))
        })
    }
}

#[derive(Debug, Clone)]
pub struct PdfConfig {
    /// Rasterisation resolution in dots per inch.
    pub resolution: u32,
    /// Pages wider than this are scaled down, keeping the aspect ratio.
    pub max_width: u32,
}

impl Default for PdfConfig {
    fn default() -> Self {
        PdfConfig {
            resolution: 230,
            max_width: 1024,
        }
    }
}

impl PdfConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_env() -> Self {
        let defaults = Self::default();
        let resolution = env::var("PDF_RESOLUTION")
            .ok()
            .and_then(|s| s.parse().ok())
            .filter(|r: &u32| *r > 0)
            .unwrap_or(defaults.resolution);
        let max_width = env::var("PDF_MAX_WIDTH")
            .ok()
            .and_then(|s| s.parse().ok())
            .filter(|w: &u32| *w > 0)
            .unwrap_or(defaults.max_width);

        PdfConfig {
            resolution,
            max_width,
        }
    }

    pub fn with_resolution(mut self, resolution: u32) -> Self {
        self.resolution = resolution;
        self
    }

    pub fn with_max_width(mut self, max_width: u32) -> Self {
        self.max_width = max_width;
        self
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub max_upload_mb: usize,
    pub mistral: MistralConfig,
    pub pdf: PdfConfig,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            host: "127.0.0.1".to_string(),
            port: 8080,
            max_upload_mb: 25,
            mistral: MistralConfig::default(),
            pdf: PdfConfig::default(),
        }
    }
}

impl Config {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reads the environment, then lets the secrets file override the API key.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        let host = env::var("HOST").unwrap_or(defaults.host);
        let port = env::var("PORT")
            .ok()
            .and_then(|port| port.parse().ok())
            .unwrap_or(defaults.port);
        let max_upload_mb = env::var("MAX_UPLOAD_MB")
            .ok()
            .and_then(|mb| mb.parse().ok())
            .unwrap_or(defaults.max_upload_mb);

        let mut mistral = MistralConfig::from_env();
        let secrets_path =
            env::var("SECRETS_FILE").unwrap_or_else(|_| DEFAULT_SECRETS_FILE.to_string());
        match SecretStore::load(&secrets_path) {
            Ok(store) => {
                if let Some(key) = store.get(API_KEY_NAME) {
                    mistral.api_key = Some(key.to_string());
                }
            }
            Err(e) => log::debug!("Secrets file not used: {}", e),
        }

        Config {
            host,
            port,
            max_upload_mb,
            mistral,
            pdf: PdfConfig::from_env(),
        }
    }

    pub fn with_host(mut self, host: impl Into<String>) -> Self {
        self.host = host.into();
        self
    }

    pub fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    pub fn with_mistral(mut self, config: MistralConfig) -> Self {
        self.mistral = config;
        self
    }

    pub fn with_pdf(mut self, config: PdfConfig) -> Self {
        self.pdf = config;
        self
    }

    pub fn max_upload_bytes(&self) -> usize {
        self.max_upload_mb.saturating_mul(1024 * 1024)
    }
}

/// Flat TOML secrets file, e.g. `MISTRAL_API_KEY = "..."`.
#[derive(Debug, Clone, Default)]
pub struct SecretStore {
    values: toml::Table,
    path: PathBuf,
}

impl SecretStore {
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            ExtractorError::ConfigError(format!("cannot read {}: {}", path.display(), e))
        })?;
        let mut store = Self::parse(&content)?;
        store.path = path.to_path_buf();
        Ok(store)
    }

    pub fn parse(content: &str) -> Result<Self> {
        let values: toml::Table = toml::from_str(content)
            .map_err(|e| ExtractorError::ConfigError(format!("invalid secrets file: {}", e)))?;
        Ok(SecretStore {
            values,
            path: PathBuf::new(),
        })
    }

    /// Non-string and blank entries are treated as absent.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.values
            .get(name)
            .and_then(|v| v.as_str())
            .filter(|v| !v.trim().is_empty())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}
