//! # Server Configuration
//!
//! Settings are resolved in three layers, later ones winning:
//!
//! 1. Built-in defaults (data under `~/Documents/Fairshare`)
//! 2. An optional `fairshare.yaml` in the data directory
//! 3. `FAIRSHARE_*` environment variables
//!
//! ```yaml
//! bind_address: "0.0.0.0:3000"
//! cors_origin: "http://localhost:8080"
//! split_tolerance: 0.01
//! ```

use anyhow::{anyhow, bail, Context, Result};
use axum::http::HeaderValue;
use log::{debug, info};
use serde::Deserialize;
use std::fs;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};

pub const CONFIG_FILE_NAME: &str = "fairshare.yaml";

pub const ENV_DATA_DIR: &str = "FAIRSHARE_DATA_DIR";
pub const ENV_BIND_ADDR: &str = "FAIRSHARE_BIND_ADDR";
pub const ENV_CORS_ORIGIN: &str = "FAIRSHARE_CORS_ORIGIN";
pub const ENV_SPLIT_TOLERANCE: &str = "FAIRSHARE_SPLIT_TOLERANCE";

const DEFAULT_BIND_ADDRESS: &str = "127.0.0.1:3000";
const DEFAULT_CORS_ORIGIN: &str = "http://localhost:8080";

#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub data_directory: PathBuf,
    pub bind_address: String,
    pub cors_origin: String,
    /// Absolute slack allowed when checking that split shares add up.
    /// Zero demands exact float equality.
    pub split_tolerance: f64,
}

/// Shape of `fairshare.yaml`; every key is optional
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct ConfigFile {
    bind_address: Option<String>,
    cors_origin: Option<String>,
    split_tolerance: Option<f64>,
}

impl AppConfig {
    /// Defaults rooted at the given data directory
    pub fn with_data_directory<P: AsRef<Path>>(data_directory: P) -> Self {
        Self {
            data_directory: data_directory.as_ref().to_path_buf(),
            bind_address: DEFAULT_BIND_ADDRESS.to_string(),
            cors_origin: DEFAULT_CORS_ORIGIN.to_string(),
            split_tolerance: 0.0,
        }
    }

    /// Resolve configuration from the process environment
    pub fn load() -> Result<Self> {
        Self::load_with(|key| std::env::var(key).ok())
    }

    /// Resolve configuration using `lookup` in place of the process environment
    pub fn load_with<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let data_directory = match lookup(ENV_DATA_DIR).filter(|v| !v.trim().is_empty()) {
            Some(dir) => PathBuf::from(dir.trim()),
            None => Self::default_data_directory(&lookup)?,
        };
        let mut config = Self::with_data_directory(data_directory);

        let config_path = config.data_directory.join(CONFIG_FILE_NAME);
        if config_path.exists() {
            config.apply_file(&config_path)?;
        } else {
            debug!("No config file at {}, using defaults", config_path.display());
        }

        if let Some(bind_address) = lookup(ENV_BIND_ADDR) {
            config.bind_address = bind_address.trim().to_string();
        }
        if let Some(cors_origin) = lookup(ENV_CORS_ORIGIN) {
            config.cors_origin = cors_origin.trim().to_string();
        }
        if let Some(tolerance) = lookup(ENV_SPLIT_TOLERANCE) {
            config.split_tolerance = tolerance
                .trim()
                .parse()
                .with_context(|| format!("{} must be a number, got '{}'", ENV_SPLIT_TOLERANCE, tolerance))?;
        }

        config.validate()?;
        info!(
            "Configuration: data={} bind={} tolerance={}",
            config.data_directory.display(),
            config.bind_address,
            config.split_tolerance
        );
        Ok(config)
    }

    pub fn socket_addr(&self) -> Result<SocketAddr> {
        self.bind_address
            .parse()
            .with_context(|| format!("Invalid bind address '{}'", self.bind_address))
    }

    pub fn validate(&self) -> Result<()> {
        self.socket_addr()?;
        HeaderValue::from_str(&self.cors_origin)
            .with_context(|| format!("Invalid CORS origin '{}'", self.cors_origin))?;
        if !self.split_tolerance.is_finite() || self.split_tolerance < 0.0 {
            bail!("Split tolerance must be a non-negative number");
        }
        Ok(())
    }

    fn apply_file(&mut self, path: &Path) -> Result<()> {
        let yaml = fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        let file: ConfigFile = if yaml.trim().is_empty() {
            ConfigFile::default()
        } else {
            serde_yaml::from_str(&yaml).with_context(|| format!("Failed to parse {}", path.display()))?
        };

        if let Some(bind_address) = file.bind_address {
            self.bind_address = bind_address;
        }
        if let Some(cors_origin) = file.cors_origin {
            self.cors_origin = cors_origin;
        }
        if let Some(split_tolerance) = file.split_tolerance {
            self.split_tolerance = split_tolerance;
        }
        info!("Loaded configuration overrides from {}", path.display());
        Ok(())
    }

    fn default_data_directory<F>(lookup: &F) -> Result<PathBuf>
    where
        F: Fn(&str) -> Option<String>,
    {
        let home_dir = lookup("HOME")
            .or_else(|| lookup("USERPROFILE"))
            .ok_or_else(|| anyhow!("Could not determine home directory; set {}", ENV_DATA_DIR))?;
        Ok(PathBuf::from(home_dir).join("Documents").join("Fairshare"))
    }
}
