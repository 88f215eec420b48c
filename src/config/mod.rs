mod file_config;

pub use file_config::FileConfig;

use anyhow::{bail, Result};
use std::path::PathBuf;

use crate::remote::DEFAULT_REMOTE_BASE_URL;

/// CLI arguments that can be used for config resolution.
/// This struct mirrors the CLI arguments that can be overridden by TOML config.
#[derive(Debug, Clone)]
pub struct CliConfig {
    pub mirror_db: Option<PathBuf>,
    pub remote_base_url: String,
    pub request_timeout_sec: u64,
    pub require_company: bool,
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            mirror_db: None,
            remote_base_url: DEFAULT_REMOTE_BASE_URL.to_string(),
            request_timeout_sec: 30,
            require_company: true,
        }
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub mirror_db: PathBuf,
    pub remote_base_url: String,
    pub request_timeout_sec: u64,
    pub require_company: bool,
}

impl AppConfig {
    /// Resolve configuration from CLI arguments and optional TOML file config.
    /// TOML values override CLI values where present.
    pub fn resolve(cli: &CliConfig, file_config: Option<FileConfig>) -> Result<Self> {
        let file = file_config.unwrap_or_default();

        let mirror_db = file
            .mirror_db
            .map(PathBuf::from)
            .or_else(|| cli.mirror_db.clone())
            .ok_or_else(|| {
                anyhow::anyhow!("mirror db path must be specified on the CLI or in a config file")
            })?;

        // The file itself is created on first open; its directory must exist
        if let Some(parent) = mirror_db.parent() {
            if !parent.as_os_str().is_empty() && !parent.is_dir() {
                bail!("Mirror database directory does not exist: {:?}", parent);
            }
        }

        let remote_base_url = file
            .remote_base_url
            .unwrap_or_else(|| cli.remote_base_url.clone());

        let request_timeout_sec = file.request_timeout_sec.unwrap_or(cli.request_timeout_sec);
        let require_company = file.require_company.unwrap_or(cli.require_company);

        Ok(Self {
            mirror_db,
            remote_base_url,
            request_timeout_sec,
            require_company,
        })
    }
}
