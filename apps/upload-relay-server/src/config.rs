//! Configuration management for Upload Relay Server

use std::env;
use std::path::PathBuf;

use crate::upload::{UploadLimits, HEADER_SLACK, MAX_UPLOAD_SIZE};

/// Error raised when an environment variable holds an unusable value
#[derive(Debug, thiserror::Error)]
#[error("Invalid value for {var}: {value:?}")]
pub struct ConfigError {
    pub var: &'static str,
    pub value: String,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub upload: UploadConfig,
    pub assets: StaticConfig,
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone)]
pub struct UploadConfig {
    pub max_upload_bytes: u64,
    pub header_slack_bytes: u64,
}

#[derive(Debug, Clone)]
pub struct StaticConfig {
    pub dir: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            server: ServerConfig {
                host: "0.0.0.0".to_string(),
                port: 8080,
            },
            upload: UploadConfig {
                max_upload_bytes: MAX_UPLOAD_SIZE,
                header_slack_bytes: HEADER_SLACK,
            },
            assets: StaticConfig {
                dir: PathBuf::from("./public"),
            },
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = Config::default();

        Ok(Config {
            server: ServerConfig {
                host: env::var("SERVER_HOST").unwrap_or(defaults.server.host),
                port: parse_var("SERVER_PORT", defaults.server.port)?,
            },
            upload: UploadConfig {
                max_upload_bytes: parse_var("UPLOAD_MAX_BYTES", defaults.upload.max_upload_bytes)?,
                header_slack_bytes: parse_var(
                    "UPLOAD_HEADER_SLACK",
                    defaults.upload.header_slack_bytes,
                )?,
            },
            assets: StaticConfig {
                dir: env::var("STATIC_DIR")
                    .map(PathBuf::from)
                    .unwrap_or(defaults.assets.dir),
            },
        })
    }

    /// Limits handed to every upload
    pub fn upload_limits(&self) -> UploadLimits {
        UploadLimits {
            max_bytes: self.upload.max_upload_bytes,
            header_slack: self.upload.header_slack_bytes,
        }
    }
}

fn parse_var<T: std::str::FromStr>(var: &'static str, default: T) -> Result<T, ConfigError> {
    match env::var(var) {
        Ok(value) => value.trim().parse().map_err(|_| ConfigError { var, value }),
        Err(_) => Ok(default),
    }
}
