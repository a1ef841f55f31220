//! Configuration loading
//!
//! Reads an optional TOML file into [`ViewerConfig`], then applies command
//! line overrides. Keys missing from the file keep their defaults.
//!
//! ```toml
//! [raster]
//! width = 64
//! height = 64
//! sentinel = 38
//!
//! [display]
//! scale = 8
//! tick_hz = 24
//! title = "Framebuffer Viewer"
//!
//! [link]
//! port = "/dev/ttyACM0"
//! baud_rate = 921600
//! read_timeout_ms = 10
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use grayfb_core::config::ConfigError;
use grayfb_core::ViewerConfig;
use log::{debug, info};
use thiserror::Error;

/// Configuration loading errors
#[derive(Debug, Error)]
pub enum LoadError {
    /// File could not be read
    #[error("failed to read config file {path}")]
    Read {
        /// File that was asked for
        path: PathBuf,
        /// Underlying I/O failure
        #[source]
        source: std::io::Error,
    },
    /// File is not valid TOML for the viewer
    #[error("failed to parse config file {path}")]
    Parse {
        /// File that failed to parse
        path: PathBuf,
        /// TOML error with location
        #[source]
        source: toml::de::Error,
    },
    /// Values are out of range
    #[error("invalid configuration: {0}")]
    Invalid(ConfigError),
}

impl From<ConfigError> for LoadError {
    fn from(e: ConfigError) -> Self {
        LoadError::Invalid(e)
    }
}

/// Settings taken from the command line
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    /// Replaces `link.port`
    pub port: Option<String>,
    /// Replaces `link.baud_rate`
    pub baud_rate: Option<u32>,
    /// Replaces `display.scale`
    pub scale: Option<u32>,
    /// Replaces `display.tick_hz`
    pub tick_hz: Option<u32>,
}

impl Overrides {
    /// Apply every override that was given
    pub fn apply(&self, config: &mut ViewerConfig) -> Result<(), ConfigError> {
        if let Some(port) = &self.port {
            config.link.set_port(port)?;
        }
        if let Some(baud_rate) = self.baud_rate {
            config.link.baud_rate = baud_rate;
        }
        if let Some(scale) = self.scale {
            config.display.scale = scale;
        }
        if let Some(tick_hz) = self.tick_hz {
            config.display.tick_hz = tick_hz;
        }
        Ok(())
    }
}

/// Parse a configuration from TOML text
pub fn parse_config(text: &str) -> Result<ViewerConfig, toml::de::Error> {
    toml::from_str(text)
}

/// Load, override and validate the configuration
///
/// Without a path the built-in defaults are used.
pub fn load(path: Option<&Path>, overrides: &Overrides) -> Result<ViewerConfig, LoadError> {
    let mut config = match path {
        Some(path) => {
            let text = fs::read_to_string(path).map_err(|source| LoadError::Read {
                path: path.to_path_buf(),
                source,
            })?;
            let config = parse_config(&text).map_err(|source| LoadError::Parse {
                path: path.to_path_buf(),
                source,
            })?;
            info!("Loaded configuration from {}", path.display());
            config
        }
        None => {
            debug!("No config file given, using defaults");
            ViewerConfig::default()
        }
    };

    overrides.apply(&mut config)?;
    config.validate()?;
    log_config_summary(&config);
    Ok(config)
}

fn log_config_summary(config: &ViewerConfig) {
    info!(
        "Raster {}x{} sentinel 0x{:02x}, scale x{}, {} Hz",
        config.raster.width,
        config.raster.height,
        config.raster.sentinel,
        config.display.scale,
        config.display.tick_hz
    );
    debug!(
        "Link {} at {} baud, {} ms read timeout",
        config.link.port, config.link.baud_rate, config.link.read_timeout_ms
    );
}
