//! Configuration type definitions
//!
//! Every field has a default matching the reference device (64x64 raster,
//! `&` sentinel, 8x upscale at 24 Hz, 921600 baud with a 10 ms read
//! timeout), so a configuration file only needs the keys it changes.

use core::fmt;
use core::time::Duration;

use grayfb_protocol::{FrameGeometry, GeometryError, DEFAULT_HEIGHT, DEFAULT_WIDTH, FRAME_SYNC};
use heapless::String;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Maximum window title length
pub const MAX_TITLE_LEN: usize = 64;

/// Maximum connection identifier length
pub const MAX_PORT_LEN: usize = 128;

/// Longest accepted read timeout
///
/// The stop signal is only observed between reads, so this bounds how long
/// closing the window can take on a silent link.
pub const MAX_READ_TIMEOUT_MS: u64 = 1000;

/// Largest accepted upscale factor
pub const MAX_SCALE: u32 = 16;

/// Default window title
pub const DEFAULT_TITLE: &str = "Framebuffer Viewer";

/// Default connection identifier
pub const DEFAULT_PORT: &str = "/dev/ttyACM0";

/// Default serial baud rate
pub const DEFAULT_BAUD_RATE: u32 = 921_600;

/// Default read timeout in milliseconds
pub const DEFAULT_READ_TIMEOUT_MS: u64 = 10;

/// Default presentation rate in Hz
pub const DEFAULT_TICK_HZ: u32 = 24;

/// Default upscale factor
pub const DEFAULT_SCALE: u32 = 8;

/// Configuration validation errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    /// Raster dimensions cannot be packed 4 samples per byte
    Geometry(GeometryError),
    /// Upscale factor is zero or larger than [`MAX_SCALE`]
    ScaleOutOfRange,
    /// Tick rate is zero
    ZeroTickRate,
    /// Read timeout is zero or longer than [`MAX_READ_TIMEOUT_MS`]
    ReadTimeoutOutOfRange,
    /// Baud rate is zero
    ZeroBaudRate,
    /// Connection identifier is empty
    EmptyPort,
    /// A string field exceeds its maximum length
    TooLong,
}

impl From<GeometryError> for ConfigError {
    fn from(e: GeometryError) -> Self {
        ConfigError::Geometry(e)
    }
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Geometry(e) => write!(f, "invalid raster geometry: {}", e),
            ConfigError::ScaleOutOfRange => {
                write!(f, "display.scale must be between 1 and {}", MAX_SCALE)
            }
            ConfigError::ZeroTickRate => f.write_str("display.tick_hz must be at least 1"),
            ConfigError::ReadTimeoutOutOfRange => write!(
                f,
                "link.read_timeout_ms must be between 1 and {}",
                MAX_READ_TIMEOUT_MS
            ),
            ConfigError::ZeroBaudRate => f.write_str("link.baud_rate must be non-zero"),
            ConfigError::EmptyPort => f.write_str("link.port must not be empty"),
            ConfigError::TooLong => f.write_str("string value too long"),
        }
    }
}

/// Raster layout on the wire
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct RasterConfig {
    /// Raster width in pixels
    pub width: u16,
    /// Raster height in pixels
    pub height: u16,
    /// Frame sentinel byte
    pub sentinel: u8,
}

impl Default for RasterConfig {
    fn default() -> Self {
        Self {
            width: DEFAULT_WIDTH,
            height: DEFAULT_HEIGHT,
            sentinel: FRAME_SYNC,
        }
    }
}

impl RasterConfig {
    /// Validated frame geometry
    pub fn geometry(&self) -> Result<FrameGeometry, ConfigError> {
        Ok(FrameGeometry::new(self.width, self.height)?)
    }
}

/// Presentation settings
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct DisplayConfig {
    /// Integer upscale factor
    pub scale: u32,
    /// Presentation rate (frames per second)
    pub tick_hz: u32,
    /// Window title
    pub title: String<MAX_TITLE_LEN>,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        let mut title = String::new();
        let _ = title.push_str(DEFAULT_TITLE);
        Self {
            scale: DEFAULT_SCALE,
            tick_hz: DEFAULT_TICK_HZ,
            title,
        }
    }
}

impl DisplayConfig {
    /// Time between presented frames
    pub fn tick_period(&self) -> Result<Duration, ConfigError> {
        grayfb_hal::time::period_from_hz(self.tick_hz).ok_or(ConfigError::ZeroTickRate)
    }
}

/// Serial link settings
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct LinkConfig {
    /// Connection identifier: serial device, `-` for stdin, or `file:<path>`
    pub port: String<MAX_PORT_LEN>,
    /// Baud rate in bits per second
    pub baud_rate: u32,
    /// Per-read timeout in milliseconds
    pub read_timeout_ms: u64,
}

impl Default for LinkConfig {
    fn default() -> Self {
        let mut port = String::new();
        let _ = port.push_str(DEFAULT_PORT);
        Self {
            port,
            baud_rate: DEFAULT_BAUD_RATE,
            read_timeout_ms: DEFAULT_READ_TIMEOUT_MS,
        }
    }
}

impl LinkConfig {
    /// Per-read timeout
    pub fn read_timeout(&self) -> Duration {
        Duration::from_millis(self.read_timeout_ms)
    }

    /// Replace the connection identifier
    pub fn set_port(&mut self, port: &str) -> Result<(), ConfigError> {
        let mut value = String::new();
        value.push_str(port).map_err(|_| ConfigError::TooLong)?;
        self.port = value;
        Ok(())
    }
}

/// Complete viewer configuration
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ViewerConfig {
    /// Wire layout
    pub raster: RasterConfig,
    /// Presentation
    pub display: DisplayConfig,
    /// Serial link
    pub link: LinkConfig,
}

impl ViewerConfig {
    /// Check every setting, returning the first problem found
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.raster.geometry()?;
        if self.display.scale == 0 || self.display.scale > MAX_SCALE {
            return Err(ConfigError::ScaleOutOfRange);
        }
        self.display.tick_period()?;
        if self.link.port.is_empty() {
            return Err(ConfigError::EmptyPort);
        }
        if self.link.baud_rate == 0 {
            return Err(ConfigError::ZeroBaudRate);
        }
        if self.link.read_timeout_ms == 0 || self.link.read_timeout_ms > MAX_READ_TIMEOUT_MS {
            return Err(ConfigError::ReadTimeoutOutOfRange);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_reference_device() {
        let config = ViewerConfig::default();
        assert_eq!(config.raster.width, 64);
        assert_eq!(config.raster.height, 64);
        assert_eq!(config.raster.sentinel, b'&');
        assert_eq!(config.display.scale, 8);
        assert_eq!(config.display.tick_hz, 24);
        assert_eq!(config.display.title.as_str(), "Framebuffer Viewer");
        assert_eq!(config.link.baud_rate, 921_600);
        assert_eq!(config.link.read_timeout(), Duration::from_millis(10));
        assert_eq!(config.validate(), Ok(()));
        assert_eq!(config.raster.geometry().unwrap().payload_len(), 1024);
    }

    #[test]
    fn test_invalid_geometry() {
        let mut config = ViewerConfig::default();
        config.raster.width = 3;
        config.raster.height = 3;
        assert_eq!(
            config.validate(),
            Err(ConfigError::Geometry(GeometryError::UnalignedPixelCount))
        );
    }

    #[test]
    fn test_zero_values_rejected() {
        let mut config = ViewerConfig::default();
        config.display.tick_hz = 0;
        assert_eq!(config.validate(), Err(ConfigError::ZeroTickRate));

        let mut config = ViewerConfig::default();
        config.link.baud_rate = 0;
        assert_eq!(config.validate(), Err(ConfigError::ZeroBaudRate));
    }

    #[test]
    fn test_scale_bounds() {
        let mut config = ViewerConfig::default();
        config.display.scale = 0;
        assert_eq!(config.validate(), Err(ConfigError::ScaleOutOfRange));
        config.display.scale = u32::MAX;
        assert_eq!(config.validate(), Err(ConfigError::ScaleOutOfRange));
        config.display.scale = MAX_SCALE + 1;
        assert_eq!(config.validate(), Err(ConfigError::ScaleOutOfRange));
        config.display.scale = MAX_SCALE;
        assert_eq!(config.validate(), Ok(()));
    }

    #[test]
    fn test_read_timeout_bounds() {
        let mut config = ViewerConfig::default();
        config.link.read_timeout_ms = 0;
        assert_eq!(config.validate(), Err(ConfigError::ReadTimeoutOutOfRange));
        config.link.read_timeout_ms = MAX_READ_TIMEOUT_MS + 1;
        assert_eq!(config.validate(), Err(ConfigError::ReadTimeoutOutOfRange));
        config.link.read_timeout_ms = MAX_READ_TIMEOUT_MS;
        assert_eq!(config.validate(), Ok(()));
    }

    #[test]
    fn test_set_port() {
        let mut link = LinkConfig::default();
        link.set_port("COM6").unwrap();
        assert_eq!(link.port.as_str(), "COM6");

        let long = "x".repeat(MAX_PORT_LEN + 1);
        assert_eq!(link.set_port(&long), Err(ConfigError::TooLong));
        assert_eq!(link.port.as_str(), "COM6");

        link.set_port("").unwrap();
        let config = ViewerConfig {
            link,
            ..ViewerConfig::default()
        };
        assert_eq!(config.validate(), Err(ConfigError::EmptyPort));
    }

    #[test]
    fn test_tick_period() {
        let display = DisplayConfig {
            tick_hz: 50,
            ..DisplayConfig::default()
        };
        assert_eq!(display.tick_period(), Ok(Duration::from_millis(20)));
    }
}
