//! Opening the byte source
//!
//! A connection identifier is either a serial device (`/dev/ttyACM0`,
//! `COM6`), `-` for standard input, or `file:<path>` for a recorded capture.

use std::fs::File;
use std::io::{self, BufReader};
use std::path::PathBuf;

use grayfb_core::config::LinkConfig;
use grayfb_hal::{ByteSource, ReaderSource};
use log::info;
use thiserror::Error;

/// Prefix selecting a capture file
pub const FILE_PREFIX: &str = "file:";

/// Source could not be opened
#[derive(Debug, Error)]
pub enum LinkError {
    /// Serial device could not be opened
    #[error("source unavailable: cannot open serial port {port}")]
    Serial {
        /// Device name as given
        port: String,
        /// Driver error
        #[source]
        source: serialport::Error,
    },
    /// Capture file could not be opened
    #[error("source unavailable: cannot open capture {}", path.display())]
    Capture {
        /// Path after the `file:` prefix
        path: PathBuf,
        /// Underlying I/O failure
        #[source]
        source: io::Error,
    },
}

/// Where frames come from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Endpoint {
    /// Serial device name
    Serial(String),
    /// Standard input (`-`)
    Stdin,
    /// Recorded capture replayed from disk
    Capture(PathBuf),
}

impl Endpoint {
    /// Interpret a connection identifier
    pub fn parse(identifier: &str) -> Self {
        if identifier == "-" {
            Endpoint::Stdin
        } else if let Some(path) = identifier.strip_prefix(FILE_PREFIX) {
            Endpoint::Capture(PathBuf::from(path))
        } else {
            Endpoint::Serial(identifier.to_string())
        }
    }
}

/// Open the configured byte source
pub fn open(config: &LinkConfig) -> Result<Box<dyn ByteSource>, LinkError> {
    match Endpoint::parse(&config.port) {
        Endpoint::Serial(port) => {
            let serial = serialport::new(&port, config.baud_rate)
                .timeout(config.read_timeout())
                .open()
                .map_err(|source| LinkError::Serial {
                    port: port.clone(),
                    source,
                })?;
            info!("Opened {} at {} baud", port, config.baud_rate);
            Ok(Box::new(ReaderSource::new(serial)))
        }
        Endpoint::Stdin => {
            info!("Reading frames from stdin");
            Ok(Box::new(ReaderSource::new(io::stdin())))
        }
        Endpoint::Capture(path) => {
            let file = File::open(&path).map_err(|source| LinkError::Capture {
                path: path.clone(),
                source,
            })?;
            info!("Replaying capture {}", path.display());
            Ok(Box::new(ReaderSource::new(BufReader::new(file))))
        }
    }
}
