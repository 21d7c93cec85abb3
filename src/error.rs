//! Unified error types for the climate reporter.
//!
//! Per-subsystem enums, plus an `Error` enum for the config and
//! hardware-open path.  All variants are `Copy`; the
//! detailed cause (OS error, broker reason code) is logged at the site
//! where it occurs.

use core::fmt;

// ---------------------------------------------------------------------------
// Top-level error
// ---------------------------------------------------------------------------

/// Error for configuration and sensor setup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// The sensor could not be opened or read.
    Sensor(SensorError),
    /// Configuration is invalid.  Names the offending field.
    Config(&'static str),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Sensor(e) => write!(f, "sensor: {e}"),
            Self::Config(msg) => write!(f, "config: {msg}"),
        }
    }
}

impl std::error::Error for Error {}

// ---------------------------------------------------------------------------
// Sensor errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SensorError {
    /// An expected edge on the data line never arrived.
    Timeout,
    /// The fifth frame byte did not match the sum of the first four.
    Checksum,
    /// The GPIO line could not be requested, driven or sampled.
    Gpio,
}

impl fmt::Display for SensorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Timeout => write!(f, "timed out waiting for sensor edge"),
            Self::Checksum => write!(f, "frame checksum mismatch"),
            Self::Gpio => write!(f, "GPIO line error"),
        }
    }
}

impl std::error::Error for SensorError {}

impl From<SensorError> for Error {
    fn from(e: SensorError) -> Self {
        Self::Sensor(e)
    }
}

// ---------------------------------------------------------------------------
// Communications errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommsError {
    /// Transport-level failure before the first CONNACK.
    ConnectFailed,
    /// The broker answered CONNACK with a non-success code.
    ConnectRefused,
    /// The connection driver thread could not be started.
    DriverSpawnFailed,
}

impl fmt::Display for CommsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ConnectFailed => write!(f, "MQTT connect failed"),
            Self::ConnectRefused => write!(f, "MQTT connect refused by broker"),
            Self::DriverSpawnFailed => write!(f, "MQTT connection driver failed to start"),
        }
    }
}

impl std::error::Error for CommsError {}

// ---------------------------------------------------------------------------
// Identity errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdentityError {
    /// The serial-number file could not be read.
    Unreadable,
    /// The serial number is not valid UTF-8.
    NotUtf8,
    /// Nothing left after stripping trailing NUL bytes.
    Empty,
    /// Longer than the identity buffer.
    TooLong,
    /// Starts with whitespace, which MQTT client ids may not.
    Malformed,
}

impl fmt::Display for IdentityError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unreadable => write!(f, "serial number unreadable"),
            Self::NotUtf8 => write!(f, "serial number is not UTF-8"),
            Self::Empty => write!(f, "serial number is empty"),
            Self::TooLong => write!(f, "serial number too long"),
            Self::Malformed => write!(f, "serial number starts with whitespace"),
        }
    }
}

impl std::error::Error for IdentityError {}

// ---------------------------------------------------------------------------
// Convenience Result alias
// ---------------------------------------------------------------------------

/// Crate-wide `Result` alias.
pub type Result<T> = core::result::Result<T, Error>;
