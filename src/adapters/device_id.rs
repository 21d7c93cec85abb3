//! Device identity derived from the board serial number.
//!
//! The device tree exposes the SoC serial as a NUL-terminated string at
//! `/proc/device-tree/serial-number`.  The resulting thing id is:
//! - Read once at startup, never re-resolved
//! - Used as the MQTT client id
//! - Reported as `thing_id` in every published payload

use std::path::Path;

use log::warn;

use crate::error::IdentityError;

/// Fixed-size thing id.  Board serials are 16 hex chars in practice.
pub type ThingId = heapless::String<64>;

/// Read and normalise the serial number at `path`.
pub fn read_serial(path: &Path) -> Result<ThingId, IdentityError> {
    let raw = std::fs::read(path).map_err(|e| {
        warn!("cannot read serial number from {}: {}", path.display(), e);
        IdentityError::Unreadable
    })?;
    from_raw(&raw)
}

/// Strip trailing NUL bytes and validate.
pub fn from_raw(raw: &[u8]) -> Result<ThingId, IdentityError> {
    let end = raw.iter().rposition(|&b| b != 0).map_or(0, |i| i + 1);
    let text = core::str::from_utf8(&raw[..end]).map_err(|_| IdentityError::NotUtf8)?;
    parse(text)
}

/// Validate an explicit thing id (e.g. from the command line).
pub fn parse(text: &str) -> Result<ThingId, IdentityError> {
    if text.is_empty() {
        return Err(IdentityError::Empty);
    }
    if text.starts_with(char::is_whitespace) {
        return Err(IdentityError::Malformed);
    }
    let mut id = ThingId::new();
    id.push_str(text).map_err(|_| IdentityError::TooLong)?;
    Ok(id)
}
