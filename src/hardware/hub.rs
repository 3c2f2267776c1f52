//! Arduino hub readiness and identity queries.
//!
//! The acquisition device shows up in the host as the `Arduino-Hub` device
//! with two string properties: `CSEnabled`, which reports whether the
//! firmware on the device supports compressed-sensing mode, and
//! `CSBasisId`, the identifier of the basis currently burned in.
//!
//! Lookup failures here are a "feature unavailable" signal, not a fault:
//! [`hub_status`] never errors, it degrades. Only the direct identity read
//! ([`hub_basis_id`]) propagates a missing property to the caller.

use std::fmt;

use tracing::debug;

use super::DeviceHost;
use crate::error::AppResult;

/// Device name the host loads the acquisition hub under.
pub const HUB_DEVICE: &str = "Arduino-Hub";

/// Hub property reporting compressed-sensing firmware support.
pub const PROP_CS_ENABLED: &str = "CSEnabled";

/// Hub property reporting the identifier of the basis on the device.
pub const PROP_CS_BASIS_ID: &str = "CSBasisId";

/// Readiness of the acquisition hub, as far as the host can tell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HubStatus {
    /// `Arduino-Hub` is not in the host's loaded-device set.
    NotLoaded,
    /// The hub is loaded but its firmware does not report CS support.
    CsDisabled,
    /// The hub is loaded and ready for compressed-sensing mode.
    Ready,
}

impl fmt::Display for HubStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            HubStatus::NotLoaded => "Arduino-Hub not loaded",
            HubStatus::CsDisabled => "loaded, compressed sensing disabled",
            HubStatus::Ready => "ready",
        };
        f.write_str(text)
    }
}

/// Checks whether the acquisition hub is present and CS-capable.
///
/// The `CSEnabled` value is compared case-sensitively against `"true"`;
/// anything else, including a missing property, degrades to
/// [`HubStatus::CsDisabled`].
pub fn hub_status(host: &dyn DeviceHost) -> HubStatus {
    let loaded = host
        .loaded_devices()
        .iter()
        .any(|name| name.as_str() == HUB_DEVICE);
    if !loaded {
        debug!(device = HUB_DEVICE, "hub device not loaded");
        return HubStatus::NotLoaded;
    }

    match host.device_property(HUB_DEVICE, PROP_CS_ENABLED) {
        Ok(value) if value == "true" => HubStatus::Ready,
        Ok(value) => {
            debug!(%value, "hub loaded but CSEnabled is not 'true'");
            HubStatus::CsDisabled
        }
        Err(err) => {
            debug!(%err, "hub loaded but CSEnabled is unreadable");
            HubStatus::CsDisabled
        }
    }
}

/// Reads the identifier of the basis currently on the device.
///
/// Unlike [`hub_status`] this propagates a missing device or property, so
/// callers that require the identity can distinguish "absent" from "empty".
pub fn hub_basis_id(host: &dyn DeviceHost) -> AppResult<String> {
    host.device_property(HUB_DEVICE, PROP_CS_BASIS_ID)
}
