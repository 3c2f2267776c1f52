//! Host hardware bridge.
//!
//! The microscopy host owns all device I/O; this crate only asks it two
//! read-only questions: which devices are loaded, and what is the string
//! value of a named device property. [`DeviceHost`] captures exactly that
//! surface so the real host core can be injected where available and an
//! in-memory [`MockHost`] can stand in for it in tests.
//!
//! The hub-specific readiness and identity queries built on top of the
//! trait live in [`hub`].

pub mod hub;
mod mock;

pub use hub::{hub_basis_id, hub_status, HubStatus, HUB_DEVICE, PROP_CS_BASIS_ID, PROP_CS_ENABLED};
pub use mock::MockHost;

use crate::error::AppResult;

/// Read-only view of the host's hardware core.
///
/// Implementations never mutate device state through this trait; it exists
/// purely so the basis-preparation path can check device presence and read
/// a small set of string properties.
pub trait DeviceHost {
    /// Names of all devices the host currently has loaded.
    fn loaded_devices(&self) -> Vec<String>;

    /// Reads a string property of a loaded device.
    ///
    /// Fails with [`crate::error::CsError::PropertyNotAvailable`] when the
    /// device or the property is absent.
    fn device_property(&self, device: &str, property: &str) -> AppResult<String>;
}
