//! In-memory host for testing without a running microscopy application.
//!
//! `MockHost` holds a device → property → value map and answers the two
//! [`DeviceHost`] queries from it. Builder-style setup keeps fixtures
//! short:
//!
//! ```rust
//! use compsens::hardware::{hub_status, HubStatus, MockHost};
//!
//! let host = MockHost::new().with_property("Arduino-Hub", "CSEnabled", "true");
//! assert_eq!(hub_status(&host), HubStatus::Ready);
//! ```

use std::collections::BTreeMap;

use super::DeviceHost;
use crate::error::{AppResult, CsError};

/// In-memory [`DeviceHost`] implementation.
#[derive(Debug, Default, Clone)]
pub struct MockHost {
    devices: BTreeMap<String, BTreeMap<String, String>>,
}

impl MockHost {
    /// Creates a host with no loaded devices.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a device with no properties.
    pub fn with_device(mut self, name: &str) -> Self {
        self.devices.entry(name.to_string()).or_default();
        self
    }

    /// Adds a device property, creating the device if needed.
    pub fn with_property(mut self, device: &str, property: &str, value: &str) -> Self {
        self.devices
            .entry(device.to_string())
            .or_default()
            .insert(property.to_string(), value.to_string());
        self
    }
}

impl DeviceHost for MockHost {
    fn loaded_devices(&self) -> Vec<String> {
        self.devices.keys().cloned().collect()
    }

    fn device_property(&self, device: &str, property: &str) -> AppResult<String> {
        self.devices
            .get(device)
            .and_then(|props| props.get(property))
            .cloned()
            .ok_or_else(|| CsError::PropertyNotAvailable {
                device: device.to_string(),
                property: property.to_string(),
            })
    }
}
