//! Basis-preparation session.
//!
//! A `Session` is the standalone replacement for the host-driven plugin
//! lifecycle: where the host would construct the plugin, hand it the core
//! object, and later ask it to show itself, a session is simply loaded from
//! [`Settings`] and then asked for what it knows. It owns the loaded
//! matrix and its identifier for its whole lifetime; the matrix is
//! immutable once loaded.
//!
//! Operations:
//!
//! - [`Session::load`] — validate settings, parse the basis file, compute
//!   the identifier, and report the shape.
//! - [`Session::render_firmware`] / [`Session::export_firmware`] — produce
//!   the Arduino sketch (the export is the only disk write in the crate).
//! - [`Session::hub_report`] — readiness of the acquisition hub through an
//!   injected [`DeviceHost`], degraded-mode (never errors).

use std::fs;
use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::{info, warn};

use crate::basis::{BasisId, BasisMatrix};
use crate::config::Settings;
use crate::error::AppResult;
use crate::firmware::render_sketch;
use crate::hardware::{hub_basis_id, hub_status, DeviceHost, HubStatus};

/// A loaded basis plus everything derived from it.
#[derive(Debug)]
pub struct Session {
    settings: Settings,
    basis: BasisMatrix,
    id: BasisId,
}

/// Shape and identity of the loaded basis, for display or JSON output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BasisSummary {
    /// Path the basis was loaded from.
    pub path: PathBuf,
    /// Number of matrix rows.
    pub rows: usize,
    /// Number of matrix columns.
    pub cols: usize,
    /// Decimal identifier of the matrix contents.
    pub basis_id: String,
}

/// Outcome of querying the acquisition hub about its state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HubReport {
    /// Hub readiness as reported by the host.
    pub status: HubStatus,
    /// Basis identifier the device reports, when the hub is ready and the
    /// property is readable.
    pub device_basis_id: Option<String>,
    /// Whether the device identifier equals the loaded matrix's.
    pub matches_loaded_basis: bool,
}

impl Session {
    /// Loads the basis named by the settings and derives its identifier.
    ///
    /// Loader errors abort the session; there is no degraded mode for a
    /// missing or malformed basis file.
    pub fn load(settings: Settings) -> AppResult<Self> {
        settings.validate()?;
        let delimiter = settings.basis.delimiter_byte()?;
        let basis = BasisMatrix::from_path(&settings.basis.path, delimiter)?;
        let id = basis.id();
        info!(
            rows = basis.rows(),
            cols = basis.cols(),
            basis_id = %id,
            path = %settings.basis.path.display(),
            "loaded measurement basis"
        );
        Ok(Self {
            settings,
            basis,
            id,
        })
    }

    /// The loaded matrix.
    pub fn basis(&self) -> &BasisMatrix {
        &self.basis
    }

    /// Identifier of the loaded matrix.
    pub fn basis_id(&self) -> BasisId {
        self.id
    }

    /// Shape and identity of the loaded basis.
    pub fn summary(&self) -> BasisSummary {
        BasisSummary {
            path: self.settings.basis.path.clone(),
            rows: self.basis.rows(),
            cols: self.basis.cols(),
            basis_id: self.id.to_string(),
        }
    }

    /// Renders the Arduino sketch for the loaded basis.
    pub fn render_firmware(&self) -> AppResult<String> {
        render_sketch(&self.basis, self.id)
    }

    /// Renders the sketch and writes it to `path`, or to the configured
    /// `firmware.output` when `path` is `None`. Returns the path written.
    pub fn export_firmware(&self, path: Option<&Path>) -> AppResult<PathBuf> {
        let target = path.unwrap_or(&self.settings.firmware.output);
        let sketch = self.render_firmware()?;
        fs::write(target, &sketch)?;
        info!(path = %target.display(), bytes = sketch.len(), "wrote firmware sketch");
        Ok(target.to_path_buf())
    }

    /// Queries the hub and compares its basis identifier with ours.
    ///
    /// Host-bridge misses degrade into the report instead of erroring; the
    /// identifier is only read once the hub reports ready, and an
    /// unreadable identifier on a ready hub is logged and treated as a
    /// mismatch.
    pub fn hub_report(&self, host: &dyn DeviceHost) -> HubReport {
        let status = hub_status(host);
        let device_basis_id = if status == HubStatus::Ready {
            match hub_basis_id(host) {
                Ok(id) => Some(id),
                Err(err) => {
                    warn!(%err, "hub is ready but its basis id is unreadable");
                    None
                }
            }
        } else {
            None
        };
        let matches_loaded_basis =
            device_basis_id.as_deref() == Some(self.id.to_string().as_str());
        HubReport {
            status,
            device_basis_id,
            matches_loaded_basis,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hardware::{MockHost, HUB_DEVICE, PROP_CS_BASIS_ID, PROP_CS_ENABLED};
    use std::io::Write;
    use tempfile::TempDir;

    fn session_from(contents: &str) -> (TempDir, Session) {
        let dir = TempDir::new().unwrap();
        let basis_path = dir.path().join("basis.csv");
        let mut file = std::fs::File::create(&basis_path).unwrap();
        file.write_all(contents.as_bytes()).unwrap();

        let mut settings = Settings::default();
        settings.basis.path = basis_path;
        settings.firmware.output = dir.path().join("basis.ino");
        let session = Session::load(settings).unwrap();
        (dir, session)
    }

    #[test]
    fn test_load_and_summary() {
        let (_dir, session) = session_from("1,2\n3,4\n");
        let summary = session.summary();
        assert_eq!((summary.rows, summary.cols), (2, 2));
        assert_eq!(summary.basis_id, session.basis_id().to_string());
    }

    #[test]
    fn test_load_rejects_unset_path() {
        let err = Session::load(Settings::default());
        assert!(matches!(
            err,
            Err(crate::error::CsError::Configuration(_))
        ));
    }

    #[test]
    fn test_export_writes_rendered_sketch() {
        let (dir, session) = session_from("1,2\n3,4\n");
        let written = session.export_firmware(None).unwrap();
        assert_eq!(written, dir.path().join("basis.ino"));
        let on_disk = std::fs::read_to_string(&written).unwrap();
        assert_eq!(on_disk, session.render_firmware().unwrap());
    }

    #[test]
    fn test_hub_report_matching_device() {
        let (_dir, session) = session_from("1,2\n3,4\n");
        let host = MockHost::new()
            .with_property(HUB_DEVICE, PROP_CS_ENABLED, "true")
            .with_property(
                HUB_DEVICE,
                PROP_CS_BASIS_ID,
                &session.basis_id().to_string(),
            );
        let report = session.hub_report(&host);
        assert_eq!(report.status, HubStatus::Ready);
        assert!(report.matches_loaded_basis);
    }

    #[test]
    fn test_hub_report_stale_device_basis() {
        let (_dir, session) = session_from("1,2\n3,4\n");
        let host = MockHost::new()
            .with_property(HUB_DEVICE, PROP_CS_ENABLED, "true")
            .with_property(HUB_DEVICE, PROP_CS_BASIS_ID, "0");
        let report = session.hub_report(&host);
        assert_eq!(report.status, HubStatus::Ready);
        assert_eq!(report.device_basis_id.as_deref(), Some("0"));
        assert!(!report.matches_loaded_basis);
    }

    #[test]
    fn test_hub_report_hub_absent() {
        let (_dir, session) = session_from("1\n");
        let report = session.hub_report(&MockHost::new());
        assert_eq!(report.status, HubStatus::NotLoaded);
        assert_eq!(report.device_basis_id, None);
        assert!(!report.matches_loaded_basis);
    }
}
