//! Application configuration.
//!
//! Settings are layered the usual way: built-in defaults, then an optional
//! TOML file, then `COMPSENS_`-prefixed environment variables (with `__`
//! separating nested keys, e.g. `COMPSENS_BASIS__PATH`). The only key a
//! basis-preparation run strictly needs is `basis.path`.
//!
//! Parsing and layering go through the `config` crate; semantic checks that
//! parse fine but are logically wrong (empty basis path, multi-byte
//! delimiter) are caught by [`Settings::validate`].

use std::fs;
use std::path::{Path, PathBuf};

use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};

use crate::error::{AppResult, CsError};

/// Commented template written by `compsens init-config`.
const DEFAULT_CONFIG: &str = r#"# compsens configuration

[basis]
# Path to the measurement-basis file: one matrix row per line, fields
# separated by `delimiter`. Values must be pre-scaled to the device range.
path = ""
# Field delimiter, a single byte.
delimiter = ","

[firmware]
# Where `compsens generate` writes the rendered Arduino sketch.
output = "basis.ino"
"#;

/// Top-level application settings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Basis file location and format.
    pub basis: BasisSettings,
    /// Firmware generation options.
    pub firmware: FirmwareSettings,
}

/// Where the basis file lives and how its rows are delimited.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BasisSettings {
    /// Path to the delimited basis file.
    pub path: PathBuf,
    /// Field delimiter; must be a single byte.
    pub delimiter: String,
}

impl Default for BasisSettings {
    fn default() -> Self {
        Self {
            path: PathBuf::new(),
            delimiter: ",".to_string(),
        }
    }
}

/// Output options for the generated sketch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FirmwareSettings {
    /// Default path for the rendered sketch.
    pub output: PathBuf,
}

impl Default for FirmwareSettings {
    fn default() -> Self {
        Self {
            output: PathBuf::from("basis.ino"),
        }
    }
}

impl Settings {
    /// Loads settings from defaults, an optional TOML file, and the
    /// environment, in that order of precedence.
    pub fn new(config_path: Option<&Path>) -> AppResult<Self> {
        let mut builder = Config::builder();
        if let Some(path) = config_path {
            builder = builder.add_source(File::from(path));
        }
        let settings: Settings = builder
            .add_source(Environment::with_prefix("COMPSENS").separator("__"))
            .build()?
            .try_deserialize()?;
        Ok(settings)
    }

    /// Semantic validation, run after parsing.
    pub fn validate(&self) -> AppResult<()> {
        if self.basis.path.as_os_str().is_empty() {
            return Err(CsError::Configuration(
                "basis.path is not set; point it at the measurement-basis file".to_string(),
            ));
        }
        self.basis.delimiter_byte()?;
        Ok(())
    }

    /// Writes the commented default configuration template to `path`.
    ///
    /// Refuses to overwrite an existing file unless `force` is set.
    pub fn write_default(path: &Path, force: bool) -> AppResult<()> {
        if path.exists() && !force {
            return Err(CsError::Configuration(format!(
                "refusing to overwrite existing configuration at {} (use --force)",
                path.display()
            )));
        }
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        fs::write(path, DEFAULT_CONFIG)?;
        Ok(())
    }
}

impl BasisSettings {
    /// The delimiter as a single byte.
    ///
    /// Fails with a validation error when the configured delimiter is empty
    /// or longer than one byte.
    pub fn delimiter_byte(&self) -> AppResult<u8> {
        match self.delimiter.as_bytes() {
            [byte] => Ok(*byte),
            _ => Err(CsError::Configuration(format!(
                "basis.delimiter must be a single byte, got '{}'",
                self.delimiter
            ))),
        }
    }
}

/// Default location of the user-level configuration file.
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("compsens").join("compsens.toml"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_defaults() {
        let settings = Settings::default();
        assert_eq!(settings.basis.delimiter, ",");
        assert_eq!(settings.firmware.output, PathBuf::from("basis.ino"));
        assert_eq!(settings.basis.delimiter_byte().unwrap(), b',');
    }

    #[test]
    fn test_default_template_matches_defaults() {
        let parsed: Settings = toml::from_str(DEFAULT_CONFIG).unwrap();
        assert_eq!(parsed, Settings::default());
    }

    #[test]
    fn test_validate_requires_basis_path() {
        let settings = Settings::default();
        assert!(matches!(
            settings.validate(),
            Err(CsError::Configuration(_))
        ));
    }

    #[test]
    fn test_validate_rejects_long_delimiter() {
        let mut settings = Settings::default();
        settings.basis.path = PathBuf::from("basis.csv");
        settings.basis.delimiter = ", ".to_string();
        assert!(matches!(
            settings.validate(),
            Err(CsError::Configuration(_))
        ));
    }

    #[test]
    #[serial]
    fn test_file_overrides_defaults() {
        let mut file = NamedTempFile::with_suffix(".toml").unwrap();
        writeln!(
            file,
            "[basis]\npath = \"matrix.csv\"\ndelimiter = \";\"\n"
        )
        .unwrap();
        file.flush().unwrap();

        let settings = Settings::new(Some(file.path())).unwrap();
        assert_eq!(settings.basis.path, PathBuf::from("matrix.csv"));
        assert_eq!(settings.basis.delimiter_byte().unwrap(), b';');
        // Untouched sections keep their defaults.
        assert_eq!(settings.firmware.output, PathBuf::from("basis.ino"));
    }

    #[test]
    #[serial]
    fn test_environment_overrides_file() {
        let mut file = NamedTempFile::with_suffix(".toml").unwrap();
        writeln!(file, "[basis]\npath = \"from_file.csv\"\n").unwrap();
        file.flush().unwrap();

        std::env::set_var("COMPSENS_BASIS__PATH", "from_env.csv");
        let settings = Settings::new(Some(file.path()));
        std::env::remove_var("COMPSENS_BASIS__PATH");

        assert_eq!(
            settings.unwrap().basis.path,
            PathBuf::from("from_env.csv")
        );
    }

    #[test]
    fn test_write_default_refuses_overwrite() {
        let file = NamedTempFile::new().unwrap();
        let err = Settings::write_default(file.path(), false);
        assert!(matches!(err, Err(CsError::Configuration(_))));
        // With force it succeeds and the result parses back to defaults.
        Settings::write_default(file.path(), true).unwrap();
        let written = std::fs::read_to_string(file.path()).unwrap();
        let parsed: Settings = toml::from_str(&written).unwrap();
        assert_eq!(parsed, Settings::default());
    }
}
