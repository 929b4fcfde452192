//! TOML-based configuration for the agent.
//!
//! Every field has a default, so the agent runs with no file at all.  A file
//! given with `--config` only needs the keys it wants to change:
//!
//! ```toml
//! device_path = "/dev/uinput"
//! settle_delay_ms = 50
//! serialize_actions = false
//!
//! [identity]
//! name = "Virtual Input Device"
//! bus_type = 3        # BUS_USB
//! vendor = 0x1234
//! product = 0x5678
//! version = 1
//! ```
//!
//! CLI flags and their environment variables are applied on top of the file
//! in `main.rs`.
//!
//! # Serde default values
//!
//! Fields annotated with `#[serde(default = "some_fn")]` use the return value
//! of `some_fn()` when the key is absent from the file.  The `[identity]`
//! table falls back field-by-field to `DeviceIdentity::default()`.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use vinput_core::protocol::uinput::DeviceIdentity;

/// Error type for configuration file operations.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The file could not be read.
    #[error("I/O error accessing config at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The TOML content could not be parsed.
    #[error("failed to parse config TOML: {0}")]
    Parse(#[from] toml::de::Error),

    /// The config could not be serialized to TOML.
    #[error("failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),
}

// ── Config schema ─────────────────────────────────────────────────────────────

/// Effective agent configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AgentConfig {
    /// Path of the uinput node.
    #[serde(default = "default_device_path")]
    pub device_path: PathBuf,
    /// Pause between the hold and release frames of `pressAndRelease`.
    #[serde(default = "default_settle_delay_ms")]
    pub settle_delay_ms: u64,
    /// Hold a process-wide lock for the duration of each action.
    #[serde(default)]
    pub serialize_actions: bool,
    /// Identity written with `UI_DEV_SETUP`.
    #[serde(default)]
    pub identity: DeviceIdentity,
}

fn default_device_path() -> PathBuf {
    PathBuf::from("/dev/uinput")
}
fn default_settle_delay_ms() -> u64 {
    50
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            device_path: default_device_path(),
            settle_delay_ms: default_settle_delay_ms(),
            serialize_actions: false,
            identity: DeviceIdentity::default(),
        }
    }
}

impl AgentConfig {
    pub fn settle_delay(&self) -> Duration {
        Duration::from_millis(self.settle_delay_ms)
    }

    /// Pretty TOML form, as printed by `--print-config`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Serialize`] if serialization fails.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }
}

// ── Loading ───────────────────────────────────────────────────────────────────

/// Parses a config from TOML text.
///
/// # Errors
///
/// Returns [`ConfigError::Parse`] if the TOML is malformed or a value has the
/// wrong type.
pub fn parse_config(content: &str) -> Result<AgentConfig, ConfigError> {
    Ok(toml::from_str(content)?)
}

/// Loads a config file.  Unlike the defaults-only path, a named file must exist.
///
/// # Errors
///
/// Returns [`ConfigError::Io`] if the file cannot be read and
/// [`ConfigError::Parse`] if it is malformed.
pub fn load_from_path(path: &Path) -> Result<AgentConfig, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse_config(&content)
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_config_values() {
        // Arrange / Act
        let cfg = AgentConfig::default();

        // Assert
        assert_eq!(cfg.device_path, PathBuf::from("/dev/uinput"));
        assert_eq!(cfg.settle_delay(), Duration::from_millis(50));
        assert!(!cfg.serialize_actions);
        assert_eq!(cfg.identity.vendor, 0x1234);
        assert_eq!(cfg.identity.product, 0x5678);
        assert_eq!(cfg.identity.name, "Virtual Input Device");
    }

    #[test]
    fn test_empty_toml_yields_defaults() {
        let cfg = parse_config("").unwrap();
        assert_eq!(cfg, AgentConfig::default());
    }

    #[test]
    fn test_partial_identity_keeps_other_defaults() {
        // Arrange
        let toml_str = r#"
            settle_delay_ms = 120

            [identity]
            name = "Kiosk Keyboard"
        "#;

        // Act
        let cfg = parse_config(toml_str).unwrap();

        // Assert
        assert_eq!(cfg.settle_delay_ms, 120);
        assert_eq!(cfg.identity.name, "Kiosk Keyboard");
        assert_eq!(cfg.identity.vendor, 0x1234);
        assert_eq!(cfg.identity.bus_type, 0x03);
        assert_eq!(cfg.device_path, PathBuf::from("/dev/uinput"));
    }

    #[test]
    fn test_wrong_type_is_parse_error() {
        let err = parse_config("settle_delay_ms = \"soon\"").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_config_serializes_and_parses_round_trip() {
        // Arrange
        let mut cfg = AgentConfig::default();
        cfg.serialize_actions = true;
        cfg.identity.product = 0x0042;

        // Act
        let restored = parse_config(&cfg.to_toml().unwrap()).unwrap();

        // Assert
        assert_eq!(cfg, restored);
    }

    #[test]
    fn test_load_from_path_reads_file() {
        // Arrange
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "device_path = \"/tmp/fake-uinput\"").unwrap();
        writeln!(file, "serialize_actions = true").unwrap();

        // Act
        let cfg = load_from_path(file.path()).unwrap();

        // Assert
        assert_eq!(cfg.device_path, PathBuf::from("/tmp/fake-uinput"));
        assert!(cfg.serialize_actions);
    }

    #[test]
    fn test_load_from_missing_path_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("absent.toml");

        let err = load_from_path(&missing).unwrap_err();

        match err {
            ConfigError::Io { path, .. } => assert_eq!(path, missing),
            other => panic!("unexpected error: {other}"),
        }
    }
}
