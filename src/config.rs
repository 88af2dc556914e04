//! Configuration management
//!
//! Config file is stored next to the executable as `config.toml`, unless a
//! path is given on the command line. Missing sections and fields fall back
//! to defaults.
//!
//! ```toml
//! [serial]
//! port = "/dev/ttyACM0"
//! baud_rate = 9600
//!
//! [protocol]
//! address_length = 1
//! address_factor = 200
//! log_enabled = false
//! ```

use crate::codec::AddressFormat;
use crate::command::builtin::ProtocolState;
use crate::constants::{
    DEFAULT_ADDRESS_FACTOR, DEFAULT_ADDRESS_LENGTH, DEFAULT_BAUD_RATE, DEFAULT_SERIAL_TIMEOUT_MS,
    MAX_LENGTH_BYTE, MIN_ADDRESS_FACTOR,
};
use crate::error::{ProtocolError, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::warn;

/// Config file name
pub const CONFIG_FILE_NAME: &str = "config.toml";

// =============================================================================
// Application Configuration
// =============================================================================

/// Application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub serial: SerialConfig,
    pub protocol: ProtocolConfig,
}

// =============================================================================
// Serial Configuration
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SerialConfig {
    /// Serial port name (empty = must be given on the command line)
    pub port: String,

    /// Baud rate
    pub baud_rate: u32,

    /// Read timeout in milliseconds
    pub timeout_ms: u64,
}

impl Default for SerialConfig {
    fn default() -> Self {
        Self {
            port: String::new(),
            baud_rate: DEFAULT_BAUD_RATE,
            timeout_ms: DEFAULT_SERIAL_TIMEOUT_MS,
        }
    }
}

impl SerialConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

// =============================================================================
// Protocol Configuration
// =============================================================================

/// Initial protocol parameters (the remote side may change them at runtime)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProtocolConfig {
    /// Number of address bytes per frame
    pub address_length: usize,

    /// Radix of each address byte
    pub address_factor: u8,

    /// Trace every byte and frame
    pub log_enabled: bool,
}

impl Default for ProtocolConfig {
    fn default() -> Self {
        Self {
            address_length: DEFAULT_ADDRESS_LENGTH,
            address_factor: DEFAULT_ADDRESS_FACTOR,
            log_enabled: false,
        }
    }
}

impl ProtocolConfig {
    /// Check that values describe a usable frame format
    pub fn validate(&self) -> Result<()> {
        if self.address_length == 0 || self.address_length > MAX_LENGTH_BYTE {
            return Err(ProtocolError::ConfigValidation {
                field: "address_length",
                reason: format!(
                    "{} is outside 1..={}",
                    self.address_length, MAX_LENGTH_BYTE
                ),
            });
        }
        if self.address_factor < MIN_ADDRESS_FACTOR {
            return Err(ProtocolError::ConfigValidation {
                field: "address_factor",
                reason: format!(
                    "{} is below the minimum of {}",
                    self.address_factor, MIN_ADDRESS_FACTOR
                ),
            });
        }
        Ok(())
    }

    /// Runtime state built from this config (out-of-range values clamped)
    pub fn to_state(&self) -> ProtocolState {
        ProtocolState {
            format: AddressFormat::new(self.address_length, self.address_factor),
            log_enabled: self.log_enabled,
        }
    }
}

// =============================================================================
// File handling
// =============================================================================

/// Default config file path: next to the executable, or the working
/// directory if the executable path is unknown
pub fn config_path() -> PathBuf {
    std::env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(|dir| dir.join(CONFIG_FILE_NAME)))
        .unwrap_or_else(|| PathBuf::from(CONFIG_FILE_NAME))
}

/// Load config from file, returning errors
pub fn load_strict(path: &Path) -> Result<Config> {
    let content = fs::read_to_string(path).map_err(|e| ProtocolError::ConfigRead {
        path: path.to_path_buf(),
        source: e,
    })?;
    parse(&content)
}

/// Parse config text
pub fn parse(content: &str) -> Result<Config> {
    let config: Config = toml::from_str(content).map_err(|e| ProtocolError::ConfigValidation {
        field: "config",
        reason: e.to_string(),
    })?;
    config.protocol.validate()?;
    Ok(config)
}

/// Load config from file, falling back to defaults on any problem
pub fn load(path: &Path) -> Config {
    if !path.exists() {
        return Config::default();
    }

    match load_strict(path) {
        Ok(config) => config,
        Err(e) => {
            warn!("{} ({:?}), using defaults", e, path);
            Config::default()
        }
    }
}

/// Save config to file
pub fn save(config: &Config, path: &Path) -> Result<()> {
    let content =
        toml::to_string_pretty(config).map_err(|e| ProtocolError::ConfigValidation {
            field: "config",
            reason: e.to_string(),
        })?;
    fs::write(path, content).map_err(|e| ProtocolError::ConfigRead {
        path: path.to_path_buf(),
        source: e,
    })
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_values() {
        let config = Config::default();

        assert_eq!(config.serial.port, "");
        assert_eq!(config.serial.baud_rate, DEFAULT_BAUD_RATE);
        assert_eq!(config.serial.timeout_ms, DEFAULT_SERIAL_TIMEOUT_MS);
        assert_eq!(config.protocol.address_length, 1);
        assert_eq!(config.protocol.address_factor, 200);
        assert!(!config.protocol.log_enabled);
    }

    #[test]
    fn test_config_empty_file() {
        let config = parse("").unwrap();
        assert_eq!(config.serial.baud_rate, DEFAULT_BAUD_RATE);
        assert_eq!(config.protocol.address_factor, DEFAULT_ADDRESS_FACTOR);
    }

    #[test]
    fn test_config_partial_section() {
        let partial = r#"
[protocol]
address_length = 2
"#;
        let config = parse(partial).unwrap();
        assert_eq!(config.protocol.address_length, 2);
        assert_eq!(config.protocol.address_factor, DEFAULT_ADDRESS_FACTOR);
        assert_eq!(config.serial.port, "");
    }

    #[test]
    fn test_config_roundtrip() {
        let config = Config {
            serial: SerialConfig {
                port: "COM3".to_string(),
                baud_rate: 115_200,
                timeout_ms: 20,
            },
            protocol: ProtocolConfig {
                address_length: 2,
                address_factor: 100,
                log_enabled: true,
            },
        };

        let text = toml::to_string_pretty(&config).unwrap();
        let restored = parse(&text).unwrap();

        assert_eq!(restored.serial.port, "COM3");
        assert_eq!(restored.serial.baud_rate, 115_200);
        assert_eq!(restored.serial.timeout(), Duration::from_millis(20));
        assert_eq!(restored.protocol.address_length, 2);
        assert_eq!(restored.protocol.address_factor, 100);
        assert!(restored.protocol.log_enabled);
    }

    #[test]
    fn test_validate_rejects_zero_length() {
        let config = ProtocolConfig {
            address_length: 0,
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ProtocolError::ConfigValidation {
                field: "address_length",
                ..
            })
        ));
    }

    #[test]
    fn test_validate_rejects_small_factor() {
        let err = parse("[protocol]\naddress_factor = 1\n").unwrap_err();
        assert!(matches!(
            err,
            ProtocolError::ConfigValidation {
                field: "address_factor",
                ..
            }
        ));
    }

    #[test]
    fn test_factor_out_of_byte_range_rejected() {
        assert!(parse("[protocol]\naddress_factor = 300\n").is_err());
    }

    #[test]
    fn test_to_state() {
        let config = ProtocolConfig {
            address_length: 3,
            address_factor: 50,
            log_enabled: true,
        };
        let state = config.to_state();
        assert_eq!(state.format, AddressFormat::new(3, 50));
        assert!(state.log_enabled);
    }

    #[test]
    fn test_load_missing_file_uses_defaults() {
        let config = load(Path::new("/nonexistent/serial-commands/config.toml"));
        assert_eq!(config.protocol.address_length, DEFAULT_ADDRESS_LENGTH);
    }

    #[test]
    fn test_save_and_load() {
        let path = std::env::temp_dir().join(format!(
            "serial-commands-test-{}.toml",
            std::process::id()
        ));
        let mut config = Config::default();
        config.serial.port = "/dev/ttyUSB0".to_string();

        save(&config, &path).unwrap();
        let loaded = load_strict(&path).unwrap();
        let _ = fs::remove_file(&path);

        assert_eq!(loaded.serial.port, "/dev/ttyUSB0");
    }
}
