//! Emulator settings file.
//!
//! JSON with the same strictness as the device settings file on real
//! hardware: a present file must carry every key, a missing key is a hard
//! error rather than a silent default.

use serde::Deserialize;
use std::fmt;
use std::path::Path;

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Settings {
    /// Display name for the emulated device.
    pub device_name: String,
    /// Seed for the guid source. Real hardware seeds from a boot counter
    /// or RNG peripheral; the emulator takes it from configuration so runs
    /// are reproducible.
    pub guid_seed: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            device_name: "hub-emu".to_string(),
            guid_seed: 0,
        }
    }
}

#[derive(Debug)]
pub enum SettingsError {
    Io(std::io::Error),
    Parse(serde_json::Error),
}

impl fmt::Display for SettingsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SettingsError::Io(err) => write!(f, "failed to read settings file: {err}"),
            SettingsError::Parse(err) => write!(f, "invalid settings file: {err}"),
        }
    }
}

impl std::error::Error for SettingsError {}

impl Settings {
    pub fn load(path: &Path) -> Result<Self, SettingsError> {
        let contents = std::fs::read_to_string(path).map_err(SettingsError::Io)?;
        serde_json::from_str(&contents).map_err(SettingsError::Parse)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn loads_complete_settings() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"device_name":"bench","guid_seed":7}}"#).unwrap();

        let settings = Settings::load(file.path()).unwrap();
        assert_eq!(settings.device_name, "bench");
        assert_eq!(settings.guid_seed, 7);
    }

    #[test]
    fn missing_key_is_a_hard_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"device_name":"bench"}}"#).unwrap();

        assert!(matches!(
            Settings::load(file.path()),
            Err(SettingsError::Parse(_))
        ));
    }

    #[test]
    fn missing_file_is_an_io_error() {
        assert!(matches!(
            Settings::load(Path::new("/nonexistent/hub-settings.json")),
            Err(SettingsError::Io(_))
        ));
    }
}
