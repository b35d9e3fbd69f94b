//! CLI configuration file.
//!
//! Loaded from `--config PATH` or `$XDG_CONFIG_HOME/uyap/config.json`. A
//! missing default file means defaults; an explicit path must exist.

use std::path::{Path, PathBuf};

use anyhow::Context;
use serde::{Deserialize, Serialize};
use uyap::DriverConfig;

use crate::error::{CliError, Result};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CliConfig {
	pub driver: DriverConfig,
	/// SQLite database the `import` command writes to.
	pub database: PathBuf,
	/// Owner that imported case files belong to.
	pub owner_id: i64,
}

impl Default for CliConfig {
	fn default() -> Self {
		Self {
			driver: DriverConfig::default(),
			database: PathBuf::from("uyap.db"),
			owner_id: 1,
		}
	}
}

pub fn default_config_path() -> Option<PathBuf> {
	dirs::config_dir().map(|dir| dir.join("uyap").join("config.json"))
}

impl CliConfig {
	pub fn load(explicit: Option<&Path>) -> Result<Self> {
		match explicit {
			Some(path) => Self::read(path),
			None => match default_config_path() {
				Some(path) if path.exists() => Self::read(&path),
				_ => Ok(Self::default()),
			},
		}
	}

	fn read(path: &Path) -> Result<Self> {
		let parsed = std::fs::read_to_string(path)
			.context("read failed")
			.and_then(|text| serde_json::from_str(&text).context("invalid JSON"));

		match parsed {
			Ok(config) => {
				tracing::debug!(target = "uyap.config", path = %path.display(), "config loaded");
				Ok(config)
			}
			Err(source) => Err(CliError::Config {
				path: path.to_path_buf(),
				source,
			}),
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn partial_file_keeps_defaults() {
		let dir = tempfile::tempdir().unwrap();
		let path = dir.path().join("config.json");
		std::fs::write(&path, r#"{ "owner_id": 7, "driver": { "headless": true } }"#).unwrap();

		let config = CliConfig::load(Some(&path)).unwrap();
		assert_eq!(config.owner_id, 7);
		assert!(config.driver.headless);
		assert_eq!(config.database, PathBuf::from("uyap.db"));
		assert_eq!(config.driver.login_menu_threshold, 3);
	}

	#[test]
	fn explicit_missing_path_is_an_error() {
		let dir = tempfile::tempdir().unwrap();
		let err = CliConfig::load(Some(&dir.path().join("nope.json"))).unwrap_err();
		assert!(matches!(err, CliError::Config { .. }));
	}

	#[test]
	fn malformed_file_is_an_error() {
		let dir = tempfile::tempdir().unwrap();
		let path = dir.path().join("config.json");
		std::fs::write(&path, "{ owner_id: ").unwrap();
		assert!(CliConfig::load(Some(&path)).is_err());
	}
}
