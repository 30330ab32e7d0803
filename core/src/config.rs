//! Persistent settings for the command line program.

use std::{
	fs,
	path::{Path, PathBuf},
};

use gt_utils::error::FileIOError;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::{tasks::Task, Error, Result};

/// Versioned configuration that knows how to bring itself up to date.
pub trait Migrate {
	fn current_version(&self) -> u32;

	fn target_version() -> u32;

	fn migrate(&mut self) -> Result<()>;
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeotagConfig {
	/// Config schema version
	pub version: u32,

	/// Default log filter, used when `RUST_LOG` isn't set
	pub log_level: String,

	/// Also log to this file, without colours
	#[serde(default)]
	pub log_file: Option<PathBuf>,

	/// Camera profile used when none is given on the command line
	#[serde(default)]
	pub opt_file: Option<PathBuf>,

	/// Default destination directory, photos are tagged in place without one
	#[serde(default)]
	pub output_dir: Option<PathBuf>,

	/// Whether to embed the DJI XMP packet
	#[serde(default = "default_xmp")]
	pub xmp: bool,

	#[serde(default)]
	pub tasks: Vec<Task>,
}

const fn default_xmp() -> bool {
	true
}

impl Default for GeotagConfig {
	fn default() -> Self {
		Self {
			version: Self::target_version(),
			log_level: "info".to_string(),
			log_file: None,
			opt_file: None,
			output_dir: None,
			xmp: default_xmp(),
			tasks: Vec::new(),
		}
	}
}

impl GeotagConfig {
	/// Reads the config at `path`, migrating and re-saving it when it is outdated.
	pub fn load(path: impl AsRef<Path>) -> Result<Self> {
		let path = path.as_ref();

		let json = fs::read_to_string(path)
			.map_err(|e| FileIOError::from((path, e, "Failed to read config file")))?;
		let mut config = serde_json::from_str::<Self>(&json)?;

		if config.current_version() != Self::target_version() {
			info!(
				from = config.current_version(),
				to = Self::target_version(),
				"Migrating config"
			);
			config.migrate()?;
			config.save(path)?;
		}

		Ok(config)
	}

	/// Like [`GeotagConfig::load`], but a missing file is created with the defaults.
	pub fn load_or_default(path: impl AsRef<Path>) -> Result<Self> {
		let path = path.as_ref();

		if path.exists() {
			info!(path = %path.display(), "Loading config");
			return Self::load(path);
		}

		warn!(path = %path.display(), "No config found, creating default");
		let config = Self::default();
		config.save(path)?;

		Ok(config)
	}

	pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
		let path = path.as_ref();

		if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
			fs::create_dir_all(parent)
				.map_err(|e| FileIOError::from((parent, e, "Failed to create config directory")))?;
		}

		let json = serde_json::to_string_pretty(self)?;
		fs::write(path, json).map_err(|e| FileIOError::from((path, e, "Failed to write config")))?;

		info!(path = %path.display(), "Saved config");

		Ok(())
	}
}

impl Migrate for GeotagConfig {
	fn current_version(&self) -> u32 {
		self.version
	}

	fn target_version() -> u32 {
		1
	}

	fn migrate(&mut self) -> Result<()> {
		match self.version {
			1 => Ok(()),
			v => Err(Error::UnknownConfigVersion(v)),
		}
	}
}
