use std::path::PathBuf;

use gt_core::GeotagConfig;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
	Human,
	Json,
}

#[derive(Debug, Clone)]
pub struct Context {
	pub config: GeotagConfig,
	pub config_path: PathBuf,
	pub format: OutputFormat,
}

impl Context {
	pub const fn new(config: GeotagConfig, config_path: PathBuf, format: OutputFormat) -> Self {
		Self {
			config,
			config_path,
			format,
		}
	}

	/// Prints `output` as pretty JSON, or hands it to `human` for the terminal.
	pub fn print<T: Serialize>(&self, output: &T, human: impl FnOnce(&T)) -> anyhow::Result<()> {
		match self.format {
			OutputFormat::Human => human(output),
			OutputFormat::Json => println!("{}", serde_json::to_string_pretty(output)?),
		}

		Ok(())
	}
}
