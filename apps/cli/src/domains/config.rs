use std::path::Path;

use anyhow::{bail, Result};
use gt_core::GeotagConfig;

/// Writes a default config, refusing to replace an existing one.
pub fn init(path: &Path) -> Result<()> {
	if path.exists() {
		bail!("{} already exists", path.display());
	}

	GeotagConfig::default().save(path)?;
	println!("Config written to {}", path.display());

	Ok(())
}
