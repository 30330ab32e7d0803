use std::path::Path;

use anyhow::Result;

pub fn run(path: &Path) -> Result<()> {
	gt_core::csv::create_sample_csv(path)?;
	println!("Sample CSV written to {}", path.display());

	Ok(())
}
