use std::path::PathBuf;

use clap::Args;
use gt_core::{BatchJob, GeotagConfig};

#[derive(Args, Debug, Clone)]
pub struct ProcessArgs {
	/// CSV with one row per photo
	#[arg(long)]
	pub csv: PathBuf,

	/// Folder searched, recursively, for the photos
	#[arg(long)]
	pub images: PathBuf,

	/// Write renamed copies here instead of overwriting the photos
	#[arg(long)]
	pub output: Option<PathBuf>,

	/// Camera profile (.opt) for focal length and lens distortion
	#[arg(long)]
	pub opt: Option<PathBuf>,

	/// Don't embed the DJI XMP packet
	#[arg(long, default_value_t = false)]
	pub no_xmp: bool,
}

impl ProcessArgs {
	/// Command line values first, then the config's defaults.
	pub fn to_job(&self, config: &GeotagConfig) -> BatchJob {
		BatchJob::new(&self.csv, &self.images)
			.with_output_dir(self.output.clone().or_else(|| config.output_dir.clone()))
			.with_opt_file(self.opt.clone().or_else(|| config.opt_file.clone()))
			.with_xmp(config.xmp && !self.no_xmp)
	}
}

#[cfg(test)]
mod tests {
	use clap::Parser;
	use gt_core::OutputMode;

	use super::*;

	#[derive(Parser)]
	struct Wrapper {
		#[command(flatten)]
		args: ProcessArgs,
	}

	fn parse(args: &[&str]) -> ProcessArgs {
		Wrapper::parse_from(["geotag"].iter().chain(args)).args
	}

	#[test]
	fn config_fills_what_the_command_line_leaves_out() {
		let config = GeotagConfig {
			output_dir: Some(PathBuf::from("tagged")),
			opt_file: Some(PathBuf::from("m3e.opt")),
			..GeotagConfig::default()
		};

		let job = parse(&["--csv", "points.csv", "--images", "photos"]).to_job(&config);
		assert_eq!(job.output, OutputMode::Directory(PathBuf::from("tagged")));
		assert_eq!(job.opt_file, Some(PathBuf::from("m3e.opt")));
		assert!(job.xmp);

		let job = parse(&[
			"--csv",
			"points.csv",
			"--images",
			"photos",
			"--output",
			"elsewhere",
			"--no-xmp",
		])
		.to_job(&config);
		assert_eq!(job.output, OutputMode::Directory(PathBuf::from("elsewhere")));
		assert!(!job.xmp);
	}
}
