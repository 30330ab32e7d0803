use std::path::PathBuf;

use anyhow::Result;
use chrono::Local;
use comfy_table::{presets::UTF8_BORDERS_ONLY, Table};
use gt_media_metadata::{camera::list_opt_files, CameraProfile};
use serde::Serialize;

use crate::context::Context;

#[derive(Debug)]
pub enum CameraCmd {
	Inspect { file: PathBuf },
	List { dir: Option<PathBuf> },
}

#[derive(Debug, Serialize)]
struct Inspection {
	profile: CameraProfile,
	focal_length_35mm: Option<u16>,
	/// `drone-dji:DewarpData` as it would be written today, when the profile allows it
	dewarp_data: Option<String>,
}

pub fn run(ctx: &Context, cmd: CameraCmd) -> Result<()> {
	match cmd {
		CameraCmd::Inspect { file } => {
			let profile = CameraProfile::from_path(&file)?;
			let inspection = Inspection {
				focal_length_35mm: profile.focal_length_35mm(),
				dewarp_data: profile
					.dewarp(Local::now().date_naive())
					.ok()
					.map(|dewarp| dewarp.to_string()),
				profile,
			};

			ctx.print(&inspection, print_inspection)
		}
		CameraCmd::List { dir } => {
			let dir = dir.unwrap_or_else(|| PathBuf::from("."));
			let files = list_opt_files(&dir)?;

			ctx.print(&files, |files| {
				if files.is_empty() {
					println!("No camera profiles in {}", dir.display());
				}
				for file in files {
					println!("{}", file.display());
				}
			})
		}
	}
}

fn print_inspection(inspection: &Inspection) {
	let profile = &inspection.profile;
	let optional = |value: Option<String>| value.unwrap_or_else(|| "-".to_string());

	let mut table = Table::new();
	table.load_preset(UTF8_BORDERS_ONLY);
	table.set_header(vec!["Field", "Value"]);

	table.add_row(vec!["Name".to_string(), profile.name.clone()]);
	table.add_row(vec![
		"Image size".to_string(),
		optional(
			profile
				.dimensions
				.map(|size| format!("{} x {}", size.width, size.height)),
		),
	]);
	table.add_row(vec![
		"Sensor width (mm)".to_string(),
		profile.sensor_size.to_string(),
	]);
	table.add_row(vec![
		"Focal length (mm)".to_string(),
		profile.focal_length.to_string(),
	]);
	table.add_row(vec![
		"35mm equivalent".to_string(),
		optional(inspection.focal_length_35mm.map(|focal| focal.to_string())),
	]);
	table.add_row(vec![
		"Principal point".to_string(),
		optional(
			profile
				.principal_point
				.map(|point| format!("{}, {}", point.x, point.y)),
		),
	]);
	table.add_row(vec![
		"Distortion".to_string(),
		optional(profile.distortion.map(|d| {
			format!(
				"k1={} k2={} k3={} p1={} p2={}{}",
				d.k1,
				d.k2,
				d.k3,
				d.p1,
				d.p2,
				if d.direct { " (direct)" } else { "" }
			)
		})),
	]);
	table.add_row(vec![
		"Lens".to_string(),
		optional(
			profile
				.lens
				.as_ref()
				.map(|lens| format!("{} {} {}", lens.make, lens.model, lens.lens_model)),
		),
	]);
	table.add_row(vec![
		"DewarpData".to_string(),
		optional(inspection.dewarp_data.clone()),
	]);

	println!("{table}");
}
