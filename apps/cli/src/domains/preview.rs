use std::path::Path;

use anyhow::Result;
use comfy_table::{presets::UTF8_BORDERS_ONLY, Table};
use gt_core::{preview::SampleRow, MatchReport};

use crate::context::Context;

pub fn run(ctx: &Context, csv: &Path, images: &Path) -> Result<()> {
	let report = gt_core::preview(csv, images)?;
	ctx.print(&report, print_report)
}

fn print_report(report: &MatchReport) {
	println!("CSV rows: {} ({})", report.csv_count, report.layout);
	println!("Photos:   {}", report.image_count);
	println!();

	let mut table = Table::new();
	table.load_preset(UTF8_BORDERS_ONLY);
	table.set_header(vec![
		"Line",
		"File",
		"Latitude",
		"Longitude",
		"Altitude",
		"Roll / Pitch / Yaw",
		"Time",
	]);

	for row in &report.sample {
		match row {
			SampleRow::Record { line, record } => {
				let position = record.position();
				table.add_row(vec![
					line.to_string(),
					record.filename().to_string(),
					position.latitude().to_string(),
					position.longitude().to_string(),
					position.altitude().to_string(),
					record.attitude().summary(),
					record.timestamp().unwrap_or("-").to_string(),
				]);
			}
			SampleRow::EmptyFilename { line } => {
				table.add_row(vec![line.to_string(), "(empty, skipped)".to_string()]);
			}
			SampleRow::Invalid { line, reason } => {
				table.add_row(vec![line.to_string(), format!("invalid: {reason}")]);
			}
		}
	}
	println!("{table}");
	println!();

	println!("Matched: {}", report.matched.len());
	print_names("In CSV, no photo", &report.csv_without_image);
	print_names("Photo, not in CSV", &report.images_without_csv);

	if report.perfect_match {
		println!("Every row has its photo and every photo its row.");
	}
}

fn print_names(title: &str, names: &[String]) {
	if names.is_empty() {
		return;
	}

	println!("{title} ({}):", names.len());
	for name in names {
		println!("  {name}");
	}
}
