//! Dry run: how a CSV and an image directory line up, without touching any photo.

use std::{collections::HashSet, path::Path};

use gt_media_metadata::GeoRecord;
use serde::Serialize;
use tracing::debug;

use crate::{
	csv::{CsvTable, Interpreted, Layout},
	photos::PhotoIndex,
	Result,
};

const SAMPLE_ROWS: usize = 5;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum SampleRow {
	Record { line: u64, record: GeoRecord },
	EmptyFilename { line: u64 },
	Invalid { line: u64, reason: String },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MatchReport {
	pub csv_count: usize,
	pub layout: Layout,
	pub sample: Vec<SampleRow>,
	pub image_count: usize,
	pub matched: Vec<String>,
	pub csv_without_image: Vec<String>,
	pub images_without_csv: Vec<String>,
	/// Every CSV row has its photo and every photo its row.
	pub perfect_match: bool,
}

/// Reads `csv`, indexes `images` and compares the two by file name, ignoring case.
pub fn preview(csv: impl AsRef<Path>, images: impl AsRef<Path>) -> Result<MatchReport> {
	let table = CsvTable::from_path(csv)?;
	let photos = PhotoIndex::build(images)?;

	let sample = table
		.rows()
		.iter()
		.take(SAMPLE_ROWS)
		.map(|row| match table.interpret(row) {
			Ok(Interpreted::Record(record)) => SampleRow::Record {
				line: row.line,
				record,
			},
			Ok(Interpreted::EmptyFilename) => SampleRow::EmptyFilename { line: row.line },
			Err(e) => SampleRow::Invalid {
				line: row.line,
				reason: e.to_string(),
			},
		})
		.collect();

	let mut matched = Vec::new();
	let mut csv_without_image = Vec::new();
	let mut matched_photos = HashSet::new();

	for name in table.filenames() {
		match photos.resolve(name) {
			Some(path) => {
				matched.push(name.to_string());
				matched_photos.insert(path);
			}
			None => csv_without_image.push(name.to_string()),
		}
	}

	let images_without_csv = photos
		.names()
		.into_iter()
		.filter(|name| {
			photos
				.resolve(name)
				.is_some_and(|path| !matched_photos.contains(path))
		})
		.map(ToString::to_string)
		.collect::<Vec<_>>();

	debug!(
		rows = table.len(),
		photos = photos.len(),
		matched = matched.len(),
		"Previewed batch"
	);

	let perfect_match = matched.len() == table.len() && matched.len() == photos.len();

	Ok(MatchReport {
		csv_count: table.len(),
		layout: *table.layout(),
		sample,
		image_count: photos.len(),
		matched,
		csv_without_image,
		images_without_csv,
		perfect_match,
	})
}

#[cfg(test)]
mod tests {
	use std::fs;

	use pretty_assertions::assert_eq;

	use super::*;

	#[test]
	fn reports_both_sides_of_a_mismatch() {
		let dir = tempfile::tempdir().unwrap();
		let images = dir.path().join("images");
		fs::create_dir(&images).unwrap();
		fs::write(images.join("A.JPG"), b"").unwrap();
		fs::write(images.join("c.jpg"), b"").unwrap();

		let csv = dir.path().join("points.csv");
		fs::write(&csv, "39,116,1,a.jpg\n40,117,2,b.jpg\n41,118,x,c.jpg\n").unwrap();

		let report = preview(&csv, &images).unwrap();

		assert_eq!(report.csv_count, 3);
		assert_eq!(report.image_count, 2);
		assert_eq!(report.matched, ["a.jpg", "c.jpg"]);
		assert_eq!(report.csv_without_image, ["b.jpg"]);
		assert!(report.images_without_csv.is_empty());
		assert!(!report.perfect_match);

		assert!(matches!(report.sample[0], SampleRow::Record { line: 1, .. }));
		assert!(matches!(report.sample[2], SampleRow::Invalid { line: 3, .. }));
	}

	#[test]
	fn unmatched_photos_are_listed() {
		let dir = tempfile::tempdir().unwrap();
		fs::write(dir.path().join("a.jpg"), b"").unwrap();
		fs::write(dir.path().join("extra.jpeg"), b"").unwrap();

		let csv = dir.path().join("points.csv");
		fs::write(&csv, "39,116,1,a.jpg\n").unwrap();

		let report = preview(&csv, dir.path()).unwrap();

		assert_eq!(report.matched, ["a.jpg"]);
		assert_eq!(report.images_without_csv, ["extra.jpeg"]);
	}
}
