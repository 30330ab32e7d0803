use std::{
	fs::{self, File},
	io::Write,
	path::Path,
};

use csv::Writer;
use gt_utils::error::FileIOError;
use tracing::info;

use crate::Result;

use super::UTF8_BOM;

const SAMPLE_HEADER: [&str; 8] = [
	"文件名", "纬度", "经度", "高度", "Roll", "Pitch", "Yaw", "时间",
];

const SAMPLE_ROWS: [[&str; 8]; 2] = [
	[
		"IMG_001.jpg",
		"39.9042135",
		"116.4074582",
		"100.25",
		"15.2",
		"8.7",
		"45.0",
		"2024-08-18 10:30:00",
	],
	[
		"IMG_002.jpg",
		"39.9050248",
		"116.4080693",
		"102.3",
		"12.8",
		"6.3",
		"90.5",
		"2024-08-18 10:31:00",
	],
];

/// Writes a small example input, header included, that the reader maps column by column.
pub fn create_sample_csv(path: impl AsRef<Path>) -> Result<()> {
	let path = path.as_ref();

	if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
		fs::create_dir_all(parent)
			.map_err(|e| FileIOError::from((parent, e, "Failed to create sample directory")))?;
	}

	let mut file =
		File::create(path).map_err(|e| FileIOError::from((path, e, "Failed to create sample")))?;
	file.write_all(UTF8_BOM)
		.map_err(|e| FileIOError::from((path, e, "Failed to write sample")))?;

	let mut writer = Writer::from_writer(file);
	writer.write_record(SAMPLE_HEADER)?;
	for row in SAMPLE_ROWS {
		writer.write_record(row)?;
	}
	writer
		.flush()
		.map_err(|e| FileIOError::from((path, e, "Failed to write sample")))?;

	info!(path = %path.display(), "Created sample CSV");

	Ok(())
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::csv::{CsvTable, Interpreted, Layout};

	#[test]
	fn sample_is_readable() {
		let dir = tempfile::tempdir().unwrap();
		let path = dir.path().join("samples").join("sample.csv");

		create_sample_csv(&path).unwrap();

		let bytes = fs::read(&path).unwrap();
		assert!(bytes.starts_with(UTF8_BOM));

		let table = CsvTable::from_path(&path).unwrap();
		assert!(matches!(table.layout(), Layout::Mapped(_)));
		assert_eq!(table.filenames(), ["IMG_001.jpg", "IMG_002.jpg"]);

		for row in table.rows() {
			assert!(matches!(
				table.interpret(row).unwrap(),
				Interpreted::Record(_)
			));
		}
	}
}
