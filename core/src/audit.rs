//! The generated CSV that maps every processed row to its output file name.

use std::{
	fs::File,
	io::Write,
	path::{Path, PathBuf},
};

use csv::WriterBuilder;
use gt_utils::error::FileIOError;
use tracing::info;

use crate::{csv::UTF8_BOM, Result};

const NEW_NAME_COLUMN: &str = "new_name";

/// Original cells plus the new name, one entry per row that reached the writer.
#[derive(Debug, Default, Clone)]
pub struct AuditLog {
	rows: Vec<Vec<String>>,
	width: usize,
}

impl AuditLog {
	#[must_use]
	pub fn new() -> Self {
		Self::default()
	}

	pub fn push(&mut self, cells: &[String], new_name: impl Into<String>) {
		self.width = self.width.max(cells.len());

		let mut row = Vec::with_capacity(cells.len() + 1);
		row.extend_from_slice(cells);
		row.push(new_name.into());
		self.rows.push(row);
	}

	#[must_use]
	pub fn len(&self) -> usize {
		self.rows.len()
	}

	#[must_use]
	pub fn is_empty(&self) -> bool {
		self.rows.is_empty()
	}

	/// `column1..columnN,new_name`, N being the widest row.
	#[must_use]
	pub fn header(&self) -> Vec<String> {
		(1..=self.width)
			.map(|i| format!("column{i}"))
			.chain([NEW_NAME_COLUMN.to_string()])
			.collect()
	}

	/// Writes the log as UTF-8 with a byte order mark, so spreadsheet tools pick the right
	/// encoding.
	pub fn write(&self, path: impl AsRef<Path>) -> Result<PathBuf> {
		let path = path.as_ref();

		let mut file = File::create(path)
			.map_err(|e| FileIOError::from((path, e, "Failed to create audit CSV")))?;
		file.write_all(UTF8_BOM)
			.map_err(|e| FileIOError::from((path, e, "Failed to write audit CSV")))?;

		let mut writer = WriterBuilder::new().flexible(true).from_writer(file);
		writer.write_record(self.header())?;
		for row in &self.rows {
			writer.write_record(row)?;
		}
		writer
			.flush()
			.map_err(|e| FileIOError::from((path, e, "Failed to write audit CSV")))?;

		info!(path = %path.display(), rows = self.rows.len(), "Wrote audit CSV");

		Ok(path.to_path_buf())
	}
}

#[cfg(test)]
mod tests {
	use std::fs;

	use pretty_assertions::assert_eq;

	use super::*;

	fn cells(values: &[&str]) -> Vec<String> {
		values.iter().map(ToString::to_string).collect()
	}

	#[test]
	fn header_covers_the_widest_row() {
		let mut log = AuditLog::new();
		log.push(&cells(&["39", "116", "1", "a.jpg"]), "24081810300501.jpg");
		log.push(
			&cells(&["b.jpg", "", "116", "39", "1", "0", "0", "0"]),
			"24081810300502.jpg",
		);

		assert_eq!(log.len(), 2);
		assert_eq!(log.header().len(), 9);
		assert_eq!(log.header()[8], "new_name");
	}

	#[test]
	fn written_with_bom() {
		let dir = tempfile::tempdir().unwrap();
		let mut log = AuditLog::new();
		log.push(&cells(&["39", "116", "1", "a.jpg"]), "a.jpg");

		let path = log.write(dir.path().join("240818103005.csv")).unwrap();
		let content = fs::read_to_string(path).unwrap();

		assert_eq!(
			content,
			"\u{feff}column1,column2,column3,column4,new_name\n39,116,1,a.jpg,a.jpg\n"
		);
	}
}
