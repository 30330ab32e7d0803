//! Reading the input CSV and deciding how its rows are laid out.

use std::{fmt::Display, fs, path::Path};

use csv::{ReaderBuilder, Trim};
use gt_utils::error::FileIOError;
use serde::Serialize;
use tracing::debug;

use crate::{Error, Result, RowError};

pub mod detect;
mod record;
mod sample;

pub use detect::{detect_header, ColumnMapping, Role};
pub use record::{
	interpret_mapped, interpret_positional, Interpreted, FULL_LAYOUT_WIDTH, SHORT_LAYOUT_WIDTH,
};
pub use sample::create_sample_csv;

pub(crate) const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// How data rows are interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Layout {
	/// 4 or 8+ columns, told apart by their count.
	Positional { header_skipped: bool },
	Mapped(ColumnMapping),
}

impl Display for Layout {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		match self {
			Self::Positional {
				header_skipped: false,
			} => f.write_str("positional, no header"),
			Self::Positional {
				header_skipped: true,
			} => f.write_str("positional, unrecognised header skipped"),
			Self::Mapped(_) => f.write_str("mapped from header"),
		}
	}
}

/// One data row, with the 1-based line it was read from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CsvRow {
	pub line: u64,
	pub cells: Vec<String>,
}

/// A whole input CSV, header split off and layout resolved.
#[derive(Debug, Clone)]
pub struct CsvTable {
	header: Option<Vec<String>>,
	layout: Layout,
	rows: Vec<CsvRow>,
}

impl CsvTable {
	pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
		let path = path.as_ref();
		if !path.is_file() {
			return Err(Error::CsvNotFound(path.to_path_buf()));
		}

		let bytes =
			fs::read(path).map_err(|e| FileIOError::from((path, e, "Failed to read CSV file")))?;

		let table = Self::from_bytes(&bytes)?;
		debug!(
			path = %path.display(),
			rows = table.rows.len(),
			layout = %table.layout,
			"Read CSV"
		);

		Ok(table)
	}

	/// Parses UTF-8 CSV content. A leading byte order mark is ignored, and so are rows whose
	/// cells are all blank.
	pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
		let bytes = bytes.strip_prefix(UTF8_BOM).unwrap_or(bytes);

		let mut reader = ReaderBuilder::new()
			.has_headers(false)
			.flexible(true)
			.trim(Trim::All)
			.from_reader(bytes);

		let mut rows = Vec::new();
		for (index, record) in reader.records().enumerate() {
			let record = record?;
			if record.iter().all(str::is_empty) {
				continue;
			}

			rows.push(CsvRow {
				line: record
					.position()
					.map_or_else(|| u64::try_from(index + 1).unwrap_or(u64::MAX), csv::Position::line),
				cells: record.iter().map(ToString::to_string).collect(),
			});
		}

		let header = rows
			.first()
			.filter(|first| detect_header(&first.cells))
			.map(|first| first.cells.clone());

		let layout = match &header {
			Some(header) => {
				rows.remove(0);
				ColumnMapping::detect(header).map_or(
					Layout::Positional {
						header_skipped: true,
					},
					Layout::Mapped,
				)
			}
			None => Layout::Positional {
				header_skipped: false,
			},
		};

		Ok(Self {
			header,
			layout,
			rows,
		})
	}

	#[must_use]
	pub fn header(&self) -> Option<&[String]> {
		self.header.as_deref()
	}

	#[must_use]
	pub const fn layout(&self) -> &Layout {
		&self.layout
	}

	#[must_use]
	pub fn rows(&self) -> &[CsvRow] {
		&self.rows
	}

	#[must_use]
	pub fn len(&self) -> usize {
		self.rows.len()
	}

	#[must_use]
	pub fn is_empty(&self) -> bool {
		self.rows.is_empty()
	}

	/// The widest row, header included.
	#[must_use]
	pub fn width(&self) -> usize {
		self.rows
			.iter()
			.map(|row| row.cells.len())
			.chain(self.header.as_ref().map(Vec::len))
			.max()
			.unwrap_or(0)
	}

	pub fn interpret(&self, row: &CsvRow) -> std::result::Result<Interpreted, RowError> {
		match &self.layout {
			Layout::Positional { .. } => interpret_positional(&row.cells),
			Layout::Mapped(mapping) => interpret_mapped(&row.cells, mapping),
		}
	}

	/// The raw filename cell of `row`, without interpreting anything else.
	#[must_use]
	pub fn filename_of<'row>(&self, row: &'row CsvRow) -> Option<&'row str> {
		let index = match &self.layout {
			Layout::Positional { .. } => match row.cells.len() {
				SHORT_LAYOUT_WIDTH => 3,
				width if width >= FULL_LAYOUT_WIDTH => 0,
				_ => return None,
			},
			Layout::Mapped(mapping) => mapping.filename,
		};

		row.cells
			.get(index)
			.map(|cell| cell.trim())
			.filter(|cell| !cell.is_empty())
	}

	/// Every non-blank filename, in row order.
	#[must_use]
	pub fn filenames(&self) -> Vec<&str> {
		self.rows
			.iter()
			.filter_map(|row| self.filename_of(row))
			.collect()
	}
}
