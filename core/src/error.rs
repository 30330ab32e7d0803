use std::path::PathBuf;

use gt_utils::error::FileIOError;

/// Run level failures: the batch can't start (or can't go on) at all.
#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error(transparent)]
	FileIO(#[from] FileIOError),
	#[error("CSV file not found: {}", .0.display())]
	CsvNotFound(PathBuf),
	#[error("image directory not found: {}", .0.display())]
	ImageDirNotFound(PathBuf),
	#[error("failed to read CSV: {0}")]
	Csv(#[from] csv::Error),
	#[error("failed to scan photos: {0}")]
	Walk(#[from] walkdir::Error),
	#[error("invalid config file: {0}")]
	Config(#[from] serde_json::Error),
	#[error("unknown config version: {0}")]
	UnknownConfigVersion(u32),
	#[error(transparent)]
	MediaMetadata(#[from] gt_media_metadata::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

/// Failures that only affect one CSV row. The batch records them and moves on.
#[derive(Debug, thiserror::Error)]
pub enum RowError {
	#[error("unsupported column count {0}, only 4 or at least 8 columns are supported")]
	ColumnCount(usize),
	#[error("row has {found} columns but the header maps column {needed}")]
	MissingColumn { needed: usize, found: usize },
	#[error("invalid {field} value: '{value}'")]
	InvalidNumber { field: &'static str, value: String },
	#[error(transparent)]
	InvalidRecord(gt_media_metadata::Error),
	#[error("photo not found: {0}")]
	PhotoNotFound(String),
	#[error("failed to write metadata for {filename}: {source}")]
	Write {
		filename: String,
		#[source]
		source: gt_media_metadata::Error,
	},
}
