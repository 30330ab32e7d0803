//! The batch driver: CSV rows in, tagged photos and a summary out.

use std::{
	fs,
	path::{Path, PathBuf},
	sync::{
		atomic::{AtomicBool, Ordering},
		Arc,
	},
};

use gt_media_metadata::{CameraProfile, DjiXmp, GeoRecord, MetadataWriter};
use gt_utils::error::FileIOError;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::{
	audit::AuditLog,
	csv::{CsvRow, CsvTable, Interpreted},
	naming::OutputNamer,
	photos::PhotoIndex,
	Error, Result, RowError,
};

/// Where tagged photos go.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutputMode {
	/// Overwrite the source photos.
	InPlace,
	/// Write renamed copies into this directory, created if missing.
	Directory(PathBuf),
}

/// Everything a run needs to know.
#[derive(Debug, Clone)]
pub struct BatchJob {
	pub csv: PathBuf,
	pub images: PathBuf,
	pub output: OutputMode,
	pub opt_file: Option<PathBuf>,
	pub xmp: bool,
}

impl BatchJob {
	#[must_use]
	pub fn new(csv: impl Into<PathBuf>, images: impl Into<PathBuf>) -> Self {
		Self {
			csv: csv.into(),
			images: images.into(),
			output: OutputMode::InPlace,
			opt_file: None,
			xmp: false,
		}
	}

	/// `None` keeps the photos in place.
	#[must_use]
	pub fn with_output_dir(mut self, output_dir: Option<PathBuf>) -> Self {
		self.output = output_dir.map_or(OutputMode::InPlace, OutputMode::Directory);
		self
	}

	#[must_use]
	pub fn with_opt_file(mut self, opt_file: Option<PathBuf>) -> Self {
		self.opt_file = opt_file;
		self
	}

	#[must_use]
	pub const fn with_xmp(mut self, xmp: bool) -> Self {
		self.xmp = xmp;
		self
	}

	/// Audit CSVs land in the output directory, or next to the input CSV for in place runs.
	fn audit_dir(&self) -> &Path {
		match &self.output {
			OutputMode::Directory(dir) => dir,
			OutputMode::InPlace => self.csv.parent().unwrap_or_else(|| Path::new(".")),
		}
	}
}

/// Cooperative cancellation, checked between rows.
#[derive(Debug, Clone, Default)]
pub struct StopFlag(Arc<AtomicBool>);

impl StopFlag {
	#[must_use]
	pub fn new() -> Self {
		Self::default()
	}

	pub fn stop(&self) {
		self.0.store(true, Ordering::Relaxed);
	}

	#[must_use]
	pub fn is_stopped(&self) -> bool {
		self.0.load(Ordering::Relaxed)
	}
}

/// The summary of a run.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProcessingResult {
	pub success_count: usize,
	pub failed_count: usize,
	pub skipped_count: usize,
	pub errors: Vec<String>,
	pub warnings: Vec<String>,
	pub stopped: bool,
	pub audit_csv: Option<PathBuf>,
}

impl ProcessingResult {
	#[must_use]
	pub const fn processed(&self) -> usize {
		self.success_count + self.failed_count + self.skipped_count
	}

	fn warn(&mut self, message: String, on_event: &mut impl FnMut(&BatchEvent)) {
		warn!("{message}");
		on_event(&BatchEvent::Warning {
			message: message.clone(),
		});
		self.warnings.push(message);
	}
}

/// Per row progress, for whoever is presenting the run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BatchEvent {
	Started {
		total: usize,
	},
	Tagged {
		line: u64,
		filename: String,
		output: PathBuf,
	},
	Failed {
		line: u64,
		reason: String,
	},
	Skipped {
		line: u64,
		reason: String,
	},
	Warning {
		message: String,
	},
	Stopped {
		remaining: usize,
	},
}

#[derive(Debug, Clone, Default)]
pub struct BatchDriver {
	stop: StopFlag,
}

impl BatchDriver {
	#[must_use]
	pub const fn new(stop: StopFlag) -> Self {
		Self { stop }
	}

	#[must_use]
	pub const fn stop_flag(&self) -> &StopFlag {
		&self.stop
	}

	/// Runs `job` to completion, or until the stop flag is raised.
	///
	/// Only run level problems are errors: a missing CSV or image directory, an unreadable CSV
	/// or an output directory that can't be created. Anything that goes wrong with a single
	/// row is counted in the returned [`ProcessingResult`] and the run goes on.
	pub fn run(
		&self,
		job: &BatchJob,
		mut on_event: impl FnMut(&BatchEvent),
	) -> Result<ProcessingResult> {
		if !job.csv.is_file() {
			return Err(Error::CsvNotFound(job.csv.clone()));
		}
		if !job.images.is_dir() {
			return Err(Error::ImageDirNotFound(job.images.clone()));
		}

		let table = CsvTable::from_path(&job.csv)?;
		let photos = PhotoIndex::build(&job.images)?;

		if let OutputMode::Directory(dir) = &job.output {
			fs::create_dir_all(dir)
				.map_err(|e| FileIOError::from((dir, e, "Failed to create output directory")))?;
		}

		let mut result = ProcessingResult::default();

		let camera = match &job.opt_file {
			Some(opt) => CameraProfile::from_path(opt)
				.map_err(|e| {
					result.warn(format!("camera profile ignored, {e}"), &mut on_event);
				})
				.ok(),
			None => None,
		};

		let writer = MetadataWriter::new()
			.with_camera(camera)
			.with_xmp(job.xmp.then(DjiXmp::new));

		info!(
			csv = %job.csv.display(),
			images = %job.images.display(),
			rows = table.len(),
			photos = photos.len(),
			layout = %table.layout(),
			"Starting batch"
		);

		let mut run = Run {
			table: &table,
			photos: &photos,
			writer: &writer,
			output: &job.output,
			namer: OutputNamer::now(),
			audit: AuditLog::new(),
			result,
		};

		on_event(&BatchEvent::Started { total: table.len() });

		for (index, row) in table.rows().iter().enumerate() {
			if self.stop.is_stopped() {
				let remaining = table.len() - index;
				info!(remaining, "Batch stopped");
				run.result.stopped = true;
				on_event(&BatchEvent::Stopped { remaining });
				break;
			}

			run.process(row, &mut on_event);
		}

		let Run {
			namer,
			audit,
			mut result,
			..
		} = run;

		if !audit.is_empty() {
			let path = namer.free_audit_path(job.audit_dir());
			match audit.write(&path) {
				Ok(path) => result.audit_csv = Some(path),
				Err(e) => result.warn(format!("audit CSV not written, {e}"), &mut on_event),
			}
		}

		info!(
			success = result.success_count,
			failed = result.failed_count,
			skipped = result.skipped_count,
			stopped = result.stopped,
			"Batch finished"
		);

		Ok(result)
	}
}

/// State of one run in progress.
struct Run<'a> {
	table: &'a CsvTable,
	photos: &'a PhotoIndex,
	writer: &'a MetadataWriter,
	output: &'a OutputMode,
	namer: OutputNamer,
	audit: AuditLog,
	result: ProcessingResult,
}

impl Run<'_> {
	fn process(&mut self, row: &CsvRow, on_event: &mut impl FnMut(&BatchEvent)) {
		let record = match self.table.interpret(row) {
			Ok(Interpreted::Record(record)) => record,
			Ok(Interpreted::EmptyFilename) => {
				debug!(line = row.line, "Empty filename, skipping row");
				self.result.skipped_count += 1;
				on_event(&BatchEvent::Skipped {
					line: row.line,
					reason: "empty filename".to_string(),
				});
				return;
			}
			Err(e) => return self.fail(row.line, &e, on_event),
		};

		let Some(source) = self.photos.resolve(record.filename()) else {
			let e = RowError::PhotoNotFound(record.filename().to_string());
			return self.fail(row.line, &e, on_event);
		};

		let (output, new_name) = match self.output {
			OutputMode::InPlace => (source.to_path_buf(), record.filename().to_string()),
			OutputMode::Directory(dir) => {
				let name = self.namer.next_free_name(dir);
				(dir.join(&name), name)
			}
		};

		self.write(row.line, source, &record, &output, on_event);
		self.audit.push(&row.cells, new_name);
	}

	fn write(
		&mut self,
		line: u64,
		source: &Path,
		record: &GeoRecord,
		output: &Path,
		on_event: &mut impl FnMut(&BatchEvent),
	) {
		match self.writer.write(source, record, output) {
			Ok(report) => {
				debug!(
					line,
					filename = record.filename(),
					output = %report.output.display(),
					"Tagged photo"
				);
				self.result.success_count += 1;
				for message in report.warnings {
					self.result.warn(format!("line {line}: {message}"), on_event);
				}
				on_event(&BatchEvent::Tagged {
					line,
					filename: record.filename().to_string(),
					output: report.output,
				});
			}
			Err(source) => {
				let e = RowError::Write {
					filename: record.filename().to_string(),
					source,
				};
				self.fail(line, &e, on_event);
			}
		}
	}

	fn fail(&mut self, line: u64, e: &RowError, on_event: &mut impl FnMut(&BatchEvent)) {
		let reason = format!("line {line}: {e}");
		warn!("{reason}");
		self.result.failed_count += 1;
		self.result.errors.push(reason.clone());
		on_event(&BatchEvent::Failed { line, reason });
	}
}

/// Runs `job` without progress reporting or cancellation.
pub fn process_images_from_csv(job: &BatchJob) -> Result<ProcessingResult> {
	BatchDriver::default().run(job, |_| {})
}
