//! Configured folder-to-folder jobs, each checked before it is handed to the batch driver.

use std::{
	collections::BTreeSet,
	fmt::Display,
	fs,
	path::{Path, PathBuf},
};

use gt_utils::error::FileIOError;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::{
	batch::{BatchDriver, BatchEvent, BatchJob, ProcessingResult},
	csv::CsvTable,
	photos::list_jpegs,
	Result,
};

/// One input folder, holding a single CSV and its photos, and where to put the results.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
	pub input_dir: PathBuf,
	pub output_dir: PathBuf,
}

/// Why a task didn't run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "reason", rename_all = "snake_case")]
pub enum SkipReason {
	NoCsv,
	MultipleCsv { found: usize },
	CountMismatch { rows: usize, photos: usize },
	NameMismatch {
		csv_only: Vec<String>,
		photos_only: Vec<String>,
	},
}

impl Display for SkipReason {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		match self {
			Self::NoCsv => f.write_str("no CSV file in the input folder"),
			Self::MultipleCsv { found } => {
				write!(f, "{found} CSV files in the input folder, expected one")
			}
			Self::CountMismatch { rows, photos } => {
				write!(f, "CSV lists {rows} photos but the folder holds {photos}")
			}
			Self::NameMismatch {
				csv_only,
				photos_only,
			} => write!(
				f,
				"names differ, only in CSV: [{}], only in folder: [{}]",
				csv_only.join(", "),
				photos_only.join(", ")
			),
		}
	}
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum TaskOutcome {
	Skipped(SkipReason),
	Completed(ProcessingResult),
}

impl Task {
	/// The task's CSV, provided its folder contents agree with it.
	pub fn validate(&self) -> Result<std::result::Result<PathBuf, SkipReason>> {
		let mut csvs = fs::read_dir(&self.input_dir)
			.map_err(|e| FileIOError::from((&self.input_dir, e, "Failed to read task folder")))?
			.filter_map(|entry| entry.ok().map(|entry| entry.path()))
			.filter(|path| path.is_file() && is_csv(path))
			.collect::<Vec<_>>();

		let csv = match csvs.len() {
			0 => return Ok(Err(SkipReason::NoCsv)),
			1 => csvs.remove(0),
			found => return Ok(Err(SkipReason::MultipleCsv { found })),
		};

		let table = CsvTable::from_path(&csv)?;
		let listed = table.filenames();

		let photos = list_jpegs(&self.input_dir)?
			.iter()
			.filter_map(|path| path.file_name()?.to_str().map(ToString::to_string))
			.collect::<Vec<_>>();

		if listed.len() != photos.len() {
			return Ok(Err(SkipReason::CountMismatch {
				rows: listed.len(),
				photos: photos.len(),
			}));
		}

		let listed = listed.into_iter().collect::<BTreeSet<_>>();
		let present = photos.iter().map(String::as_str).collect::<BTreeSet<_>>();

		if listed != present {
			return Ok(Err(SkipReason::NameMismatch {
				csv_only: listed.difference(&present).map(ToString::to_string).collect(),
				photos_only: present.difference(&listed).map(ToString::to_string).collect(),
			}));
		}

		Ok(Ok(csv))
	}

	/// Validates the task and, when its folder is consistent, runs it.
	pub fn run(
		&self,
		driver: &BatchDriver,
		opt_file: Option<&Path>,
		xmp: bool,
		on_event: impl FnMut(&BatchEvent),
	) -> Result<TaskOutcome> {
		let csv = match self.validate()? {
			Ok(csv) => csv,
			Err(reason) => {
				warn!(input_dir = %self.input_dir.display(), %reason, "Skipping task");
				return Ok(TaskOutcome::Skipped(reason));
			}
		};

		info!(
			input_dir = %self.input_dir.display(),
			output_dir = %self.output_dir.display(),
			"Running task"
		);

		let job = BatchJob::new(csv, &self.input_dir)
			.with_output_dir(Some(self.output_dir.clone()))
			.with_opt_file(opt_file.map(Path::to_path_buf))
			.with_xmp(xmp);

		driver.run(&job, on_event).map(TaskOutcome::Completed)
	}
}

/// Runs every task in order. A task that fails to run doesn't stop the ones after it.
pub fn run_tasks<'task>(
	tasks: &'task [Task],
	driver: &BatchDriver,
	opt_file: Option<&Path>,
	xmp: bool,
	mut on_event: impl FnMut(&Task, &BatchEvent),
) -> Vec<(&'task Task, Result<TaskOutcome>)> {
	let mut outcomes = Vec::with_capacity(tasks.len());

	for task in tasks {
		if driver.stop_flag().is_stopped() {
			info!("Stop requested, not starting further tasks");
			break;
		}

		let outcome = task.run(driver, opt_file, xmp, |event| on_event(task, event));
		if let Err(e) = &outcome {
			warn!(input_dir = %task.input_dir.display(), %e, "Task failed");
		}
		outcomes.push((task, outcome));
	}

	outcomes
}

fn is_csv(path: &Path) -> bool {
	path.extension()
		.and_then(|ext| ext.to_str())
		.is_some_and(|ext| ext.eq_ignore_ascii_case("csv"))
}

#[cfg(test)]
mod tests {
	use pretty_assertions::assert_eq;

	use super::*;

	fn task(dir: &Path) -> Task {
		Task {
			input_dir: dir.to_path_buf(),
			output_dir: dir.join("out"),
		}
	}

	#[test]
	fn needs_exactly_one_csv() {
		let dir = tempfile::tempdir().unwrap();
		assert_eq!(task(dir.path()).validate().unwrap(), Err(SkipReason::NoCsv));

		fs::write(dir.path().join("a.csv"), "").unwrap();
		fs::write(dir.path().join("b.CSV"), "").unwrap();
		assert_eq!(
			task(dir.path()).validate().unwrap(),
			Err(SkipReason::MultipleCsv { found: 2 })
		);
	}

	#[test]
	fn photo_names_must_match_exactly() {
		let dir = tempfile::tempdir().unwrap();
		fs::write(dir.path().join("points.csv"), "39,116,1,a.jpg\n40,117,1,b.jpg\n").unwrap();
		fs::write(dir.path().join("a.jpg"), b"").unwrap();

		assert_eq!(
			task(dir.path()).validate().unwrap(),
			Err(SkipReason::CountMismatch { rows: 2, photos: 1 })
		);

		fs::write(dir.path().join("B.jpg"), b"").unwrap();
		assert_eq!(
			task(dir.path()).validate().unwrap(),
			Err(SkipReason::NameMismatch {
				csv_only: vec!["b.jpg".to_string()],
				photos_only: vec!["B.jpg".to_string()],
			})
		);

		fs::rename(dir.path().join("B.jpg"), dir.path().join("b.jpg")).unwrap();
		assert_eq!(
			task(dir.path()).validate().unwrap(),
			Ok(dir.path().join("points.csv"))
		);
	}
}
