//! Output file names for renamed copies.

use std::path::{Path, PathBuf};

use chrono::{Local, NaiveDateTime};

const STAMP_FORMAT: &str = "%y%m%d%H%M%S";

/// Hands out `<YYMMDDHHMMSS><sequence>.jpg` names for a single run.
///
/// The timestamp is taken once, when the run starts, and the sequence starts at 1. Both
/// together keep names unique within the run. Runs started in the same second share a stamp,
/// so names that already exist in the destination are skipped.
#[derive(Debug, Clone)]
pub struct OutputNamer {
	stamp: String,
	sequence: u32,
}

impl OutputNamer {
	#[must_use]
	pub fn new(started_at: NaiveDateTime) -> Self {
		Self {
			stamp: started_at.format(STAMP_FORMAT).to_string(),
			sequence: 0,
		}
	}

	#[must_use]
	pub fn now() -> Self {
		Self::new(Local::now().naive_local())
	}

	/// The run's `YYMMDDHHMMSS` stamp.
	#[must_use]
	pub fn stamp(&self) -> &str {
		&self.stamp
	}

	/// `<stamp>.csv`, the audit file name.
	#[must_use]
	pub fn audit_name(&self) -> String {
		format!("{}.csv", self.stamp)
	}

	/// Consumes the next sequence number.
	pub fn next_name(&mut self) -> String {
		self.sequence += 1;
		format!("{}{:02}.jpg", self.stamp, self.sequence)
	}

	/// Like [`OutputNamer::next_name`], but skips names already taken in `dir`.
	pub fn next_free_name(&mut self, dir: &Path) -> String {
		loop {
			let name = self.next_name();
			if !dir.join(&name).exists() {
				return name;
			}
		}
	}

	/// `<stamp>.csv` in `dir`, or `<stamp>-<n>.csv` when that is taken.
	#[must_use]
	pub fn free_audit_path(&self, dir: &Path) -> PathBuf {
		let mut path = dir.join(self.audit_name());
		let mut attempt = 1;
		while path.exists() {
			attempt += 1;
			path = dir.join(format!("{}-{attempt}.csv", self.stamp));
		}
		path
	}

	/// How many sequence numbers were consumed so far, skipped ones included.
	#[must_use]
	pub const fn issued(&self) -> u32 {
		self.sequence
	}
}
