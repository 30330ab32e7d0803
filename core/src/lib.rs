//! Batch geotagging: reads GPS/attitude records from a CSV file, finds the matching photos and
//! writes the metadata into them.
#![warn(
	clippy::all,
	clippy::pedantic,
	clippy::correctness,
	clippy::perf,
	clippy::style,
	clippy::suspicious,
	clippy::complexity,
	clippy::nursery,
	clippy::unwrap_used,
	unused_qualifications,
	rust_2018_idioms,
	clippy::expect_used,
	trivial_casts,
	trivial_numeric_casts,
	unused_allocation,
	clippy::as_conversions,
	clippy::dbg_macro
)]
#![forbid(unsafe_code)]
#![allow(clippy::missing_errors_doc, clippy::module_name_repetitions)]

pub mod audit;
pub mod batch;
pub mod config;
pub mod csv;
mod error;
pub mod naming;
pub mod photos;
pub mod preview;
pub mod tasks;

pub use batch::{
	process_images_from_csv, BatchDriver, BatchEvent, BatchJob, OutputMode, ProcessingResult,
	StopFlag,
};
pub use config::{GeotagConfig, Migrate};
pub use error::{Error, Result, RowError};
pub use preview::{preview, MatchReport};
pub use tasks::{run_tasks, Task, TaskOutcome};
