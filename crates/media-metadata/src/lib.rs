#![doc = include_str!("../README.md")]
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

pub mod camera;
mod error;
pub mod exif;
pub mod jpeg;
mod record;
pub mod writer;
pub mod xmp;

pub use camera::{CameraProfile, DewarpData};
pub use error::{Error, Result};
pub use exif::{Attitude, ExifTimestamp, GpsPosition};
pub use record::GeoRecord;
pub use writer::{EncodedImage, MetadataWriter, WriteReport};
pub use xmp::DjiXmp;
