use std::fmt::Display;

use chrono::{NaiveDateTime, Timelike};
use exif::Rational;
use tracing::warn;

/// Accepted input layouts, tried in order. The first one that parses wins.
pub const TIMESTAMP_PATTERNS: [&str; 4] = [
	"%Y-%m-%d %H:%M:%S", // 2024-08-18 10:30:00
	"%Y-%m-%d_%H:%M:%S", // 2020-10-18_12:19:00
	"%Y/%m/%d %H:%M:%S", // 2024/08/18 10:30:00
	"%Y-%m-%d %H-%M-%S", // 2024-08-18 10-30-00
];

const EXIF_FORMAT: &str = "%Y:%m:%d %H:%M:%S";
const EXIF_DATE_FORMAT: &str = "%Y:%m:%d";
const XMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

/// A capture time, rendered as EXIF wants it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct ExifTimestamp(NaiveDateTime);

impl ExifTimestamp {
	/// Parses `raw` with the first matching entry of [`TIMESTAMP_PATTERNS`].
	///
	/// An empty string is simply "no timestamp". Anything else that doesn't match is logged and
	/// discarded.
	#[must_use]
	pub fn parse(raw: &str) -> Option<Self> {
		let raw = raw.trim();
		if raw.is_empty() {
			return None;
		}

		let parsed = TIMESTAMP_PATTERNS
			.iter()
			.find_map(|pattern| NaiveDateTime::parse_from_str(raw, pattern).ok())
			.map(Self);

		if parsed.is_none() {
			warn!(%raw, "Unrecognised timestamp format, no capture time will be written");
		}

		parsed
	}

	#[must_use]
	pub const fn date_time(&self) -> NaiveDateTime {
		self.0
	}

	/// `GPSDateStamp`, `YYYY:MM:DD`.
	#[must_use]
	pub fn gps_date_stamp(&self) -> String {
		self.0.format(EXIF_DATE_FORMAT).to_string()
	}

	/// `GPSTimeStamp`, as whole hours, minutes and seconds.
	#[must_use]
	pub fn gps_time_stamp(&self) -> [Rational; 3] {
		[self.0.hour(), self.0.minute(), self.0.second()].map(|num| Rational { num, denom: 1 })
	}

	/// `xmp:CreateDate` style, `YYYY-MM-DDTHH:MM:SS`.
	#[must_use]
	pub fn to_xmp(&self) -> String {
		self.0.format(XMP_FORMAT).to_string()
	}
}

impl Display for ExifTimestamp {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		write!(f, "{}", self.0.format(EXIF_FORMAT))
	}
}

impl From<NaiveDateTime> for ExifTimestamp {
	fn from(value: NaiveDateTime) -> Self {
		Self(value)
	}
}

/// Re-renders `raw` into the canonical `YYYY:MM:DD HH:MM:SS` form.
///
/// # Examples
///
/// ```
/// use gt_media_metadata::exif::normalize_timestamp;
///
/// assert_eq!(
/// 	normalize_timestamp("2020-10-18_12:19:00").as_deref(),
/// 	Some("2020:10:18 12:19:00")
/// );
/// assert_eq!(normalize_timestamp("yesterday"), None);
/// ```
#[must_use]
pub fn normalize_timestamp(raw: &str) -> Option<String> {
	ExifTimestamp::parse(raw).map(|timestamp| timestamp.to_string())
}
