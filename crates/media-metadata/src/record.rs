use crate::{Attitude, ExifTimestamp, GpsPosition};

/// Everything known about one photo: which file, where it was taken and how the aircraft was
/// oriented.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct GeoRecord {
	filename: String,
	position: GpsPosition,
	attitude: Attitude,
	timestamp: Option<String>,
}

impl GeoRecord {
	#[must_use]
	pub fn new(filename: impl Into<String>, position: GpsPosition) -> Self {
		Self {
			filename: filename.into(),
			position,
			attitude: Attitude::default(),
			timestamp: None,
		}
	}

	#[must_use]
	pub fn with_attitude(mut self, attitude: Attitude) -> Self {
		self.attitude = attitude;
		self
	}

	/// Stores the raw timestamp text, blank values count as absent.
	#[must_use]
	pub fn with_timestamp(mut self, timestamp: impl Into<String>) -> Self {
		let timestamp = timestamp.into();
		self.timestamp = (!timestamp.trim().is_empty()).then_some(timestamp);
		self
	}

	#[must_use]
	pub fn filename(&self) -> &str {
		&self.filename
	}

	#[must_use]
	pub const fn position(&self) -> &GpsPosition {
		&self.position
	}

	#[must_use]
	pub const fn attitude(&self) -> &Attitude {
		&self.attitude
	}

	#[must_use]
	pub fn timestamp(&self) -> Option<&str> {
		self.timestamp.as_deref()
	}

	/// The capture time, when the raw text matches one of the supported layouts.
	#[must_use]
	pub fn parsed_timestamp(&self) -> Option<ExifTimestamp> {
		self.timestamp.as_deref().and_then(ExifTimestamp::parse)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn blank_timestamps_are_dropped() {
		let position = GpsPosition::new(1.0, 2.0, 3.0).unwrap();

		let record = GeoRecord::new("a.jpg", position).with_timestamp("   ");
		assert_eq!(record.timestamp(), None);

		let record = GeoRecord::new("a.jpg", position).with_timestamp("2020-10-18_12:19:00");
		assert_eq!(
			record.parsed_timestamp().map(|ts| ts.to_string()).as_deref(),
			Some("2020:10:18 12:19:00")
		);
		assert_eq!(record.attitude(), &Attitude::default());
	}
}
