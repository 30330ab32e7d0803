//! Turning CSV cells into [`GeoRecord`]s.

use gt_media_metadata::{Attitude, GeoRecord, GpsPosition};

use crate::RowError;

use super::detect::ColumnMapping;

/// `latitude, longitude, altitude, filename`
pub const SHORT_LAYOUT_WIDTH: usize = 4;
/// `filename, timestamp, longitude, latitude, altitude, pitch, roll, yaw`
pub const FULL_LAYOUT_WIDTH: usize = 8;

#[derive(Debug, Clone, PartialEq)]
pub enum Interpreted {
	Record(GeoRecord),
	/// The numbers were fine but there is no file to tag.
	EmptyFilename,
}

/// Interprets a row by its column count alone.
pub fn interpret_positional(cells: &[String]) -> Result<Interpreted, RowError> {
	match cells.len() {
		SHORT_LAYOUT_WIDTH => {
			let latitude = required_number("latitude", &cells[0])?;
			let longitude = required_number("longitude", &cells[1])?;
			let altitude = required_number("altitude", &cells[2])?;

			build(&cells[3], latitude, longitude, altitude, Attitude::default(), None)
		}
		width if width >= FULL_LAYOUT_WIDTH => {
			let longitude = required_number("longitude", &cells[2])?;
			let latitude = required_number("latitude", &cells[3])?;
			let altitude = optional_number("altitude", Some(&cells[4]))?;
			let pitch = optional_number("pitch", Some(&cells[5]))?;
			let roll = optional_number("roll", Some(&cells[6]))?;
			let yaw = optional_number("yaw", Some(&cells[7]))?;

			build(
				&cells[0],
				latitude,
				longitude,
				altitude,
				attitude(roll, pitch, yaw)?,
				Some(&cells[1]),
			)
		}
		width => Err(RowError::ColumnCount(width)),
	}
}

/// Interprets a row through a header derived [`ColumnMapping`].
///
/// Optional columns the row doesn't reach count as empty. An unreadable altitude falls back
/// to 0.
pub fn interpret_mapped(
	cells: &[String],
	mapping: &ColumnMapping,
) -> Result<Interpreted, RowError> {
	let needed = mapping.required_width();
	if cells.len() < needed {
		return Err(RowError::MissingColumn {
			needed,
			found: cells.len(),
		});
	}

	let cell = |index: Option<usize>| index.and_then(|index| cells.get(index)).map(String::as_str);

	let latitude = required_number("latitude", &cells[mapping.latitude])?;
	let longitude = required_number("longitude", &cells[mapping.longitude])?;
	let altitude = optional_number("altitude", cell(mapping.altitude)).unwrap_or(0.0);
	let roll = optional_number("roll", cell(mapping.roll))?;
	let pitch = optional_number("pitch", cell(mapping.pitch))?;
	let yaw = optional_number("yaw", cell(mapping.yaw))?;

	build(
		&cells[mapping.filename],
		latitude,
		longitude,
		altitude,
		attitude(roll, pitch, yaw)?,
		cell(mapping.timestamp),
	)
}

fn build(
	filename: &str,
	latitude: f64,
	longitude: f64,
	altitude: f64,
	attitude: Attitude,
	timestamp: Option<&str>,
) -> Result<Interpreted, RowError> {
	let filename = filename.trim();
	if filename.is_empty() {
		return Ok(Interpreted::EmptyFilename);
	}

	let position =
		GpsPosition::new(latitude, longitude, altitude).map_err(RowError::InvalidRecord)?;

	let record = GeoRecord::new(filename, position).with_attitude(attitude);

	Ok(Interpreted::Record(match timestamp {
		Some(timestamp) => record.with_timestamp(timestamp.trim()),
		None => record,
	}))
}

fn attitude(roll: f64, pitch: f64, yaw: f64) -> Result<Attitude, RowError> {
	Attitude::new(roll, pitch, yaw).map_err(RowError::InvalidRecord)
}

fn required_number(field: &'static str, cell: &str) -> Result<f64, RowError> {
	let cell = cell.trim();

	cell.parse::<f64>()
		.ok()
		.filter(|value| value.is_finite())
		.ok_or_else(|| RowError::InvalidNumber {
			field,
			value: cell.to_string(),
		})
}

/// Missing or blank cells are 0.
fn optional_number(field: &'static str, cell: Option<&str>) -> Result<f64, RowError> {
	match cell.map(str::trim) {
		None | Some("") => Ok(0.0),
		Some(cell) => required_number(field, cell),
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn row(cells: &[&str]) -> Vec<String> {
		cells.iter().map(ToString::to_string).collect()
	}

	fn record(interpreted: Interpreted) -> GeoRecord {
		match interpreted {
			Interpreted::Record(record) => record,
			Interpreted::EmptyFilename => panic!("expected a record"),
		}
	}

	#[test]
	fn short_layout() {
		let record = record(
			interpret_positional(&row(&["39.9042", " 116.4075", "100", " a.jpg "])).unwrap(),
		);

		assert_eq!(record.filename(), "a.jpg");
		assert_eq!(record.position().coordinates(), (39.9042, 116.4075));
		assert_eq!(record.position().altitude(), 100.0);
		assert_eq!(record.timestamp(), None);
	}

	#[test]
	fn full_layout_with_blank_cells() {
		let record = record(
			interpret_positional(&row(&[
				"IMG_001.jpg",
				"2024-08-18 10:30:00",
				"116.4074582",
				"39.9042135",
				"",
				"8.7",
				"",
				"-10",
				"extra",
			]))
			.unwrap(),
		);

		assert_eq!(record.position().latitude(), 39.9042135);
		assert_eq!(record.position().longitude(), 116.4074582);
		assert_eq!(record.position().altitude(), 0.0);
		assert_eq!(record.attitude().pitch(), 8.7);
		assert_eq!(record.attitude().roll(), 0.0);
		assert_eq!(record.attitude().yaw(), 350.0);
		assert_eq!(record.timestamp(), Some("2024-08-18 10:30:00"));
	}

	#[test]
	fn unsupported_widths() {
		for width in [1, 2, 3, 5, 6, 7] {
			let cells = vec!["1".to_string(); width];
			assert!(matches!(
				interpret_positional(&cells),
				Err(RowError::ColumnCount(w)) if w == width
			));
		}
	}

	#[test]
	fn bad_numbers_fail_the_row() {
		assert!(matches!(
			interpret_positional(&row(&["north", "116", "1", "a.jpg"])),
			Err(RowError::InvalidNumber { field: "latitude", .. })
		));
		assert!(matches!(
			interpret_positional(&row(&["NaN", "116", "1", "a.jpg"])),
			Err(RowError::InvalidNumber { field: "latitude", .. })
		));
		assert!(matches!(
			interpret_positional(&row(&["a.jpg", "", "116", "39", "1", "up", "0", "0"])),
			Err(RowError::InvalidNumber { field: "pitch", .. })
		));
		assert!(matches!(
			interpret_positional(&row(&["91", "116", "1", "a.jpg"])),
			Err(RowError::InvalidRecord(_))
		));
	}

	#[test]
	fn empty_filename_is_not_a_failure() {
		assert_eq!(
			interpret_positional(&row(&["39", "116", "1", "  "])).unwrap(),
			Interpreted::EmptyFilename
		);
	}

	#[test]
	fn mapped_rows() {
		let mapping = ColumnMapping {
			filename: 2,
			latitude: 0,
			longitude: 1,
			altitude: Some(3),
			timestamp: None,
			roll: None,
			pitch: None,
			yaw: Some(5),
		};

		let full = record(
			interpret_mapped(&row(&["10", "20", "b.jpg", "oops", "x", "-90"]), &mapping).unwrap(),
		);
		assert_eq!(full.filename(), "b.jpg");
		assert_eq!(full.position().altitude(), 0.0);
		assert_eq!(full.attitude().yaw(), 270.0);

		let short = record(interpret_mapped(&row(&["10", "20", "c.jpg"]), &mapping).unwrap());
		assert_eq!(short.attitude().yaw(), 0.0);

		assert!(matches!(
			interpret_mapped(&row(&["10", "20"]), &mapping),
			Err(RowError::MissingColumn {
				needed: 3,
				found: 2
			})
		));
	}
}
