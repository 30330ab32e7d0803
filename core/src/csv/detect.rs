//! Header detection and header driven column mapping.

use serde::Serialize;

/// Keywords that mark a first line as a header.
pub const HEADER_KEYWORDS: [&str; 9] = [
	"文件名",
	"filename",
	"纬度",
	"经度",
	"latitude",
	"longitude",
	"lat",
	"lng",
	"lon",
];

/// What a column holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Role {
	Filename,
	Latitude,
	Longitude,
	Altitude,
	Timestamp,
	Roll,
	Pitch,
	Yaw,
}

impl Role {
	/// Evaluated in this order, a column takes the first role whose keywords match.
	pub const ALL: [Self; 8] = [
		Self::Filename,
		Self::Latitude,
		Self::Longitude,
		Self::Altitude,
		Self::Timestamp,
		Self::Roll,
		Self::Pitch,
		Self::Yaw,
	];

	#[must_use]
	pub const fn keywords(self) -> &'static [&'static str] {
		match self {
			Self::Filename => &["文件名", "filename", "file", "name"],
			Self::Latitude => &["纬度", "latitude", "lat"],
			Self::Longitude => &["经度", "longitude", "lng", "lon"],
			Self::Altitude => &["海拔", "altitude", "alt", "高度", "height"],
			Self::Timestamp => &["时间", "timestamp", "time", "date"],
			Self::Roll => &["横滚", "roll"],
			Self::Pitch => &["俯仰", "pitch"],
			Self::Yaw => &["偏航", "yaw", "heading"],
		}
	}

	/// Classifies a header cell.
	#[must_use]
	pub fn of(cell: &str) -> Option<Self> {
		let cell = cell.trim().to_lowercase();
		Self::ALL.into_iter().find(|role| {
			role.keywords()
				.iter()
				.any(|keyword| cell.contains(keyword))
		})
	}
}

/// Whether `first_row` is a header rather than data.
///
/// The lower-cased line must mention one of [`HEADER_KEYWORDS`], and none of its cells may be a
/// number: data rows always carry numeric coordinates, while file names such as `flat.jpg`
/// could otherwise pass for a header.
#[must_use]
pub fn detect_header(first_row: &[String]) -> bool {
	let line = first_row.join(",").to_lowercase();

	HEADER_KEYWORDS
		.iter()
		.any(|keyword| line.contains(keyword))
		&& !first_row
			.iter()
			.any(|cell| cell.trim().parse::<f64>().is_ok())
}

/// Column indices derived from a header.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ColumnMapping {
	pub filename: usize,
	pub latitude: usize,
	pub longitude: usize,
	pub altitude: Option<usize>,
	pub timestamp: Option<usize>,
	pub roll: Option<usize>,
	pub pitch: Option<usize>,
	pub yaw: Option<usize>,
}

impl ColumnMapping {
	/// Maps every header cell to its [`Role`], the first column wins when several share one.
	///
	/// Returns `None` unless the filename, latitude and longitude columns were all found.
	#[must_use]
	pub fn detect(header: &[String]) -> Option<Self> {
		let mut found: [Option<usize>; 8] = [None; 8];

		for (index, cell) in header.iter().enumerate() {
			if let Some(role) = Role::of(cell) {
				let slot = &mut found[role_index(role)];
				if slot.is_none() {
					*slot = Some(index);
				}
			}
		}

		let column = |role| found[role_index(role)];

		Some(Self {
			filename: column(Role::Filename)?,
			latitude: column(Role::Latitude)?,
			longitude: column(Role::Longitude)?,
			altitude: column(Role::Altitude),
			timestamp: column(Role::Timestamp),
			roll: column(Role::Roll),
			pitch: column(Role::Pitch),
			yaw: column(Role::Yaw),
		})
	}

	/// The highest column index a row must reach.
	#[must_use]
	pub fn required_width(&self) -> usize {
		[self.filename, self.latitude, self.longitude]
			.into_iter()
			.max()
			.map_or(0, |max| max + 1)
	}
}

const fn role_index(role: Role) -> usize {
	match role {
		Role::Filename => 0,
		Role::Latitude => 1,
		Role::Longitude => 2,
		Role::Altitude => 3,
		Role::Timestamp => 4,
		Role::Roll => 5,
		Role::Pitch => 6,
		Role::Yaw => 7,
	}
}

#[cfg(test)]
mod tests {
	use pretty_assertions::assert_eq;

	use super::*;

	fn row(cells: &[&str]) -> Vec<String> {
		cells.iter().map(ToString::to_string).collect()
	}

	#[test]
	fn headers_are_recognised() {
		assert!(detect_header(&row(&["filename", "lat", "lon"])));
		assert!(detect_header(&row(&["文件名", "纬度", "经度", "高度"])));
		assert!(detect_header(&row(&["Latitude", "Longitude", "Alt", "Photo"])));
	}

	#[test]
	fn data_rows_are_not_headers() {
		assert!(!detect_header(&row(&["39.9042", "116.4075", "100", "a.jpg"])));
		assert!(!detect_header(&row(&["39.9", "116.4", "100", "flat_long.jpg"])));
		assert!(!detect_header(&row(&[
			"IMG_001.jpg",
			"2024-08-18 10:30:00",
			"116.40",
			"39.90",
			"100",
			"0",
			"0",
			"0"
		])));
	}

	#[test]
	fn maps_short_english_headers() {
		let mapping = ColumnMapping::detect(&row(&["filename", "lat", "lon"])).unwrap();

		assert_eq!(
			mapping,
			ColumnMapping {
				filename: 0,
				latitude: 1,
				longitude: 2,
				altitude: None,
				timestamp: None,
				roll: None,
				pitch: None,
				yaw: None,
			}
		);
		assert_eq!(mapping.required_width(), 3);
	}

	#[test]
	fn maps_the_sample_layout() {
		let mapping = ColumnMapping::detect(&row(&[
			"文件名", "纬度", "经度", "高度", "Roll", "Pitch", "Yaw", "时间",
		]))
		.unwrap();

		assert_eq!(mapping.altitude, Some(3));
		assert_eq!(
			(mapping.roll, mapping.pitch, mapping.yaw, mapping.timestamp),
			(Some(4), Some(5), Some(6), Some(7))
		);
	}

	#[test]
	fn first_matching_column_wins() {
		let mapping =
			ColumnMapping::detect(&row(&["Latitude", "Longitude", "File", "Name", "Height"]))
				.unwrap();

		assert_eq!(mapping.filename, 2);
		assert_eq!(mapping.altitude, Some(4));
		assert_eq!(mapping.required_width(), 3);
	}

	#[test]
	fn unusable_mapping() {
		assert_eq!(ColumnMapping::detect(&row(&["lat", "lon", "altitude"])), None);
	}
}
