use std::io::Cursor;

use exif::{experimental::Writer, Exif, Field, In, Rational, Reader, Tag, Value};
use tracing::{debug, warn};

use crate::{
	camera::CameraProfile,
	exif::consts::{GPS_VERSION_ID, TRUE_NORTH, USER_COMMENT_ASCII},
	GeoRecord, Result,
};

use super::ExifTimestamp;

/// The set of EXIF fields written for one record.
///
/// Every field lives in the primary IFD. When merged with an existing EXIF block, these
/// replace any field with the same tag.
#[derive(Debug, Default)]
pub struct ExifFields {
	fields: Vec<Field>,
}

impl ExifFields {
	#[must_use]
	pub fn build(
		record: &GeoRecord,
		timestamp: Option<&ExifTimestamp>,
		camera: Option<&CameraProfile>,
	) -> Self {
		let position = record.position();
		let attitude = record.attitude();

		let mut this = Self::default();

		this.push(Tag::GPSVersionID, Value::Byte(GPS_VERSION_ID.to_vec()));
		this.push(Tag::GPSLatitudeRef, ascii(position.latitude_ref()));
		this.push(
			Tag::GPSLatitude,
			Value::Rational(position.latitude_dms().to_rationals().to_vec()),
		);
		this.push(Tag::GPSLongitudeRef, ascii(position.longitude_ref()));
		this.push(
			Tag::GPSLongitude,
			Value::Rational(position.longitude_dms().to_rationals().to_vec()),
		);
		this.push(Tag::GPSAltitudeRef, Value::Byte(vec![position.altitude_ref()]));
		this.push(
			Tag::GPSAltitude,
			Value::Rational(vec![position.altitude_rational()]),
		);
		this.push(Tag::GPSImgDirectionRef, ascii(TRUE_NORTH));
		this.push(
			Tag::GPSImgDirection,
			Value::Rational(vec![attitude.direction_rational()]),
		);

		if let Some(camera) = camera {
			if let Some(focal_length) = camera.focal_length_rational() {
				this.push(Tag::FocalLength, Value::Rational(vec![focal_length]));
			}
			if let Some(equivalent) = camera.focal_length_35mm() {
				this.push(Tag::FocalLengthIn35mmFilm, Value::Short(vec![equivalent]));
			}
		}

		if let Some(timestamp) = timestamp {
			let canonical = timestamp.to_string();
			this.push(Tag::GPSDateStamp, ascii(&timestamp.gps_date_stamp()));
			this.push(
				Tag::GPSTimeStamp,
				Value::Rational(timestamp.gps_time_stamp().to_vec()),
			);
			this.push(Tag::DateTimeOriginal, ascii(&canonical));
			this.push(Tag::DateTime, ascii(&canonical));
		}

		let mut comment = USER_COMMENT_ASCII.to_vec();
		comment.extend(attitude.summary().bytes());
		this.push(Tag::UserComment, Value::Undefined(comment, 0));

		this
	}

	fn push(&mut self, tag: Tag, value: Value) {
		self.fields.push(Field {
			tag,
			ifd_num: In::PRIMARY,
			value,
		});
	}

	#[must_use]
	pub fn get(&self, tag: Tag) -> Option<&Field> {
		self.fields.iter().find(|field| field.tag == tag)
	}

	#[must_use]
	pub fn len(&self) -> usize {
		self.fields.len()
	}

	#[must_use]
	pub fn is_empty(&self) -> bool {
		self.fields.is_empty()
	}

	fn replaces(&self, field: &Field) -> bool {
		self.fields
			.iter()
			.any(|ours| ours.tag == field.tag && ours.ifd_num == field.ifd_num)
	}
}

fn ascii(s: &str) -> Value {
	Value::Ascii(vec![s.as_bytes().to_vec()])
}

/// Serializes `fields` into a TIFF-structured EXIF block, on top of whatever the
/// `existing` block (if any) already carried.
///
/// Fields that can't be re-serialized (unparsed values, IFDs past the thumbnail) are dropped, as
/// is the thumbnail IFD when its JPEG data can't be located.
pub fn encode_exif(existing: Option<&[u8]>, fields: &ExifFields) -> Result<Vec<u8>> {
	let existing = existing.and_then(|tiff| match Reader::new().read_raw(tiff.to_vec()) {
		Ok(exif) => Some(exif),
		Err(e) => {
			warn!(?e, "Existing EXIF block is unreadable, starting from an empty one");
			None
		}
	});

	let thumbnail = existing.as_ref().and_then(thumbnail_of);

	let mut writer = Writer::new();

	if let Some(exif) = &existing {
		let mut dropped = 0_usize;
		for field in exif.fields() {
			if fields.replaces(field) {
				continue;
			}
			if is_rewritable(field, thumbnail.is_some()) {
				writer.push_field(field);
			} else {
				dropped += 1;
			}
		}
		if dropped > 0 {
			debug!(dropped, "Some existing EXIF fields can't be carried over");
		}
	}

	for field in &fields.fields {
		writer.push_field(field);
	}

	if let Some(jpeg) = thumbnail {
		writer.set_jpeg(jpeg, In::THUMBNAIL);
	}

	let mut buf = Cursor::new(Vec::new());
	writer.write(&mut buf, true)?;

	Ok(buf.into_inner())
}

/// Offsets and IFD pointers are recomputed by the writer.
const STRUCTURAL_TAGS: [Tag; 9] = [
	Tag::ExifIFDPointer,
	Tag::GPSInfoIFDPointer,
	Tag::InteropIFDPointer,
	Tag::StripOffsets,
	Tag::StripByteCounts,
	Tag::TileOffsets,
	Tag::TileByteCounts,
	Tag::JPEGInterchangeFormat,
	Tag::JPEGInterchangeFormatLength,
];

fn is_rewritable(field: &Field, has_thumbnail: bool) -> bool {
	let known_ifd =
		field.ifd_num == In::PRIMARY || (has_thumbnail && field.ifd_num == In::THUMBNAIL);

	known_ifd
		&& !STRUCTURAL_TAGS.contains(&field.tag)
		&& !matches!(field.value, Value::Unknown(..))
}

fn thumbnail_of(exif: &Exif) -> Option<&[u8]> {
	let offset = exif
		.get_field(Tag::JPEGInterchangeFormat, In::THUMBNAIL)?
		.value
		.get_uint(0)?;
	let length = exif
		.get_field(Tag::JPEGInterchangeFormatLength, In::THUMBNAIL)?
		.value
		.get_uint(0)?;

	let start = usize::try_from(offset).ok()?;
	let end = start.checked_add(usize::try_from(length).ok()?)?;

	exif.buf().get(start..end)
}

/// Reads back the `(num, denom)` pairs of a rational field, mostly useful for inspection.
#[must_use]
pub fn rationals(field: &Field) -> Option<&[Rational]> {
	match &field.value {
		Value::Rational(values) => Some(values),
		_ => None,
	}
}
