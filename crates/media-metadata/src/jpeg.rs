//! APP1 segment surgery. Pixel data is never decoded.

use img_parts::{
	jpeg::{markers, Jpeg, JpegSegment},
	Bytes, ImageEXIF,
};

use crate::{xmp::XMP_APP1_PREFIX, Error, Result};

const EXIF_APP1_PREFIX: &[u8] = b"Exif\0\0";

/// A segment's length field is a u16 that counts itself.
pub const MAX_SEGMENT_CONTENTS: usize = 65_533;

/// A parsed JPEG whose metadata segments can be swapped out.
#[derive(Debug, Clone)]
pub struct JpegMetadata {
	jpeg: Jpeg,
}

impl JpegMetadata {
	pub fn from_bytes(bytes: impl Into<Bytes>) -> Result<Self> {
		Ok(Self {
			jpeg: Jpeg::from_bytes(bytes.into())?,
		})
	}

	/// The TIFF structure of the EXIF segment, without its `Exif\0\0` header.
	#[must_use]
	pub fn exif_tiff(&self) -> Option<Bytes> {
		self.jpeg.exif()
	}

	pub fn replace_exif(&mut self, tiff: Vec<u8>) -> Result<()> {
		check_size(EXIF_APP1_PREFIX.len() + tiff.len())?;
		self.jpeg.set_exif(Some(Bytes::from(tiff)));

		Ok(())
	}

	/// The current XMP packet, if any.
	#[must_use]
	pub fn xmp_packet(&self) -> Option<Bytes> {
		self.jpeg
			.segments()
			.iter()
			.find(|segment| is_xmp(segment))
			.map(|segment| segment.contents().slice(XMP_APP1_PREFIX.len()..))
	}

	/// Drops any XMP segment and inserts `packet` right after the EXIF segment.
	pub fn replace_xmp(&mut self, packet: &[u8]) -> Result<()> {
		let mut contents = Vec::with_capacity(XMP_APP1_PREFIX.len() + packet.len());
		contents.extend_from_slice(XMP_APP1_PREFIX);
		contents.extend_from_slice(packet);
		check_size(contents.len())?;

		let segments = self.jpeg.segments_mut();
		segments.retain(|segment| !is_xmp(segment));

		let index = segments
			.iter()
			.position(is_exif)
			.or_else(|| {
				segments
					.iter()
					.rposition(|segment| segment.marker() == markers::APP0)
			})
			.map_or(0, |index| index + 1);

		segments.insert(
			index,
			JpegSegment::new_with_contents(markers::APP1, Bytes::from(contents)),
		);

		Ok(())
	}

	#[must_use]
	pub fn into_bytes(self) -> Bytes {
		self.jpeg.encoder().bytes()
	}
}

fn is_exif(segment: &JpegSegment) -> bool {
	segment.marker() == markers::APP1 && segment.contents().starts_with(EXIF_APP1_PREFIX)
}

fn is_xmp(segment: &JpegSegment) -> bool {
	segment.marker() == markers::APP1 && segment.contents().starts_with(XMP_APP1_PREFIX)
}

fn check_size(len: usize) -> Result<()> {
	if len > MAX_SEGMENT_CONTENTS {
		return Err(Error::SegmentTooLarge(len));
	}

	Ok(())
}

#[cfg(test)]
mod tests {
	use std::io::Cursor;

	use image::{DynamicImage, ImageOutputFormat, Rgb, RgbImage};

	use super::*;

	fn blank_jpeg() -> Vec<u8> {
		let mut buf = Cursor::new(Vec::new());
		DynamicImage::ImageRgb8(RgbImage::from_pixel(16, 16, Rgb([40, 120, 200])))
			.write_to(&mut buf, ImageOutputFormat::Jpeg(90))
			.unwrap();
		buf.into_inner()
	}

	#[test]
	fn rejects_non_jpeg_input() {
		assert!(matches!(
			JpegMetadata::from_bytes(b"GIF89a".to_vec()),
			Err(Error::Jpeg(_))
		));
	}

	#[test]
	fn exif_round_trips_through_segments() {
		let mut jpeg = JpegMetadata::from_bytes(blank_jpeg()).unwrap();
		assert!(jpeg.exif_tiff().is_none());

		jpeg.replace_exif(b"II*\0fake".to_vec()).unwrap();
		let jpeg = JpegMetadata::from_bytes(jpeg.into_bytes()).unwrap();

		assert_eq!(jpeg.exif_tiff().as_deref(), Some(&b"II*\0fake"[..]));
	}

	#[test]
	fn xmp_is_replaced_not_duplicated() {
		let mut jpeg = JpegMetadata::from_bytes(blank_jpeg()).unwrap();
		jpeg.replace_exif(b"II*\0fake".to_vec()).unwrap();
		jpeg.replace_xmp(b"<first/>").unwrap();
		jpeg.replace_xmp(b"<second/>").unwrap();

		let jpeg = JpegMetadata::from_bytes(jpeg.into_bytes()).unwrap();
		let app1 = jpeg
			.jpeg
			.segments()
			.iter()
			.filter(|segment| segment.marker() == markers::APP1)
			.collect::<Vec<_>>();

		assert_eq!(app1.len(), 2);
		assert!(is_exif(app1[0]));
		assert!(is_xmp(app1[1]));
		assert_eq!(jpeg.xmp_packet().as_deref(), Some(&b"<second/>"[..]));
	}

	#[test]
	fn oversized_segments_are_refused() {
		let mut jpeg = JpegMetadata::from_bytes(blank_jpeg()).unwrap();

		assert!(matches!(
			jpeg.replace_xmp(&vec![b' '; MAX_SEGMENT_CONTENTS]),
			Err(Error::SegmentTooLarge(_))
		));
	}
}
