use std::{
	fs,
	io::Write,
	path::{Path, PathBuf},
};

use chrono::{Local, NaiveDate};
use gt_utils::error::FileIOError;
use img_parts::Bytes;
use tempfile::NamedTempFile;
use tracing::{debug, warn};

use crate::{
	camera::CameraProfile,
	exif::{encode_exif, ExifFields},
	jpeg::JpegMetadata,
	xmp::DjiXmp,
	DewarpData, ExifTimestamp, GeoRecord, Result,
};

/// The rewritten image, plus what happened to the optional parts.
#[derive(Debug, Clone)]
pub struct EncodedImage {
	pub bytes: Bytes,
	pub xmp_written: bool,
	pub warnings: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WriteReport {
	pub output: PathBuf,
	pub xmp_written: bool,
	pub warnings: Vec<String>,
}

/// Writes GPS, attitude and capture time metadata into JPEG files.
///
/// Optional capabilities are plain fields: a [`CameraProfile`] adds focal lengths (and lens
/// correction data for XMP), a [`DjiXmp`] adds the XMP packet.
#[derive(Debug, Clone)]
pub struct MetadataWriter {
	camera: Option<CameraProfile>,
	xmp: Option<DjiXmp>,
	run_date: NaiveDate,
}

impl Default for MetadataWriter {
	fn default() -> Self {
		Self::new()
	}
}

impl MetadataWriter {
	#[must_use]
	pub fn new() -> Self {
		Self {
			camera: None,
			xmp: None,
			run_date: Local::now().date_naive(),
		}
	}

	#[must_use]
	pub fn with_camera(mut self, camera: Option<CameraProfile>) -> Self {
		self.camera = camera;
		self
	}

	#[must_use]
	pub fn with_xmp(mut self, xmp: Option<DjiXmp>) -> Self {
		self.xmp = xmp;
		self
	}

	/// The date stamped into `DewarpData`, today by default.
	#[must_use]
	pub fn with_run_date(mut self, run_date: NaiveDate) -> Self {
		self.run_date = run_date;
		self
	}

	#[must_use]
	pub const fn camera(&self) -> Option<&CameraProfile> {
		self.camera.as_ref()
	}

	#[must_use]
	pub const fn writes_xmp(&self) -> bool {
		self.xmp.is_some()
	}

	/// Rewrites the metadata segments of the JPEG in `source`.
	///
	/// Errors only concern the image itself and the EXIF block. Problems with XMP,
	/// lens correction data or the timestamp end up in [`EncodedImage::warnings`].
	pub fn encode(&self, source: impl Into<Bytes>, record: &GeoRecord) -> Result<EncodedImage> {
		let mut warnings = Vec::new();

		let mut jpeg = JpegMetadata::from_bytes(source)?;

		let timestamp = record.parsed_timestamp();
		if let (Some(raw), None) = (record.timestamp(), &timestamp) {
			warnings.push(format!(
				"{}: unrecognised timestamp '{raw}', capture time not written",
				record.filename()
			));
		}

		let fields = ExifFields::build(record, timestamp.as_ref(), self.camera.as_ref());
		let tiff = encode_exif(jpeg.exif_tiff().as_deref(), &fields)?;
		jpeg.replace_exif(tiff)?;

		let xmp_written = match &self.xmp {
			Some(xmp) => {
				match self.write_xmp(xmp, &mut jpeg, record, timestamp.as_ref(), &mut warnings) {
					Ok(()) => true,
					Err(e) => {
						warn!(filename = record.filename(), ?e, "Failed to write XMP packet");
						warnings.push(format!("{}: XMP not written: {e}", record.filename()));
						false
					}
				}
			}
			None => false,
		};

		Ok(EncodedImage {
			bytes: jpeg.into_bytes(),
			xmp_written,
			warnings,
		})
	}

	fn write_xmp(
		&self,
		xmp: &DjiXmp,
		jpeg: &mut JpegMetadata,
		record: &GeoRecord,
		timestamp: Option<&ExifTimestamp>,
		warnings: &mut Vec<String>,
	) -> Result<()> {
		let dewarp = self.dewarp(record, warnings);
		let properties = xmp.properties(record, timestamp, self.camera.as_ref(), dewarp.as_ref());

		jpeg.replace_xmp(&xmp.encode(&properties)?)
	}

	fn dewarp(&self, record: &GeoRecord, warnings: &mut Vec<String>) -> Option<DewarpData> {
		let camera = self.camera.as_ref()?;
		if camera.distortion.is_none() {
			debug!(camera = %camera.name, "Camera profile has no distortion, skipping dewarp data");
			return None;
		}

		camera
			.dewarp(self.run_date)
			.map_err(|e| {
				warn!(filename = record.filename(), ?e, "Failed to compute dewarp data");
				warnings.push(format!("{}: dewarp data not written: {e}", record.filename()));
			})
			.ok()
	}

	/// Reads `source`, rewrites its metadata and stores the result at `output`, creating the
	/// parent directory if needed. `output` may be `source` itself.
	pub fn write(
		&self,
		source: impl AsRef<Path>,
		record: &GeoRecord,
		output: impl AsRef<Path>,
	) -> Result<WriteReport> {
		let source = source.as_ref();
		let output = output.as_ref();

		let bytes = fs::read(source)
			.map_err(|e| FileIOError::from((source, e, "Failed to read source image")))?;

		let EncodedImage {
			bytes,
			xmp_written,
			warnings,
		} = self.encode(bytes, record)?;

		let parent = output
			.parent()
			.filter(|parent| !parent.as_os_str().is_empty())
			.unwrap_or_else(|| Path::new("."));
		fs::create_dir_all(parent)
			.map_err(|e| FileIOError::from((parent, e, "Failed to create output directory")))?;

		// Written next to the destination and renamed over it, so the old file stays whole
		// until the new one is complete
		let mut staged = NamedTempFile::new_in(parent)
			.map_err(|e| FileIOError::from((parent, e, "Failed to create temporary image")))?;
		let permissions = fs::metadata(source)
			.map_err(|e| FileIOError::from((source, e, "Failed to read source permissions")))?
			.permissions();
		staged
			.write_all(&bytes)
			.and_then(|()| staged.as_file().set_permissions(permissions))
			.and_then(|()| staged.as_file().sync_all())
			.map_err(|e| FileIOError::from((staged.path(), e, "Failed to write tagged image")))?;
		staged
			.persist(output)
			.map_err(|e| FileIOError::from((output, e.error, "Failed to write tagged image")))?;

		debug!(
			source = %source.display(),
			output = %output.display(),
			xmp_written,
			"Tagged image"
		);

		Ok(WriteReport {
			output: output.to_path_buf(),
			xmp_written,
			warnings,
		})
	}
}
