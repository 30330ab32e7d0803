use gt_utils::error::FileIOError;

#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error(transparent)]
	FileIO(#[from] FileIOError),
	#[error("error from the exif crate: {0}")]
	Exif(#[from] exif::Error),
	#[error("the image is not a readable JPEG: {0}")]
	Jpeg(#[from] img_parts::Error),
	#[error("there was an error while reading the camera profile: {0}")]
	CameraProfile(#[from] quick_xml::de::DeError),
	#[error("there was an error while writing the xmp packet: {0}")]
	Xmp(#[from] quick_xml::Error),
	#[error("invalid latitude: {0} (must be -90 to 90)")]
	InvalidLatitude(f64),
	#[error("invalid longitude: {0} (must be -180 to 180)")]
	InvalidLongitude(f64),
	#[error("{0} must be a finite number")]
	NonFinite(&'static str),
	#[error("invalid value for camera profile field {field}: '{value}'")]
	CameraProfileValue { field: &'static str, value: String },
	#[error("the camera profile has no {0}, dewarp data cannot be computed")]
	IncompleteCameraProfile(&'static str),
	#[error("metadata segment of {0} bytes does not fit in a JPEG APP1 segment")]
	SegmentTooLarge(usize),
}

pub type Result<T> = std::result::Result<T, Error>;
