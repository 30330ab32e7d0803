use std::{
	fs,
	path::{Path, PathBuf},
	str::FromStr,
};

use exif::Rational;
use gt_utils::error::FileIOError;
use serde::Deserialize;
use tracing::debug;

use crate::{
	exif::consts::{FILM_35MM_WIDTH, FOCAL_LENGTH_DENOMINATOR},
	Error, Result,
};

const UNKNOWN_CAMERA: &str = "Unknown";
const OPT_EXTENSION: &str = "opt";

#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
pub struct ImageDimensions {
	pub width: u32,
	pub height: u32,
}

/// Brown-Conrady lens distortion, as stored in the profile.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize)]
pub struct Distortion {
	pub k1: f64,
	pub k2: f64,
	pub k3: f64,
	pub p1: f64,
	pub p2: f64,
	/// The coefficients model the direct (undistorted to distorted) mapping.
	pub direct: bool,
}

impl Default for Distortion {
	fn default() -> Self {
		Self {
			k1: 0.0,
			k2: 0.0,
			k3: 0.0,
			p1: 0.0,
			p2: 0.0,
			direct: true,
		}
	}
}

/// In pixels.
#[derive(Debug, Default, Clone, Copy, PartialEq, serde::Serialize)]
pub struct PrincipalPoint {
	pub x: f64,
	pub y: f64,
}

#[derive(Debug, Default, Clone, PartialEq, Eq, serde::Serialize)]
pub struct LensInfo {
	pub make: String,
	pub model: String,
	pub lens_model: String,
}

/// A camera calibration, loaded once per run and shared by every record.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct CameraProfile {
	pub name: String,
	pub dimensions: Option<ImageDimensions>,
	/// Sensor width in mm, `0` when unknown.
	pub sensor_size: f64,
	/// In mm, `0` when unknown.
	pub focal_length: f64,
	pub distortion: Option<Distortion>,
	pub principal_point: Option<PrincipalPoint>,
	pub lens: Option<LensInfo>,
}

impl Default for CameraProfile {
	fn default() -> Self {
		Self {
			name: UNKNOWN_CAMERA.to_string(),
			dimensions: None,
			sensor_size: 0.0,
			focal_length: 0.0,
			distortion: None,
			principal_point: None,
			lens: None,
		}
	}
}

impl CameraProfile {
	pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
		let path = path.as_ref();
		let xml = fs::read_to_string(path)
			.map_err(|e| FileIOError::from((path, e, "Failed to read camera profile")))?;

		let profile = Self::from_xml_str(&xml)?;
		debug!(name = %profile.name, path = %path.display(), "Loaded camera profile");

		Ok(profile)
	}

	/// Parses the XML body of an `.opt` file. The root element's name doesn't matter.
	///
	/// ```
	/// use gt_media_metadata::CameraProfile;
	///
	/// let profile = CameraProfile::from_xml_str(
	/// 	"<Camera><FocalLength>8.8</FocalLength><SensorSize>6.3</SensorSize></Camera>",
	/// )
	/// .unwrap();
	///
	/// assert_eq!(profile.name, "Unknown");
	/// assert_eq!(profile.focal_length_35mm(), Some(49));
	/// ```
	pub fn from_xml_str(xml: &str) -> Result<Self> {
		quick_xml::de::from_str::<RawProfile>(xml)?.try_into()
	}

	/// `FocalLengthIn35mmFilm`: `focal * 35 / sensor`, rounded.
	///
	/// Only available when both the sensor size and the focal length are known.
	#[must_use]
	#[allow(
		clippy::as_conversions,
		clippy::cast_possible_truncation,
		clippy::cast_sign_loss
	)]
	pub fn focal_length_35mm(&self) -> Option<u16> {
		if !(self.sensor_size > 0.0 && self.focal_length > 0.0) {
			return None;
		}

		let equivalent = (self.focal_length * FILM_35MM_WIDTH / self.sensor_size).round();
		(equivalent.is_finite() && equivalent <= f64::from(u16::MAX)).then_some(equivalent as u16)
	}

	/// The closest rational to the focal length whose denominator doesn't exceed 1000.
	#[must_use]
	#[allow(
		clippy::as_conversions,
		clippy::cast_possible_truncation,
		clippy::cast_sign_loss
	)]
	pub fn focal_length_rational(&self) -> Option<Rational> {
		let focal = self.focal_length;
		if !(focal.is_finite() && focal > 0.0 && focal < f64::from(u32::MAX / FOCAL_LENGTH_DENOMINATOR))
		{
			return None;
		}

		let mut best = Rational {
			num: focal.round() as u32,
			denom: 1,
		};
		let mut best_error = (focal - focal.round()).abs();

		for denom in 2..=FOCAL_LENGTH_DENOMINATOR {
			let num = (focal * f64::from(denom)).round();
			let error = (focal - num / f64::from(denom)).abs();
			if error < best_error {
				best = Rational {
					num: num as u32,
					denom,
				};
				best_error = error;
			}
		}

		(best.num != 0).then_some(best)
	}
}

/// Lists the `.opt` files directly inside `dir`, sorted by path.
///
/// A missing directory simply has no profiles.
pub fn list_opt_files(dir: impl AsRef<Path>) -> Result<Vec<PathBuf>> {
	let dir = dir.as_ref();
	if !dir.is_dir() {
		return Ok(vec![]);
	}

	let mut files = fs::read_dir(dir)
		.map_err(|e| FileIOError::from((dir, e, "Failed to list camera profiles")))?
		.filter_map(|entry| entry.ok().map(|entry| entry.path()))
		.filter(|path| {
			path.is_file()
				&& path
					.extension()
					.and_then(|ext| ext.to_str())
					.is_some_and(|ext| ext.eq_ignore_ascii_case(OPT_EXTENSION))
		})
		.collect::<Vec<_>>();

	files.sort();

	Ok(files)
}

/// The document as quick-xml sees it; every value stays textual until validated.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawProfile {
	#[serde(rename = "Name")]
	name: Option<String>,
	#[serde(rename = "ImageDimensions")]
	image_dimensions: Option<RawDimensions>,
	#[serde(rename = "SensorSize")]
	sensor_size: Option<String>,
	#[serde(rename = "FocalLength")]
	focal_length: Option<String>,
	#[serde(rename = "Distortion")]
	distortion: Option<RawDistortion>,
	#[serde(rename = "PrincipalPoint")]
	principal_point: Option<RawPrincipalPoint>,
	#[serde(rename = "Exif")]
	exif: Option<RawLens>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawDimensions {
	#[serde(rename = "Width")]
	width: Option<String>,
	#[serde(rename = "Height")]
	height: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawDistortion {
	#[serde(rename = "K1")]
	k1: Option<String>,
	#[serde(rename = "K2")]
	k2: Option<String>,
	#[serde(rename = "K3")]
	k3: Option<String>,
	#[serde(rename = "P1")]
	p1: Option<String>,
	#[serde(rename = "P2")]
	p2: Option<String>,
	#[serde(rename = "Direct")]
	direct: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawPrincipalPoint {
	#[serde(rename = "X")]
	x: Option<String>,
	#[serde(rename = "Y")]
	y: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawLens {
	#[serde(rename = "Make")]
	make: Option<String>,
	#[serde(rename = "Model")]
	model: Option<String>,
	#[serde(rename = "LensModel")]
	lens_model: Option<String>,
}

/// Blank values count as missing.
fn text(value: Option<String>) -> Option<String> {
	value
		.map(|v| v.trim().to_string())
		.filter(|v| !v.is_empty())
}

fn parse_value<T: FromStr>(field: &'static str, value: Option<String>) -> Result<Option<T>> {
	text(value)
		.map(|v| {
			v.parse()
				.map_err(|_| Error::CameraProfileValue { field, value: v })
		})
		.transpose()
}

fn parse_finite(field: &'static str, value: Option<String>) -> Result<f64> {
	match parse_value::<f64>(field, value)? {
		Some(v) if !v.is_finite() => Err(Error::CameraProfileValue {
			field,
			value: v.to_string(),
		}),
		v => Ok(v.unwrap_or(0.0)),
	}
}

fn required<T: FromStr>(field: &'static str, value: Option<String>) -> Result<T> {
	parse_value(field, value)?.ok_or(Error::CameraProfileValue {
		field,
		value: String::new(),
	})
}

impl TryFrom<RawProfile> for CameraProfile {
	type Error = Error;

	fn try_from(raw: RawProfile) -> Result<Self> {
		let dimensions = raw
			.image_dimensions
			.map(|dims| {
				Ok::<_, Error>(ImageDimensions {
					width: required("ImageDimensions/Width", dims.width)?,
					height: required("ImageDimensions/Height", dims.height)?,
				})
			})
			.transpose()?;

		let distortion = raw
			.distortion
			.map(|d| {
				Ok::<_, Error>(Distortion {
					k1: parse_finite("Distortion/K1", d.k1)?,
					k2: parse_finite("Distortion/K2", d.k2)?,
					k3: parse_finite("Distortion/K3", d.k3)?,
					p1: parse_finite("Distortion/P1", d.p1)?,
					p2: parse_finite("Distortion/P2", d.p2)?,
					direct: text(d.direct).map_or(true, |v| v.to_lowercase() == "true"),
				})
			})
			.transpose()?;

		let principal_point = raw
			.principal_point
			.map(|p| {
				Ok::<_, Error>(PrincipalPoint {
					x: parse_finite("PrincipalPoint/X", p.x)?,
					y: parse_finite("PrincipalPoint/Y", p.y)?,
				})
			})
			.transpose()?;

		Ok(Self {
			name: text(raw.name).unwrap_or_else(|| UNKNOWN_CAMERA.to_string()),
			dimensions,
			sensor_size: parse_finite("SensorSize", raw.sensor_size)?,
			focal_length: parse_finite("FocalLength", raw.focal_length)?,
			distortion,
			principal_point,
			lens: raw.exif.map(|lens| LensInfo {
				make: text(lens.make).unwrap_or_default(),
				model: text(lens.model).unwrap_or_default(),
				lens_model: text(lens.lens_model).unwrap_or_default(),
			}),
		})
	}
}
