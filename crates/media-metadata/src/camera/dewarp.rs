use std::fmt::Display;

use chrono::NaiveDate;

use crate::{Error, Result};

use super::CameraProfile;

/// DJI's lens correction parameters, with coefficients normalized by the focal length.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize)]
pub struct DewarpData {
	pub date: NaiveDate,
	pub fx: f64,
	pub fy: f64,
	/// Principal point offset from the image center, in focal lengths.
	pub cx: f64,
	pub cy: f64,
	pub k1: f64,
	pub k2: f64,
	pub p1: f64,
	pub p2: f64,
	pub k3: f64,
	/// Optical center in pixels, as found in the profile.
	pub optical_center: (f64, f64),
}

/// `date;fx;fy;cx;cy;k1;k2;p1;p2;k3`, the `drone-dji:DewarpData` layout.
impl Display for DewarpData {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		write!(
			f,
			"{};{};{};{};{};{};{};{};{};{}",
			self.date.format("%Y-%m-%d"),
			self.fx,
			self.fy,
			self.cx,
			self.cy,
			self.k1,
			self.k2,
			self.p1,
			self.p2,
			self.k3
		)
	}
}

impl CameraProfile {
	/// Converts the profile's distortion into [`DewarpData`] stamped with `date`.
	///
	/// Needs the image dimensions, the principal point, the distortion and a focal length.
	pub fn dewarp(&self, date: NaiveDate) -> Result<DewarpData> {
		let dimensions = self
			.dimensions
			.ok_or(Error::IncompleteCameraProfile("image dimensions"))?;
		let principal_point = self
			.principal_point
			.ok_or(Error::IncompleteCameraProfile("principal point"))?;
		let distortion = self
			.distortion
			.ok_or(Error::IncompleteCameraProfile("distortion"))?;
		if !(self.focal_length > 0.0) {
			return Err(Error::IncompleteCameraProfile("focal length"));
		}

		let focal = self.focal_length;
		let width = f64::from(dimensions.width);
		let height = f64::from(dimensions.height);
		let n = width.max(height) / focal;

		// DJI expects the inverse model
		let sign = if distortion.direct { -1.0 } else { 1.0 };

		Ok(DewarpData {
			date,
			fx: focal,
			fy: focal,
			cx: (principal_point.x - width / 2.0) / focal,
			cy: (principal_point.y - height / 2.0) / focal,
			k1: sign * distortion.k1 * n.powi(2),
			k2: sign * distortion.k2 * n.powi(4),
			p1: sign * distortion.p1 * n.powi(2),
			p2: sign * distortion.p2 * n.powi(2),
			k3: sign * distortion.k3 * n.powi(6),
			optical_center: (principal_point.x, principal_point.y),
		})
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::camera::{Distortion, ImageDimensions, PrincipalPoint};

	fn profile(direct: bool) -> CameraProfile {
		CameraProfile {
			focal_length: 4.0,
			dimensions: Some(ImageDimensions {
				width: 8,
				height: 6,
			}),
			principal_point: Some(PrincipalPoint { x: 5.0, y: 2.0 }),
			distortion: Some(Distortion {
				k1: 1.0,
				k2: 1.0,
				k3: 1.0,
				p1: 0.5,
				p2: -0.5,
				direct,
			}),
			..CameraProfile::default()
		}
	}

	fn date() -> NaiveDate {
		NaiveDate::from_ymd_opt(2024, 8, 18).unwrap()
	}

	#[test]
	fn normalizes_by_the_long_side() {
		// n = 8 / 4 = 2
		let dewarp = profile(false).dewarp(date()).unwrap();

		assert_eq!((dewarp.cx, dewarp.cy), (0.25, -0.25));
		assert_eq!((dewarp.k1, dewarp.k2, dewarp.k3), (4.0, 16.0, 64.0));
		assert_eq!((dewarp.p1, dewarp.p2), (2.0, -2.0));
		assert_eq!(dewarp.optical_center, (5.0, 2.0));
	}

	#[test]
	fn direct_model_is_negated() {
		let dewarp = profile(true).dewarp(date()).unwrap();

		assert_eq!((dewarp.k1, dewarp.k2, dewarp.k3), (-4.0, -16.0, -64.0));
		assert_eq!((dewarp.p1, dewarp.p2), (-2.0, 2.0));
		assert_eq!(dewarp.cx, 0.25);
	}

	#[test]
	fn renders_dji_layout() {
		assert_eq!(
			profile(false).dewarp(date()).unwrap().to_string(),
			"2024-08-18;4;4;0.25;-0.25;4;16;2;-2;64"
		);
	}

	#[test]
	fn incomplete_profiles_are_reported() {
		let no_dimensions = CameraProfile {
			dimensions: None,
			..profile(true)
		};
		assert!(matches!(
			no_dimensions.dewarp(date()),
			Err(Error::IncompleteCameraProfile("image dimensions"))
		));

		let no_focal = CameraProfile {
			focal_length: 0.0,
			..profile(true)
		};
		assert!(matches!(
			no_focal.dewarp(date()),
			Err(Error::IncompleteCameraProfile("focal length"))
		));
	}
}
