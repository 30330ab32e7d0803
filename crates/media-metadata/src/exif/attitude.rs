use exif::Rational;

use crate::{
	exif::consts::{CENTI_DENOMINATOR, DIRECTION_MAX},
	Error, Result,
};

/// Normalizes a bearing into `[0, 360)`.
///
/// Equivalent to repeatedly adding or subtracting 360 until the value lands in range.
/// `yaw` must be finite, [`Attitude::new`] guarantees that for recorded values.
///
/// # Examples
///
/// ```
/// use gt_media_metadata::exif::normalize_yaw;
///
/// assert_eq!(normalize_yaw(370.0), 10.0);
/// assert_eq!(normalize_yaw(-10.0), 350.0);
/// ```
#[must_use]
pub fn normalize_yaw(yaw: f64) -> f64 {
	let normalized = yaw.rem_euclid(DIRECTION_MAX);
	// rem_euclid can round up to exactly 360 for tiny negative inputs
	if normalized >= DIRECTION_MAX {
		0.0
	} else {
		normalized
	}
}

/// Aircraft attitude in degrees, with yaw already normalized to a bearing.
#[derive(Default, Clone, Copy, PartialEq, Debug, serde::Serialize, serde::Deserialize)]
pub struct Attitude {
	roll: f64,
	pitch: f64,
	yaw: f64,
}

impl Attitude {
	pub fn new(roll: f64, pitch: f64, yaw: f64) -> Result<Self> {
		for (name, value) in [("roll", roll), ("pitch", pitch), ("yaw", yaw)] {
			if !value.is_finite() {
				return Err(Error::NonFinite(name));
			}
		}

		Ok(Self {
			roll,
			pitch,
			yaw: normalize_yaw(yaw),
		})
	}

	#[inline]
	#[must_use]
	pub const fn roll(&self) -> f64 {
		self.roll
	}

	#[inline]
	#[must_use]
	pub const fn pitch(&self) -> f64 {
		self.pitch
	}

	#[inline]
	#[must_use]
	pub const fn yaw(&self) -> f64 {
		self.yaw
	}

	/// `GPSImgDirection`: yaw in hundredths of a degree, truncated.
	#[must_use]
	#[allow(
		clippy::as_conversions,
		clippy::cast_possible_truncation,
		clippy::cast_sign_loss
	)]
	pub fn direction_rational(&self) -> Rational {
		Rational {
			num: (self.yaw * f64::from(CENTI_DENOMINATOR)).trunc() as u32,
			denom: CENTI_DENOMINATOR,
		}
	}

	/// Free-text summary stored in the EXIF `UserComment`.
	///
	/// ```
	/// use gt_media_metadata::exif::Attitude;
	///
	/// let attitude = Attitude::new(15.24, -8.7, 405.0).unwrap();
	/// assert_eq!(attitude.summary(), "Roll=15.2,Pitch=-8.7,Yaw=45.0");
	/// ```
	#[must_use]
	pub fn summary(&self) -> String {
		format!(
			"Roll={:.1},Pitch={:.1},Yaw={:.1}",
			self.roll, self.pitch, self.yaw
		)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn normalized_yaw_stays_in_range() {
		for yaw in [
			-1080.0, -720.5, -360.0, -359.99, -10.0, -1e-18, 0.0, 0.5, 359.999, 360.0, 370.0,
			725.25, 1e6,
		] {
			let normalized = normalize_yaw(yaw);
			assert!(
				(0.0..360.0).contains(&normalized),
				"{yaw} normalized to {normalized}"
			);
		}

		assert_eq!(normalize_yaw(370.0), 10.0);
		assert_eq!(normalize_yaw(-10.0), 350.0);
		assert_eq!(normalize_yaw(360.0), 0.0);
	}

	#[test]
	fn non_finite_attitude_is_rejected() {
		assert!(matches!(
			Attitude::new(f64::NAN, 0.0, 0.0),
			Err(Error::NonFinite("roll"))
		));
		assert!(matches!(
			Attitude::new(0.0, 0.0, f64::NEG_INFINITY),
			Err(Error::NonFinite("yaw"))
		));
	}

	#[test]
	fn direction_is_normalized_yaw() {
		let attitude = Attitude::new(0.0, 0.0, -90.5).unwrap();
		let direction = attitude.direction_rational();

		assert_eq!(attitude.yaw(), 269.5);
		assert_eq!((direction.num, direction.denom), (26950, 100));
	}
}
