use exif::Rational;

use crate::exif::consts::{DMS_DIVISION, SECONDS_DENOMINATOR};

/// An unsigned angle split into whole degrees, whole minutes and hundredths of a second.
///
/// The sign of the original coordinate is not kept here, EXIF stores it separately in the
/// `GPSLatitudeRef`/`GPSLongitudeRef` tags.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Dms {
	pub degrees: u32,
	pub minutes: u32,
	pub centiseconds: u32,
}

impl Dms {
	/// Splits the absolute value of `decimal` into degrees, minutes and seconds.
	///
	/// Degrees and minutes are truncated, seconds keep two decimal digits (also truncated).
	///
	/// # Examples
	///
	/// ```
	/// use gt_media_metadata::exif::Dms;
	///
	/// let dms = Dms::from_decimal(-39.9042);
	/// assert_eq!((dms.degrees, dms.minutes, dms.centiseconds), (39, 54, 1512));
	/// ```
	#[must_use]
	#[allow(
		clippy::as_conversions,
		clippy::cast_possible_truncation,
		clippy::cast_sign_loss
	)]
	pub fn from_decimal(decimal: f64) -> Self {
		let absolute = decimal.abs();
		let degrees = absolute.trunc();
		let minutes_float = (absolute - degrees) * 60.0;
		let minutes = minutes_float.trunc();
		let seconds = (minutes_float - minutes) * 60.0;

		Self {
			degrees: degrees as u32,
			minutes: minutes as u32,
			centiseconds: (seconds * f64::from(SECONDS_DENOMINATOR)).trunc() as u32,
		}
	}

	/// The `(degrees, 1), (minutes, 1), (seconds * 100, 100)` triple stored in `GPSLatitude`
	/// and `GPSLongitude`.
	#[must_use]
	pub const fn to_rationals(self) -> [Rational; 3] {
		[
			Rational {
				num: self.degrees,
				denom: 1,
			},
			Rational {
				num: self.minutes,
				denom: 1,
			},
			Rational {
				num: self.centiseconds,
				denom: SECONDS_DENOMINATOR,
			},
		]
	}

	/// Recomposes the unsigned decimal value.
	#[must_use]
	pub fn to_decimal(self) -> f64 {
		[
			f64::from(self.degrees),
			f64::from(self.minutes),
			f64::from(self.centiseconds) / f64::from(SECONDS_DENOMINATOR),
		]
		.iter()
		.zip(DMS_DIVISION.iter())
		.map(|(x, y)| x / y)
		.sum()
	}
}

/// Converts decimal degrees to the EXIF rational triple, see [`Dms::from_decimal`].
#[must_use]
pub fn decimal_to_dms(decimal: f64) -> [Rational; 3] {
	Dms::from_decimal(decimal).to_rationals()
}

/// Recomposes an EXIF rational triple into unsigned decimal degrees.
///
/// Returns `None` if any denominator is zero.
#[must_use]
pub fn dms_to_decimal(dms: &[Rational; 3]) -> Option<f64> {
	dms.iter()
		.zip(DMS_DIVISION.iter())
		.map(|(rational, division)| {
			(rational.denom != 0)
				.then(|| f64::from(rational.num) / f64::from(rational.denom) / division)
		})
		.sum()
}
