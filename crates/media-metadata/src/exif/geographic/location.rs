use crate::{
	exif::consts::{CENTI_DENOMINATOR, LAT_MAX_POS, LONG_MAX_POS},
	Error, Result,
};

use exif::Rational;
use std::ops::Neg;

use super::Dms;

/// A validated GPS fix, in decimal degrees and meters.
#[derive(Default, Clone, Copy, PartialEq, Debug, serde::Serialize, serde::Deserialize)]
pub struct GpsPosition {
	latitude: f64,
	longitude: f64,
	altitude: f64, // meters, negative below sea level
}

impl GpsPosition {
	/// Create a new [`GpsPosition`], rejecting non-finite values and coordinates outside of
	/// `[-90, 90]` / `[-180, 180]`.
	///
	/// # Examples
	///
	/// ```
	/// use gt_media_metadata::exif::GpsPosition;
	///
	/// let home = GpsPosition::new(39.9042, 116.4075, 100.0).unwrap();
	/// assert_eq!(home.coordinates(), (39.9042, 116.4075));
	///
	/// assert!(GpsPosition::new(95.0, 0.0, 0.0).is_err());
	/// ```
	pub fn new(latitude: f64, longitude: f64, altitude: f64) -> Result<Self> {
		Ok(Self {
			latitude: Self::check_coordinate(latitude, LAT_MAX_POS)
				.ok_or(Error::InvalidLatitude(latitude))?,
			longitude: Self::check_coordinate(longitude, LONG_MAX_POS)
				.ok_or(Error::InvalidLongitude(longitude))?,
			altitude: altitude
				.is_finite()
				.then_some(altitude)
				.ok_or(Error::NonFinite("altitude"))?,
		})
	}

	/// This returns the contained coordinates as `(latitude, longitude)`
	#[inline]
	#[must_use]
	pub const fn coordinates(&self) -> (f64, f64) {
		(self.latitude, self.longitude)
	}

	#[inline]
	#[must_use]
	pub const fn latitude(&self) -> f64 {
		self.latitude
	}

	#[inline]
	#[must_use]
	pub const fn longitude(&self) -> f64 {
		self.longitude
	}

	#[inline]
	#[must_use]
	pub const fn altitude(&self) -> f64 {
		self.altitude
	}

	/// `N` for the northern hemisphere (and the equator), `S` otherwise.
	#[must_use]
	pub fn latitude_ref(&self) -> &'static str {
		if self.latitude >= 0.0 {
			"N"
		} else {
			"S"
		}
	}

	/// `E` east of the prime meridian (and on it), `W` otherwise.
	#[must_use]
	pub fn longitude_ref(&self) -> &'static str {
		if self.longitude >= 0.0 {
			"E"
		} else {
			"W"
		}
	}

	#[must_use]
	pub fn latitude_dms(&self) -> Dms {
		Dms::from_decimal(self.latitude)
	}

	#[must_use]
	pub fn longitude_dms(&self) -> Dms {
		Dms::from_decimal(self.longitude)
	}

	/// `GPSAltitudeRef`: 1 below sea level, 0 otherwise.
	#[must_use]
	pub fn altitude_ref(&self) -> u8 {
		u8::from(self.altitude < 0.0)
	}

	/// `GPSAltitude`: the absolute altitude in centimeters over 100, truncated.
	#[must_use]
	#[allow(
		clippy::as_conversions,
		clippy::cast_possible_truncation,
		clippy::cast_sign_loss
	)]
	pub fn altitude_rational(&self) -> Rational {
		Rational {
			num: (self.altitude.abs() * f64::from(CENTI_DENOMINATOR)).trunc() as u32,
			denom: CENTI_DENOMINATOR,
		}
	}

	/// `max` must be positive, and it should be the maximum distance allowed (e.g. 180 degrees)
	fn check_coordinate(v: f64, max: f64) -> Option<f64> {
		(v.is_finite() && (max.neg()..=max).contains(&v)).then_some(v)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn hemisphere_references() {
		let beijing = GpsPosition::new(39.9042, 116.4075, 100.0).unwrap();
		assert_eq!((beijing.latitude_ref(), beijing.longitude_ref()), ("N", "E"));

		let santiago = GpsPosition::new(-33.4489, -70.6693, 570.0).unwrap();
		assert_eq!((santiago.latitude_ref(), santiago.longitude_ref()), ("S", "W"));

		let null_island = GpsPosition::new(0.0, 0.0, 0.0).unwrap();
		assert_eq!(
			(null_island.latitude_ref(), null_island.longitude_ref()),
			("N", "E")
		);
	}

	#[test]
	fn out_of_range_coordinates_are_rejected() {
		assert!(matches!(
			GpsPosition::new(90.5, 0.0, 0.0),
			Err(Error::InvalidLatitude(_))
		));
		assert!(matches!(
			GpsPosition::new(0.0, -180.5, 0.0),
			Err(Error::InvalidLongitude(_))
		));
		assert!(matches!(
			GpsPosition::new(f64::NAN, 0.0, 0.0),
			Err(Error::InvalidLatitude(_))
		));
		assert!(matches!(
			GpsPosition::new(0.0, 0.0, f64::INFINITY),
			Err(Error::NonFinite("altitude"))
		));
	}

	#[test]
	fn altitude_below_sea_level() {
		let dead_sea = GpsPosition::new(31.5, 35.5, -430.57).unwrap();
		let altitude = dead_sea.altitude_rational();

		assert_eq!(dead_sea.altitude_ref(), 1);
		assert_eq!((altitude.num, altitude.denom), (43057, 100));
	}
}
