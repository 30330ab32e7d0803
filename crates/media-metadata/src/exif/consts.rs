/// Used for converting DMS to decimal coordinates, and is the amount to divide by.
///
/// # Examples:
///
/// ```
/// use gt_media_metadata::exif::consts::DMS_DIVISION;
///
/// let latitude = [53.0, 19.0, 35.11]; // in DMS
/// let decimal: f64 = latitude.iter().zip(DMS_DIVISION.iter()).map(|(x, y)| x / y).sum();
/// assert!((decimal - 53.326_419).abs() < 1e-6);
/// ```
pub const DMS_DIVISION: [f64; 3] = [1.0, 60.0, 3600.0];

/// Seconds of arc are stored as a fixed-point rational with this denominator,
/// which keeps two decimal digits (one hundredth of a second).
pub const SECONDS_DENOMINATOR: u32 = 100;

/// Denominator used for both `GPSAltitude` and `GPSImgDirection`.
pub const CENTI_DENOMINATOR: u32 = 100;

/// Focal lengths are approximated with a rational whose denominator is at most this.
pub const FOCAL_LENGTH_DENOMINATOR: u32 = 1000;

/// The Earth's maximum latitude (can also be negative, depending on if you're North or South of the Equator).
pub const LAT_MAX_POS: f64 = 90.0;

/// The Earth's maximum longitude (can also be negative depending on if you're East or West of the Prime meridian).
///
/// The negative value of this is known as the anti-meridian, and when combined they make a 360 degree circle around the Earth.
pub const LONG_MAX_POS: f64 = 180.0;

/// A full turn; image directions are kept in `[0, DIRECTION_MAX)`.
pub const DIRECTION_MAX: f64 = 360.0;

/// `GPSVersionID` written alongside every position (EXIF 2.3).
pub const GPS_VERSION_ID: [u8; 4] = [2, 3, 0, 0];

/// `GPSImgDirectionRef` value for true north.
pub const TRUE_NORTH: &str = "T";

/// Width of a 35mm film frame, used for the 35mm-equivalent focal length.
pub const FILM_35MM_WIDTH: f64 = 35.0;

/// Character code that prefixes an ASCII `UserComment`.
pub const USER_COMMENT_ASCII: [u8; 8] = *b"ASCII\0\0\0";
