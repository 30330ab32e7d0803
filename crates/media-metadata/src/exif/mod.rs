mod attitude;
pub mod consts;
mod datetime;
mod fields;
mod geographic;

pub use attitude::{normalize_yaw, Attitude};
pub use datetime::{normalize_timestamp, ExifTimestamp, TIMESTAMP_PATTERNS};
pub use fields::{encode_exif, ExifFields};
pub use geographic::{decimal_to_dms, dms_to_decimal, Dms, GpsPosition};
