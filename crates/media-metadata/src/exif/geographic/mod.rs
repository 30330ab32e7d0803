mod dms;
mod location;

pub use dms::{decimal_to_dms, dms_to_decimal, Dms};
pub use location::GpsPosition;
