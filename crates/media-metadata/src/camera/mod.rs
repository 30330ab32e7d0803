//! Camera calibration profiles (`.opt` files) and the values derived from them.

mod dewarp;
mod profile;

pub use dewarp::DewarpData;
pub use profile::{list_opt_files, CameraProfile, Distortion, ImageDimensions, LensInfo, PrincipalPoint};
