pub mod params;
pub mod upload;

pub use params::{clamp_params, normalize_text, validate_config};
pub use upload::{validate_upload, Upload};
