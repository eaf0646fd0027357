mod types;

pub use types::{CoverError, DecodeError, TransformError, UploadError};
