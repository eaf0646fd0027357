pub mod config;
pub mod constants;
pub mod errors;
pub mod transform;
pub mod validation;

// 公開API
pub use config::{CoverConfig, ParamRange};
pub use constants::{CANVAS_HEIGHT, CANVAS_WIDTH, DEFAULT_FILE_NAME, MAX_PIXELS, MAX_UPLOAD_BYTES};
pub use errors::{CoverError, DecodeError, TransformError, UploadError};
pub use transform::{
    decode_image, decode_source, encode_cover, Compositor, ForegroundAsset, GlyphRasterizer,
    OutputBitmap, RenderParameters, SourceImage, TextLines, TextRasterizer,
};
pub use validation::{clamp_params, normalize_text, validate_config, validate_upload, Upload};
