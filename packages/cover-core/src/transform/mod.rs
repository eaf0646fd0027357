pub mod compose;
pub mod decode;
pub mod encode;
pub mod params;
pub mod text;

pub use compose::Compositor;
pub use decode::{decode_image, decode_source, ForegroundAsset, SourceImage};
pub use encode::{encode_cover, OutputBitmap};
pub use params::{RenderParameters, TextLines};
pub use text::{GlyphRasterizer, TextRasterizer};
