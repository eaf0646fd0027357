use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use bytes::Bytes;
use image::codecs::jpeg::JpegEncoder;
use image::{RgbImage, RgbaImage};
use std::io::Cursor;

use crate::errors::TransformError;

const JPEG_CONTENT_TYPE: &str = "image/jpeg";

/// エンコード済みのカバー画像
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputBitmap {
    bytes: Bytes,
    width: u32,
    height: u32,
    quality: u8,
}

impl OutputBitmap {
    pub fn bytes(&self) -> &Bytes {
        &self.bytes
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn quality(&self) -> u8 {
        self.quality
    }

    /// Content-Type を取得
    pub fn content_type(&self) -> &'static str {
        JPEG_CONTENT_TYPE
    }

    /// `data:image/jpeg;base64,...` 形式の data URL
    pub fn to_data_url(&self) -> String {
        format!("data:{};base64,{}", JPEG_CONTENT_TYPE, BASE64.encode(&self.bytes))
    }
}

/// キャンバスを JPEG にエンコードする
///
/// JPEG はアルファを持たないため、黒の下地に合成してからエンコードする。
pub fn encode_cover(canvas: &RgbaImage, quality: u8) -> Result<OutputBitmap, TransformError> {
    let flattened = flatten_on_black(canvas);
    let mut buf = Cursor::new(Vec::new());

    let encoder = JpegEncoder::new_with_quality(&mut buf, quality);
    flattened
        .write_with_encoder(encoder)
        .map_err(|e| TransformError::EncodeFailed(format!("JPEG encode failed: {e}")))?;

    Ok(OutputBitmap {
        bytes: Bytes::from(buf.into_inner()),
        width: canvas.width(),
        height: canvas.height(),
        quality,
    })
}

fn flatten_on_black(canvas: &RgbaImage) -> RgbImage {
    RgbImage::from_fn(canvas.width(), canvas.height(), |x, y| {
        let [r, g, b, a] = canvas.get_pixel(x, y).0;
        let scale = |c: u8| ((c as u16 * a as u16 + 127) / 255) as u8;
        image::Rgb([scale(r), scale(g), scale(b)])
    })
}
