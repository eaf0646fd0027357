use std::io::Cursor;

use image::{DynamicImage, ImageFormat, ImageReader, RgbaImage};

use crate::constants::MAX_PIXELS;
use crate::errors::DecodeError;

/// デコード済みの背景画像
///
/// 選択ごとに一度だけデコードし、以後は変更しない。
#[derive(Debug, Clone, PartialEq)]
pub struct SourceImage {
    pixels: RgbaImage,
    format: Option<ImageFormat>,
}

impl SourceImage {
    pub fn new(pixels: RgbaImage) -> Self {
        Self {
            pixels,
            format: None,
        }
    }

    pub fn width(&self) -> u32 {
        self.pixels.width()
    }

    pub fn height(&self) -> u32 {
        self.pixels.height()
    }

    pub fn pixels(&self) -> &RgbaImage {
        &self.pixels
    }

    /// 入力ファイルのフォーマット（バイト列からデコードした場合のみ）
    pub fn format(&self) -> Option<ImageFormat> {
        self.format
    }
}

/// 全カバー共通の前景画像
#[derive(Debug, Clone, PartialEq)]
pub struct ForegroundAsset {
    pixels: RgbaImage,
}

impl ForegroundAsset {
    pub fn new(pixels: RgbaImage) -> Self {
        Self { pixels }
    }

    /// バンドルされた PNG/JPEG から前景画像を作成する
    pub fn from_bytes(data: &[u8]) -> Result<Self, DecodeError> {
        let (img, _) = decode_image(data)?;
        Ok(Self::new(img.into_rgba8()))
    }

    pub fn width(&self) -> u32 {
        self.pixels.width()
    }

    pub fn height(&self) -> u32 {
        self.pixels.height()
    }

    pub fn pixels(&self) -> &RgbaImage {
        &self.pixels
    }
}

/// ユーザーが選択した画像をデコードする
pub fn decode_source(data: &[u8]) -> Result<SourceImage, DecodeError> {
    let (img, format) = decode_image(data)?;
    Ok(SourceImage {
        pixels: img.into_rgba8(),
        format: Some(format),
    })
}

/// 画像バイト列をデコードし、DynamicImage と検出したフォーマットを返す
///
/// フォーマットは拡張子や MIME ではなく内容から判定する。PNG と JPEG 以外は拒否。
pub fn decode_image(data: &[u8]) -> Result<(DynamicImage, ImageFormat), DecodeError> {
    let reader = ImageReader::new(Cursor::new(data))
        .with_guessed_format()
        .map_err(|e| DecodeError::Malformed(format!("failed to guess format: {e}")))?;

    let format = match reader.format() {
        Some(format @ (ImageFormat::Png | ImageFormat::Jpeg)) => format,
        Some(other) => {
            return Err(DecodeError::UnsupportedFormat(format!("{other:?}")));
        }
        None => {
            return Err(DecodeError::UnsupportedFormat("unknown".to_string()));
        }
    };

    let img = reader
        .decode()
        .map_err(|e| DecodeError::Malformed(format!("decode failed: {e}")))?;

    validate_source_dimensions(img.width(), img.height())?;

    Ok((img, format))
}

/// 総ピクセル数を検証し、メモリ枯渇を防ぐ
fn validate_source_dimensions(width: u32, height: u32) -> Result<(), DecodeError> {
    let total_pixels = width as u64 * height as u64;
    if total_pixels > MAX_PIXELS {
        return Err(DecodeError::ResolutionTooLarge { width, height });
    }
    Ok(())
}
