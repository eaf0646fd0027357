//! テスト用のヘルパー

use std::io::Cursor;
use std::sync::Arc;
use std::time::Duration;

use cover_core::{Compositor, CoverConfig, ForegroundAsset, TextRasterizer};
use image::{DynamicImage, ImageFormat, Rgba, RgbaImage};

pub const TEST_FONT: &[u8] = include_bytes!("../../cover-core/fixtures/DejaVuSans.ttf");

/// 1文字を固定幅として計測し、何も描かないラスタライザ
pub struct FixedAdvance(pub f32);

impl TextRasterizer for FixedAdvance {
    fn measure(&self, text: &str) -> f32 {
        text.chars().count() as f32 * self.0
    }

    fn draw(&self, _canvas: &mut RgbaImage, _text: &str, _x: f32, _baseline: f32, _color: Rgba<u8>) {}
}

pub fn gradient(width: u32, height: u32) -> RgbaImage {
    RgbaImage::from_fn(width, height, |x, y| {
        Rgba([(x % 256) as u8, (y % 256) as u8, ((x * y) % 256) as u8, 255])
    })
}

pub fn png_bytes(width: u32, height: u32) -> Vec<u8> {
    let mut buf = Cursor::new(Vec::new());
    DynamicImage::ImageRgba8(gradient(width, height))
        .write_to(&mut buf, ImageFormat::Png)
        .unwrap();
    buf.into_inner()
}

pub fn test_config() -> CoverConfig {
    CoverConfig {
        render_delay: Duration::from_millis(10),
        ..CoverConfig::default()
    }
}

pub fn compositor() -> Compositor {
    let foreground = ForegroundAsset::new(RgbaImage::from_pixel(120, 60, Rgba([255, 0, 0, 255])));
    Compositor::new(test_config(), foreground, Arc::new(FixedAdvance(20.0))).unwrap()
}

pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}
