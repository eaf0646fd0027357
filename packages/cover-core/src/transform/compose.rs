use std::sync::Arc;

use image::imageops;
use image::{Rgba, RgbaImage};

use crate::config::CoverConfig;
use crate::errors::{CoverError, TransformError};
use crate::transform::decode::{ForegroundAsset, SourceImage};
use crate::transform::encode::{encode_cover, OutputBitmap};
use crate::transform::params::RenderParameters;
use crate::transform::text::TextRasterizer;
use crate::validation::{clamp_params, validate_config};

const TEXT_COLOR: Rgba<u8> = Rgba([255, 255, 255, 255]);

/// 背景・影・前景・テキスト2行を固定サイズのキャンバスに重ねる
#[derive(Clone)]
pub struct Compositor {
    config: Arc<CoverConfig>,
    foreground: Arc<ForegroundAsset>,
    text: Arc<dyn TextRasterizer>,
}

impl std::fmt::Debug for Compositor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Compositor")
            .field("config", &self.config)
            .field("foreground", &(self.foreground.width(), self.foreground.height()))
            .finish_non_exhaustive()
    }
}

impl Compositor {
    pub fn new(
        config: CoverConfig,
        foreground: ForegroundAsset,
        text: Arc<dyn TextRasterizer>,
    ) -> Result<Self, TransformError> {
        validate_config(&config)?;
        Ok(Self {
            config: Arc::new(config),
            foreground: Arc::new(foreground),
            text,
        })
    }

    pub fn config(&self) -> &Arc<CoverConfig> {
        &self.config
    }

    pub fn foreground(&self) -> &ForegroundAsset {
        &self.foreground
    }

    /// 合成して JPEG にエンコードする
    pub fn render(
        &self,
        source: &SourceImage,
        params: &RenderParameters,
    ) -> Result<OutputBitmap, CoverError> {
        let params = clamp_params(params, &self.config);
        let canvas = self.compose_clamped(source, &params);
        let output = encode_cover(&canvas, params.image_quality as u8)?;

        tracing::debug!(
            src_w = source.width(),
            src_h = source.height(),
            margin_top = params.foreground_margin_top,
            shadow = params.shadow_opacity,
            q = params.image_quality,
            size = output.bytes().len(),
            "cover rendered"
        );
        Ok(output)
    }

    /// エンコード前のキャンバスを返す
    pub fn compose(&self, source: &SourceImage, params: &RenderParameters) -> RgbaImage {
        let params = clamp_params(params, &self.config);
        self.compose_clamped(source, &params)
    }

    fn compose_clamped(&self, source: &SourceImage, params: &RenderParameters) -> RgbaImage {
        let config = &self.config;
        let mut canvas = RgbaImage::new(config.canvas_width, config.canvas_height);

        // 背景: 原点に等倍で描画し、はみ出した部分はキャンバスで切り取る
        imageops::replace(&mut canvas, source.pixels(), 0, 0);

        // 影
        fill_shadow(&mut canvas, params.shadow_opacity);

        // 前景: 水平中央揃え
        let foreground_x = centered_offset(config.canvas_width, self.foreground.width());
        let foreground_y = params.foreground_margin_top as i64;
        imageops::overlay(
            &mut canvas,
            self.foreground.pixels(),
            foreground_x,
            foreground_y,
        );

        // テキスト: 前景の下に text_margin 間隔で2行
        let text_top = params.foreground_margin_top as f32 + self.foreground.height() as f32;
        let margin = config.text_margin as f32;
        self.draw_centered_text(&mut canvas, &params.text_line1, text_top + margin);
        self.draw_centered_text(&mut canvas, &params.text_line2, text_top + margin * 2.0);

        canvas
    }

    fn draw_centered_text(&self, canvas: &mut RgbaImage, text: &str, baseline: f32) {
        if text.is_empty() {
            return;
        }
        let width = self.text.measure(text);
        let x = (self.config.canvas_width as f32 - width) / 2.0;
        self.text.draw(canvas, text, x, baseline, TEXT_COLOR);
    }
}

/// 幅 `inner` を幅 `outer` の中央に置いたときの左端（小数点以下は切り捨て）
fn centered_offset(outer: u32, inner: u32) -> i64 {
    (outer as i64 - inner as i64).div_euclid(2)
}

/// キャンバス全体に黒の半透明矩形を重ねる
///
/// source-over 合成: result = black * a + existing * (1 - a)
fn fill_shadow(canvas: &mut RgbaImage, opacity_percent: u32) {
    if opacity_percent == 0 {
        return;
    }
    let alpha = opacity_percent.min(100) as f32 / 100.0;
    let inv = 1.0 - alpha;

    for px in canvas.pixels_mut() {
        let dst_alpha = px[3] as f32 / 255.0;
        let out_alpha = alpha + dst_alpha * inv;
        for c in 0..3 {
            let value = px[c] as f32 * dst_alpha * inv / out_alpha;
            px[c] = value.round().clamp(0.0, 255.0) as u8;
        }
        px[3] = (out_alpha * 255.0).round() as u8;
    }
}
