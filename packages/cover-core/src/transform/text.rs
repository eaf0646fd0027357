use ab_glyph::{point, Font, FontArc, Glyph, GlyphId, PxScale, ScaleFont};
use image::{Rgba, RgbaImage};

use crate::errors::TransformError;

/// テキストの計測と描画
///
/// `draw` の `baseline` はアルファベットのベースライン位置。
pub trait TextRasterizer: Send + Sync {
    /// 描画時の送り幅（px）
    fn measure(&self, text: &str) -> f32;

    fn draw(&self, canvas: &mut RgbaImage, text: &str, x: f32, baseline: f32, color: Rgba<u8>);
}

/// ab_glyph によるアウトラインフォント描画
#[derive(Clone)]
pub struct GlyphRasterizer {
    font: FontArc,
    scale: PxScale,
}

impl std::fmt::Debug for GlyphRasterizer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GlyphRasterizer")
            .field("scale", &self.scale)
            .finish_non_exhaustive()
    }
}

impl GlyphRasterizer {
    /// TTF/OTF バイト列からフォントを読み込む
    ///
    /// `em_px` は em の大きさ（CSS の font-size と同じ意味）。
    pub fn from_bytes(data: Vec<u8>, em_px: f32) -> Result<Self, TransformError> {
        let font = FontArc::try_from_vec(data)
            .map_err(|e| TransformError::InvalidFont(format!("failed to parse font: {e}")))?;
        Ok(Self::new(font, em_px))
    }

    pub fn new(font: FontArc, em_px: f32) -> Self {
        // PxScale は ascent - descent の高さなので em サイズから換算する
        let scale = match font.units_per_em() {
            Some(units_per_em) => PxScale::from(em_px * font.height_unscaled() / units_per_em),
            None => PxScale::from(em_px),
        };
        Self { font, scale }
    }

    /// カーニング込みでグリフを配置する
    fn layout(&self, text: &str, x: f32, baseline: f32) -> (Vec<Glyph>, f32) {
        let scaled = self.font.as_scaled(self.scale);
        let mut glyphs = Vec::with_capacity(text.len());
        let mut caret = x;
        let mut previous: Option<GlyphId> = None;

        for ch in text.chars() {
            let id = scaled.glyph_id(ch);
            if let Some(prev) = previous {
                caret += scaled.kern(prev, id);
            }
            glyphs.push(id.with_scale_and_position(self.scale, point(caret, baseline)));
            caret += scaled.h_advance(id);
            previous = Some(id);
        }

        (glyphs, caret - x)
    }
}

impl TextRasterizer for GlyphRasterizer {
    fn measure(&self, text: &str) -> f32 {
        self.layout(text, 0.0, 0.0).1
    }

    fn draw(&self, canvas: &mut RgbaImage, text: &str, x: f32, baseline: f32, color: Rgba<u8>) {
        let (glyphs, _) = self.layout(text, x, baseline);
        let (width, height) = (canvas.width() as i64, canvas.height() as i64);

        for glyph in glyphs {
            let Some(outlined) = self.font.outline_glyph(glyph) else {
                continue;
            };
            let bounds = outlined.px_bounds();
            outlined.draw(|gx, gy, coverage| {
                let px = bounds.min.x as i64 + gx as i64;
                let py = bounds.min.y as i64 + gy as i64;
                if px < 0 || py < 0 || px >= width || py >= height {
                    return;
                }
                blend_coverage(canvas.get_pixel_mut(px as u32, py as u32), color, coverage);
            });
        }
    }
}

/// グリフのカバレッジを不透明色として合成する
pub(crate) fn blend_coverage(dst: &mut Rgba<u8>, color: Rgba<u8>, coverage: f32) {
    let alpha = coverage.clamp(0.0, 1.0) * (color[3] as f32 / 255.0);
    if alpha <= 0.0 {
        return;
    }
    let inv = 1.0 - alpha;
    let dst_alpha = dst[3] as f32 / 255.0;
    let out_alpha = alpha + dst_alpha * inv;

    for c in 0..3 {
        let value = (color[c] as f32 * alpha + dst[c] as f32 * dst_alpha * inv) / out_alpha;
        dst[c] = value.round().clamp(0.0, 255.0) as u8;
    }
    dst[3] = (out_alpha * 255.0).round() as u8;
}
