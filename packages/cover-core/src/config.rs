use std::time::Duration;

use crate::constants::{
    CANVAS_HEIGHT, CANVAS_WIDTH, DEFAULT_FILE_NAME, MAX_TEXT_CHARS, MAX_TEXT_LINES,
    MAX_UPLOAD_BYTES,
};

/// 整数パラメータの範囲とデフォルト値
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParamRange {
    pub min: u32,
    pub max: u32,
    pub default: u32,
}

impl ParamRange {
    pub const fn new(min: u32, max: u32, default: u32) -> Self {
        Self { min, max, default }
    }

    /// 範囲外の値は最も近い境界に丸める
    pub fn clamp(&self, value: i64) -> u32 {
        value.max(self.min as i64).min(self.max as i64) as u32
    }

    pub fn contains(&self, value: u32) -> bool {
        (self.min..=self.max).contains(&value)
    }
}

/// カバー生成の設定
///
/// テンプレートの定数はすべてここに集約し、起動時に一度だけ構築して
/// 明示的に受け渡す。
#[derive(Debug, Clone, PartialEq)]
pub struct CoverConfig {
    pub canvas_width: u32,
    pub canvas_height: u32,
    /// 前景画像のキャンバス上端からのオフセット（px）
    pub foreground_margin_top: ParamRange,
    /// 影の不透明度（%）
    pub shadow_opacity: ParamRange,
    /// JPEG 品質（%）
    pub image_quality: ParamRange,
    /// 前景画像とテキスト、およびテキスト行同士の間隔（px）
    pub text_margin: u32,
    /// フォントの em サイズ（px）
    pub font_size_px: f32,
    pub max_text_chars: usize,
    pub max_text_lines: usize,
    /// パラメータ変更から再描画までの遅延
    pub render_delay: Duration,
    pub download_file_name: String,
    pub max_upload_bytes: u64,
}

impl Default for CoverConfig {
    fn default() -> Self {
        Self {
            canvas_width: CANVAS_WIDTH,
            canvas_height: CANVAS_HEIGHT,
            foreground_margin_top: ParamRange::new(100, 450, 250),
            shadow_opacity: ParamRange::new(0, 100, 30),
            image_quality: ParamRange::new(50, 100, 100),
            text_margin: 50,
            font_size_px: 40.0,
            max_text_chars: MAX_TEXT_CHARS,
            max_text_lines: MAX_TEXT_LINES,
            render_delay: Duration::from_millis(300),
            download_file_name: DEFAULT_FILE_NAME.to_string(),
            max_upload_bytes: MAX_UPLOAD_BYTES,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_param_range_clamp() {
        let range = ParamRange::new(100, 450, 250);
        assert_eq!(range.clamp(250), 250);
        assert_eq!(range.clamp(99), 100);
        assert_eq!(range.clamp(-5), 100);
        assert_eq!(range.clamp(451), 450);
        assert_eq!(range.clamp(i64::MAX), 450);
    }

    #[test]
    fn test_default_config() {
        let config = CoverConfig::default();
        assert_eq!((config.canvas_width, config.canvas_height), (1200, 700));
        assert_eq!(config.foreground_margin_top.default, 250);
        assert_eq!(config.shadow_opacity.default, 30);
        assert_eq!(config.image_quality.default, 100);
        assert_eq!(config.render_delay, Duration::from_millis(300));
        assert_eq!(config.download_file_name, "cover.jpg");
    }
}
