use crate::config::CoverConfig;
use crate::validation::normalize_text;

/// 2行テキスト入力を正規化した結果
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TextLines {
    lines: Vec<String>,
}

impl TextLines {
    /// 複数行の入力を行数・文字数の上限で切り詰める
    pub fn from_input(raw: &str, config: &CoverConfig) -> Self {
        Self {
            lines: normalize_text(raw, config.max_text_chars, config.max_text_lines),
        }
    }

    pub fn line1(&self) -> &str {
        self.lines.first().map(String::as_str).unwrap_or_default()
    }

    pub fn line2(&self) -> &str {
        self.lines.get(1).map(String::as_str).unwrap_or_default()
    }

    /// 入力欄に書き戻すテキスト
    pub fn to_input(&self) -> String {
        self.lines.join("\n")
    }
}

/// 描画パラメータ
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderParameters {
    pub text_line1: String,
    pub text_line2: String,
    pub foreground_margin_top: u32,
    pub shadow_opacity: u32,
    pub image_quality: u32,
}

impl RenderParameters {
    /// デフォルトパラメータを作成
    pub fn new(config: &CoverConfig) -> Self {
        Self {
            text_line1: String::new(),
            text_line2: String::new(),
            foreground_margin_top: config.foreground_margin_top.default,
            shadow_opacity: config.shadow_opacity.default,
            image_quality: config.image_quality.default,
        }
    }

    pub fn set_text(&mut self, lines: &TextLines) {
        self.text_line1 = lines.line1().to_string();
        self.text_line2 = lines.line2().to_string();
    }

    pub fn set_foreground_margin_top(&mut self, value: i64, config: &CoverConfig) {
        self.foreground_margin_top = config.foreground_margin_top.clamp(value);
    }

    pub fn set_shadow_opacity(&mut self, value: i64, config: &CoverConfig) {
        self.shadow_opacity = config.shadow_opacity.clamp(value);
    }

    pub fn set_image_quality(&mut self, value: i64, config: &CoverConfig) {
        self.image_quality = config.image_quality.clamp(value);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_parameters_defaults() {
        let config = CoverConfig::default();
        let params = RenderParameters::new(&config);
        assert_eq!(params.foreground_margin_top, 250);
        assert_eq!(params.shadow_opacity, 30);
        assert_eq!(params.image_quality, 100);
        assert!(params.text_line1.is_empty());
        assert!(params.text_line2.is_empty());
    }

    #[test]
    fn test_setters_clamp() {
        let config = CoverConfig::default();
        let mut params = RenderParameters::new(&config);

        params.set_foreground_margin_top(10, &config);
        assert_eq!(params.foreground_margin_top, 100);
        params.set_foreground_margin_top(1000, &config);
        assert_eq!(params.foreground_margin_top, 450);

        params.set_shadow_opacity(-20, &config);
        assert_eq!(params.shadow_opacity, 0);
        params.set_shadow_opacity(70, &config);
        assert_eq!(params.shadow_opacity, 70);

        params.set_image_quality(10, &config);
        assert_eq!(params.image_quality, 50);
        params.set_image_quality(101, &config);
        assert_eq!(params.image_quality, 100);
    }

    #[test]
    fn test_text_lines_from_input() {
        let config = CoverConfig::default();
        let lines = TextLines::from_input("HELLO\nWORLD\nDROPPED", &config);
        assert_eq!(lines.line1(), "HELLO");
        assert_eq!(lines.line2(), "WORLD");
        assert_eq!(lines.to_input(), "HELLO\nWORLD");

        let lines = TextLines::from_input("ONLY", &config);
        assert_eq!(lines.line1(), "ONLY");
        assert_eq!(lines.line2(), "");
        assert_eq!(lines.to_input(), "ONLY");
    }

    #[test]
    fn test_text_lines_keep_empty_second_line() {
        let config = CoverConfig::default();
        let lines = TextLines::from_input("A\n", &config);
        assert_eq!(lines.line2(), "");
        assert_eq!(lines.to_input(), "A\n");
    }

    #[test]
    fn test_set_text() {
        let config = CoverConfig::default();
        let mut params = RenderParameters::new(&config);
        params.set_text(&TextLines::from_input("TOP\nBOTTOM", &config));
        assert_eq!(params.text_line1, "TOP");
        assert_eq!(params.text_line2, "BOTTOM");
    }
}
