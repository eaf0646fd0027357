use crate::config::{CoverConfig, ParamRange};
use crate::errors::TransformError;
use crate::transform::RenderParameters;

/// 複数行テキストを正規化する
///
/// 先頭 `max_lines` 行のみ残し、各行を `max_chars` 文字（Unicode スカラー値）に
/// 切り詰める。CRLF の `\r` は取り除く。
pub fn normalize_text(raw: &str, max_chars: usize, max_lines: usize) -> Vec<String> {
    raw.split('\n')
        .take(max_lines)
        .map(|line| {
            let line = line.strip_suffix('\r').unwrap_or(line);
            line.chars().take(max_chars).collect()
        })
        .collect()
}

/// パラメータを設定の範囲内に丸める
///
/// 数値は最も近い境界へ、テキストは各行を1行目だけ残して `max_text_chars` 文字に切り詰める。
pub fn clamp_params(params: &RenderParameters, config: &CoverConfig) -> RenderParameters {
    RenderParameters {
        text_line1: clamp_line(&params.text_line1, config),
        text_line2: clamp_line(&params.text_line2, config),
        foreground_margin_top: config
            .foreground_margin_top
            .clamp(params.foreground_margin_top as i64),
        shadow_opacity: config.shadow_opacity.clamp(params.shadow_opacity as i64),
        image_quality: config.image_quality.clamp(params.image_quality as i64),
    }
}

fn clamp_line(line: &str, config: &CoverConfig) -> String {
    normalize_text(line, config.max_text_chars, 1)
        .into_iter()
        .next()
        .unwrap_or_default()
}

/// 設定を検証する
pub fn validate_config(config: &CoverConfig) -> Result<(), TransformError> {
    if config.canvas_width == 0 || config.canvas_height == 0 {
        return Err(TransformError::InvalidConfig(format!(
            "canvas must be non-empty, got {}x{}",
            config.canvas_width, config.canvas_height
        )));
    }

    validate_range("foreground_margin_top", &config.foreground_margin_top)?;
    validate_range("shadow_opacity", &config.shadow_opacity)?;
    validate_range("image_quality", &config.image_quality)?;

    if config.shadow_opacity.max > 100 {
        return Err(TransformError::InvalidConfig(format!(
            "shadow_opacity must be within 0-100, got max {}",
            config.shadow_opacity.max
        )));
    }

    // JPEG エンコーダは 1-100 のみ受け付ける
    if config.image_quality.min == 0 || config.image_quality.max > 100 {
        return Err(TransformError::InvalidConfig(format!(
            "image_quality must be within 1-100, got {}-{}",
            config.image_quality.min, config.image_quality.max
        )));
    }

    if !(config.font_size_px.is_finite() && config.font_size_px > 0.0) {
        return Err(TransformError::InvalidConfig(format!(
            "font_size_px must be positive, got {}",
            config.font_size_px
        )));
    }

    if !(1..=2).contains(&config.max_text_lines) {
        return Err(TransformError::InvalidConfig(format!(
            "max_text_lines must be 1 or 2, got {}",
            config.max_text_lines
        )));
    }

    Ok(())
}

fn validate_range(name: &str, range: &ParamRange) -> Result<(), TransformError> {
    if range.min > range.max {
        return Err(TransformError::InvalidConfig(format!(
            "{name}: min {} is greater than max {}",
            range.min, range.max
        )));
    }
    if !range.contains(range.default) {
        return Err(TransformError::InvalidConfig(format!(
            "{name}: default {} is outside {}-{}",
            range.default, range.min, range.max
        )));
    }
    Ok(())
}
