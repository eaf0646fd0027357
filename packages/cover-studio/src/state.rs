//! 対話セッションの状態遷移
//!
//! UI からの操作を `SessionAction` として受け取り、純粋な reducer で次の状態と
//! 副作用（再描画の予約・無効化）を決める。

use std::sync::Arc;

use cover_core::{CoverConfig, RenderParameters, SourceImage, TextLines};

/// 1回の描画に渡すスナップショット
#[derive(Debug, Clone)]
pub struct RenderRequest {
    pub source: Arc<SourceImage>,
    pub params: RenderParameters,
}

#[derive(Debug, Clone, Default)]
pub enum SessionState {
    #[default]
    NoImage,
    ImageSelected {
        source: Arc<SourceImage>,
        params: RenderParameters,
    },
}

#[derive(Debug, Clone)]
pub enum SessionAction {
    /// 選択された画像のデコードに成功した
    ImageDecoded(Arc<SourceImage>),
    ParamChanged(ParamChange),
    /// 戻る操作: 画像とパラメータを破棄する
    Reset,
}

/// 単一パラメータの変更
#[derive(Debug, Clone)]
pub enum ParamChange {
    Text(TextLines),
    ForegroundMarginTop(i64),
    ShadowOpacity(i64),
    ImageQuality(i64),
}

impl ParamChange {
    fn apply(self, params: &mut RenderParameters, config: &CoverConfig) {
        match self {
            Self::Text(lines) => params.set_text(&lines),
            Self::ForegroundMarginTop(value) => params.set_foreground_margin_top(value, config),
            Self::ShadowOpacity(value) => params.set_shadow_opacity(value, config),
            Self::ImageQuality(value) => params.set_image_quality(value, config),
        }
    }
}

/// 遷移に伴う副作用
#[derive(Debug, Clone)]
pub enum SessionEffect {
    None,
    Render(RenderRequest),
    /// 実行中・予約済みの描画をすべて無効にする
    Invalidate,
}

impl SessionState {
    pub fn is_image_selected(&self) -> bool {
        matches!(self, Self::ImageSelected { .. })
    }

    pub fn params(&self) -> Option<&RenderParameters> {
        match self {
            Self::NoImage => None,
            Self::ImageSelected { params, .. } => Some(params),
        }
    }

    pub fn source(&self) -> Option<&Arc<SourceImage>> {
        match self {
            Self::NoImage => None,
            Self::ImageSelected { source, .. } => Some(source),
        }
    }

    pub fn reduce(self, action: SessionAction, config: &CoverConfig) -> (Self, SessionEffect) {
        match action {
            // 新しい画像ではパラメータをデフォルトに戻す
            SessionAction::ImageDecoded(source) => {
                Self::selected(source, RenderParameters::new(config))
            }
            SessionAction::Reset => (Self::NoImage, SessionEffect::Invalidate),
            SessionAction::ParamChanged(change) => match self {
                Self::NoImage => (Self::NoImage, SessionEffect::None),
                Self::ImageSelected { source, mut params } => {
                    change.apply(&mut params, config);
                    Self::selected(source, params)
                }
            },
        }
    }

    fn selected(source: Arc<SourceImage>, params: RenderParameters) -> (Self, SessionEffect) {
        let request = RenderRequest {
            source: source.clone(),
            params: params.clone(),
        };
        (
            Self::ImageSelected { source, params },
            SessionEffect::Render(request),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::RgbaImage;

    fn source() -> Arc<SourceImage> {
        Arc::new(SourceImage::new(RgbaImage::new(4, 4)))
    }

    fn selected(config: &CoverConfig) -> SessionState {
        SessionState::NoImage
            .reduce(SessionAction::ImageDecoded(source()), config)
            .0
    }

    #[test]
    fn test_image_decoded_selects_with_defaults() {
        let config = CoverConfig::default();
        let (state, effect) =
            SessionState::NoImage.reduce(SessionAction::ImageDecoded(source()), &config);

        assert!(state.is_image_selected());
        assert_eq!(state.params(), Some(&RenderParameters::new(&config)));
        match effect {
            SessionEffect::Render(request) => {
                assert_eq!(request.params, RenderParameters::new(&config));
            }
            other => panic!("expected Render, got {other:?}"),
        }
    }

    #[test]
    fn test_param_change_in_no_image_is_ignored() {
        let config = CoverConfig::default();
        let action = SessionAction::ParamChanged(ParamChange::ShadowOpacity(80));
        let (state, effect) = SessionState::NoImage.reduce(action, &config);
        assert!(!state.is_image_selected());
        assert!(matches!(effect, SessionEffect::None));
    }

    #[test]
    fn test_param_change_schedules_render() {
        let config = CoverConfig::default();
        let action = SessionAction::ParamChanged(ParamChange::ShadowOpacity(80));
        let (state, effect) = selected(&config).reduce(action, &config);

        assert_eq!(state.params().map(|p| p.shadow_opacity), Some(80));
        match effect {
            SessionEffect::Render(request) => assert_eq!(request.params.shadow_opacity, 80),
            other => panic!("expected Render, got {other:?}"),
        }
    }

    #[test]
    fn test_param_change_is_clamped() {
        let config = CoverConfig::default();
        let state = selected(&config)
            .reduce(SessionAction::ParamChanged(ParamChange::ForegroundMarginTop(-1)), &config)
            .0
            .reduce(SessionAction::ParamChanged(ParamChange::ImageQuality(400)), &config)
            .0;
        let params = state.params().unwrap();
        assert_eq!(params.foreground_margin_top, 100);
        assert_eq!(params.image_quality, 100);
    }

    #[test]
    fn test_text_change() {
        let config = CoverConfig::default();
        let lines = TextLines::from_input("one\ntwo\nthree", &config);
        let action = SessionAction::ParamChanged(ParamChange::Text(lines));
        let (state, _) = selected(&config).reduce(action, &config);
        let params = state.params().unwrap();
        assert_eq!(params.text_line1, "one");
        assert_eq!(params.text_line2, "two");
    }

    #[test]
    fn test_reset_clears_everything() {
        let config = CoverConfig::default();
        let state = selected(&config)
            .reduce(SessionAction::ParamChanged(ParamChange::ShadowOpacity(90)), &config)
            .0;

        let (state, effect) = state.reduce(SessionAction::Reset, &config);
        assert!(state.source().is_none());
        assert!(state.params().is_none());
        assert!(matches!(effect, SessionEffect::Invalidate));

        // 次の選択はデフォルトから始まる
        let state = state
            .reduce(SessionAction::ImageDecoded(source()), &config)
            .0;
        assert_eq!(state.params(), Some(&RenderParameters::new(&config)));
    }

    #[test]
    fn test_new_image_resets_params() {
        let config = CoverConfig::default();
        let state = selected(&config)
            .reduce(SessionAction::ParamChanged(ParamChange::ImageQuality(60)), &config)
            .0;
        let replacement = source();
        let state = state
            .reduce(SessionAction::ImageDecoded(replacement.clone()), &config)
            .0;

        assert!(Arc::ptr_eq(state.source().unwrap(), &replacement));
        assert_eq!(state.params().map(|p| p.image_quality), Some(100));
    }
}
