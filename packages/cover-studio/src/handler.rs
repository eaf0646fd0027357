use std::sync::Arc;

use cover_core::{
    Compositor, CoverConfig, CoverError, DecodeError, OutputBitmap, TextLines, TransformError,
    UploadError,
};
use tokio::runtime::Handle;
use tokio::sync::watch;

use crate::assets::{AssetError, AssetSources};
use crate::scheduler::{RenderScheduler, RenderSlot};
use crate::state::{ParamChange, SessionAction, SessionEffect, SessionState};
use crate::transform::{decode_upload, SelectedFile};

/// ダウンロード用のカバー画像
#[derive(Debug, Clone)]
pub struct CoverDownload {
    pub file_name: String,
    pub output: OutputBitmap,
}

impl CoverDownload {
    pub fn data_url(&self) -> String {
        self.output.to_data_url()
    }
}

#[derive(Debug, thiserror::Error)]
pub enum StudioError {
    /// ユーザーの入力が受け付けられない
    #[error("{0}")]
    Rejected(String),

    #[error("startup failed: {0}")]
    Startup(#[from] AssetError),

    #[error("internal error: {0}")]
    Internal(String),
}

impl From<CoverError> for StudioError {
    fn from(err: CoverError) -> Self {
        match err {
            CoverError::Upload(upload_err) => upload_err.into(),
            CoverError::Decode(decode_err) => decode_err.into(),
            CoverError::Transform(transform_err) => transform_err.into(),
        }
    }
}

impl From<UploadError> for StudioError {
    fn from(err: UploadError) -> Self {
        match &err {
            UploadError::TooLarge { size, max } => {
                tracing::warn!(size = %size, max = %max, "upload too large");
            }
            other => {
                tracing::warn!(error = %other, "upload rejected");
            }
        }
        StudioError::Rejected(err.to_string())
    }
}

impl From<DecodeError> for StudioError {
    fn from(err: DecodeError) -> Self {
        match &err {
            DecodeError::ResolutionTooLarge { width, height } => {
                tracing::warn!(width = %width, height = %height, "image resolution too large");
            }
            other => {
                tracing::warn!(error = %other, "failed to decode selected image");
            }
        }
        StudioError::Rejected(err.to_string())
    }
}

impl From<TransformError> for StudioError {
    fn from(err: TransformError) -> Self {
        tracing::error!(error = %err, "cover processing failed");
        StudioError::Internal(err.to_string())
    }
}

/// UI から呼び出すカバー生成セッション
///
/// 状態遷移は `SessionState::reduce` に委ね、ここでは副作用（描画の予約・無効化）
/// だけを実行する。描画は作成時の Tokio ランタイム上で行うため、`set_*` や
/// `reset` はランタイム外のスレッド（UI スレッドなど）からも呼べる。
pub struct CoverStudio {
    config: Arc<CoverConfig>,
    state: SessionState,
    scheduler: RenderScheduler,
}

impl CoverStudio {
    /// 現在の Tokio ランタイムでセッションを作成する
    ///
    /// # Panics
    ///
    /// Tokio ランタイムのコンテキスト外で呼ぶとパニックする。
    /// その場合は `with_runtime` を使う。
    pub fn new(compositor: Compositor) -> Self {
        Self::with_runtime(compositor, Handle::current())
    }

    pub fn with_runtime(compositor: Compositor, runtime: Handle) -> Self {
        Self {
            config: compositor.config().clone(),
            state: SessionState::NoImage,
            scheduler: RenderScheduler::with_runtime(compositor, runtime),
        }
    }

    /// アセットを読み込んでセッションを作成する
    pub async fn from_assets(
        sources: &AssetSources,
        config: CoverConfig,
    ) -> Result<Self, StudioError> {
        let compositor = sources.load(config).await?;
        Ok(Self::new(compositor))
    }

    pub fn config(&self) -> &CoverConfig {
        &self.config
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    /// 画像を選択する
    ///
    /// 失敗した場合は状態を変えずにエラーを返す。
    pub async fn select_image(&mut self, file: SelectedFile) -> Result<(), StudioError> {
        let config = self.config.clone();
        let source = tokio::task::spawn_blocking(move || decode_upload(&file, &config))
            .await
            .map_err(|e| StudioError::Internal(format!("decode task failed: {e}")))??;

        self.dispatch(SessionAction::ImageDecoded(Arc::new(source)));
        Ok(())
    }

    /// テキスト入力の変更
    ///
    /// 切り詰めた後のテキストを返す。入力欄にはこの値を書き戻す。
    pub fn set_text(&mut self, raw: &str) -> String {
        let lines = TextLines::from_input(raw, &self.config);
        let normalized = lines.to_input();
        self.dispatch(SessionAction::ParamChanged(ParamChange::Text(lines)));
        normalized
    }

    pub fn set_foreground_margin_top(&mut self, value: i64) {
        self.dispatch(SessionAction::ParamChanged(ParamChange::ForegroundMarginTop(value)));
    }

    pub fn set_shadow_opacity(&mut self, value: i64) {
        self.dispatch(SessionAction::ParamChanged(ParamChange::ShadowOpacity(value)));
    }

    pub fn set_image_quality(&mut self, value: i64) {
        self.dispatch(SessionAction::ParamChanged(ParamChange::ImageQuality(value)));
    }

    /// 画像選択前の状態に戻る
    pub fn reset(&mut self) {
        self.dispatch(SessionAction::Reset);
    }

    pub fn subscribe(&self) -> watch::Receiver<RenderSlot> {
        self.scheduler.subscribe()
    }

    pub fn latest_output(&self) -> Option<OutputBitmap> {
        self.scheduler.latest().output
    }

    /// プレビューのクリックでダウンロードする画像
    pub fn download(&self) -> Option<CoverDownload> {
        if !self.state.is_image_selected() {
            return None;
        }
        self.latest_output().map(|output| CoverDownload {
            file_name: self.config.download_file_name.clone(),
            output,
        })
    }

    fn dispatch(&mut self, action: SessionAction) {
        let state = std::mem::take(&mut self.state);
        let (state, effect) = state.reduce(action, &self.config);
        self.state = state;

        match effect {
            SessionEffect::None => {
                tracing::debug!("parameter change ignored without an image");
            }
            SessionEffect::Render(request) => {
                self.scheduler.schedule(request);
            }
            SessionEffect::Invalidate => self.scheduler.invalidate(),
        }
    }
}
