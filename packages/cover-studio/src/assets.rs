use std::path::{Path, PathBuf};
use std::sync::Arc;

use cover_core::{
    Compositor, CoverConfig, CoverError, ForegroundAsset, GlyphRasterizer, TransformError,
};

/// 起動時に読み込む前景画像とフォントの場所
///
/// どちらのファイルもデプロイ時に用意する。
#[derive(Debug, Clone)]
pub struct AssetSources {
    foreground_path: PathBuf,
    font_path: PathBuf,
}

/// アセットの読み込みエラー（起動時の致命的エラー）
#[derive(Debug, thiserror::Error)]
pub enum AssetError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid asset {path}: {source}")]
    Invalid {
        path: PathBuf,
        #[source]
        source: CoverError,
    },

    #[error("invalid configuration: {0}")]
    Config(#[from] TransformError),
}

impl AssetSources {
    /// 新しい AssetSources を作成する
    pub fn new(foreground_path: impl Into<PathBuf>, font_path: impl Into<PathBuf>) -> Self {
        Self {
            foreground_path: foreground_path.into(),
            font_path: font_path.into(),
        }
    }

    /// 環境変数から AssetSources を作成する
    ///
    /// 必須の環境変数:
    /// - COVER_FOREGROUND_PATH
    /// - COVER_FONT_PATH
    pub fn from_env() -> Result<Self, String> {
        let foreground_path = std::env::var("COVER_FOREGROUND_PATH")
            .map_err(|_| "COVER_FOREGROUND_PATH is not set".to_string())?;
        let font_path = std::env::var("COVER_FONT_PATH")
            .map_err(|_| "COVER_FONT_PATH is not set".to_string())?;

        Ok(Self::new(foreground_path, font_path))
    }

    pub fn foreground_path(&self) -> &Path {
        &self.foreground_path
    }

    pub fn font_path(&self) -> &Path {
        &self.font_path
    }

    /// 前景画像とフォントを読み込み、Compositor を構築する
    pub async fn load(&self, config: CoverConfig) -> Result<Compositor, AssetError> {
        let foreground_bytes = read(&self.foreground_path).await?;
        let foreground = ForegroundAsset::from_bytes(&foreground_bytes)
            .map_err(|e| invalid(&self.foreground_path, e.into()))?;

        let font_bytes = read(&self.font_path).await?;
        let text = GlyphRasterizer::from_bytes(font_bytes, config.font_size_px)
            .map_err(|e| invalid(&self.font_path, e.into()))?;

        tracing::info!(
            foreground = %self.foreground_path.display(),
            font = %self.font_path.display(),
            w = foreground.width(),
            h = foreground.height(),
            "cover assets loaded"
        );

        let compositor = Compositor::new(config, foreground, Arc::new(text))?;
        Ok(compositor)
    }
}

async fn read(path: &Path) -> Result<Vec<u8>, AssetError> {
    tokio::fs::read(path).await.map_err(|source| {
        tracing::error!(path = %path.display(), error = %source, "failed to read asset");
        AssetError::Read {
            path: path.to_path_buf(),
            source,
        }
    })
}

fn invalid(path: &Path, source: CoverError) -> AssetError {
    tracing::error!(path = %path.display(), error = %source, "invalid asset");
    AssetError::Invalid {
        path: path.to_path_buf(),
        source,
    }
}
