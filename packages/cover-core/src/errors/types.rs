use thiserror::Error;

/// カバー生成の統合エラー型
#[derive(Debug, Error)]
pub enum CoverError {
    #[error("upload rejected: {0}")]
    Upload(#[from] UploadError),

    #[error("decode error: {0}")]
    Decode(#[from] DecodeError),

    #[error("transform error: {0}")]
    Transform(#[from] TransformError),
}

/// アップロードされたファイルの検証エラー
#[derive(Debug, Error)]
pub enum UploadError {
    #[error("file is empty")]
    Empty,

    #[error("unsupported media type: {mime}")]
    UnsupportedMediaType { mime: String },

    #[error("unsupported file extension: {file_name}")]
    UnsupportedExtension { file_name: String },

    #[error("file too large ({size} bytes, max {max})")]
    TooLarge { size: u64, max: u64 },
}

/// 画像デコードエラー
#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("unsupported image format: {0}")]
    UnsupportedFormat(String),

    #[error("malformed image: {0}")]
    Malformed(String),

    #[error("image resolution exceeds maximum ({width}x{height})")]
    ResolutionTooLarge { width: u32, height: u32 },
}

/// 合成・エンコードエラー
#[derive(Debug, Error)]
pub enum TransformError {
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("invalid font: {0}")]
    InvalidFont(String),

    #[error("encode failed: {0}")]
    EncodeFailed(String),
}
