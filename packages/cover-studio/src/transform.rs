use bytes::Bytes;

use cover_core::{
    decode_source, validate_upload, CoverConfig, CoverError, SourceImage, Upload,
};

/// UI から渡される選択済みファイル
#[derive(Debug, Clone)]
pub struct SelectedFile {
    pub file_name: Option<String>,
    pub mime: String,
    pub data: Bytes,
}

impl SelectedFile {
    pub fn new(mime: impl Into<String>, data: impl Into<Bytes>) -> Self {
        Self {
            file_name: None,
            mime: mime.into(),
            data: data.into(),
        }
    }

    pub fn with_file_name(mut self, file_name: impl Into<String>) -> Self {
        self.file_name = Some(file_name.into());
        self
    }

    pub fn as_upload(&self) -> Upload<'_> {
        let upload = Upload::new(&self.mime, &self.data);
        match self.file_name.as_deref() {
            Some(name) => upload.with_file_name(name),
            None => upload,
        }
    }
}

/// 選択されたファイルを検証してデコードする
///
/// MIME・拡張子・サイズをデコード前に確認し、内容から PNG/JPEG を判定する。
pub fn decode_upload(file: &SelectedFile, config: &CoverConfig) -> Result<SourceImage, CoverError> {
    validate_upload(&file.as_upload(), config.max_upload_bytes)?;

    let source = decode_source(&file.data)?;
    tracing::info!(
        file = ?file.file_name,
        mime = %file.mime,
        size = file.data.len(),
        w = source.width(),
        h = source.height(),
        "source image decoded"
    );
    Ok(source)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::png_bytes;
    use cover_core::{DecodeError, UploadError};

    #[test]
    fn test_decode_upload() {
        let file = SelectedFile::new("image/png", png_bytes(64, 32)).with_file_name("photo.png");
        let source = decode_upload(&file, &CoverConfig::default()).unwrap();
        assert_eq!((source.width(), source.height()), (64, 32));
    }

    #[test]
    fn test_decode_upload_rejects_mime() {
        let file = SelectedFile::new("image/gif", png_bytes(4, 4));
        let result = decode_upload(&file, &CoverConfig::default());
        assert!(matches!(
            result,
            Err(CoverError::Upload(UploadError::UnsupportedMediaType { .. }))
        ));
    }

    #[test]
    fn test_decode_upload_rejects_size() {
        let mut config = CoverConfig::default();
        config.max_upload_bytes = 8;
        let file = SelectedFile::new("image/png", png_bytes(4, 4));
        let result = decode_upload(&file, &config);
        assert!(matches!(
            result,
            Err(CoverError::Upload(UploadError::TooLarge { .. }))
        ));
    }

    #[test]
    fn test_decode_upload_rejects_garbage() {
        let file = SelectedFile::new("image/jpeg", Bytes::from_static(b"not really a jpeg"));
        let result = decode_upload(&file, &CoverConfig::default());
        assert!(matches!(
            result,
            Err(CoverError::Decode(DecodeError::UnsupportedFormat(_)))
        ));
    }
}
