use crate::errors::UploadError;

/// 受け付ける MIME タイプ
const ACCEPTED_MIME_TYPES: [&str; 3] = ["image/png", "image/jpeg", "image/jpg"];

/// 受け付ける拡張子
const ACCEPTED_EXTENSIONS: [&str; 3] = [".jpg", ".jpeg", ".png"];

/// ユーザーが選択したファイル
#[derive(Debug, Clone, Copy)]
pub struct Upload<'a> {
    pub file_name: Option<&'a str>,
    pub mime: &'a str,
    pub data: &'a [u8],
}

impl<'a> Upload<'a> {
    pub fn new(mime: &'a str, data: &'a [u8]) -> Self {
        Self {
            file_name: None,
            mime,
            data,
        }
    }

    pub fn with_file_name(mut self, file_name: &'a str) -> Self {
        self.file_name = Some(file_name);
        self
    }
}

/// アップロードされたファイルを検証する
/// MIME タイプ・拡張子・サイズをデコード前に確認する
pub fn validate_upload(upload: &Upload<'_>, max_bytes: u64) -> Result<(), UploadError> {
    // 空ファイルチェック
    if upload.data.is_empty() {
        return Err(UploadError::Empty);
    }

    // サイズチェック
    let size = upload.data.len() as u64;
    if size > max_bytes {
        return Err(UploadError::TooLarge {
            size,
            max: max_bytes,
        });
    }

    // MIME タイプ（パラメータ部分は無視）
    let mime = upload
        .mime
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase();
    if !ACCEPTED_MIME_TYPES.contains(&mime.as_str()) {
        return Err(UploadError::UnsupportedMediaType {
            mime: upload.mime.to_string(),
        });
    }

    // 拡張子（ファイル名がある場合のみ）
    if let Some(file_name) = upload.file_name {
        let lower = file_name.to_ascii_lowercase();
        if !ACCEPTED_EXTENSIONS.iter().any(|ext| lower.ends_with(ext)) {
            return Err(UploadError::UnsupportedExtension {
                file_name: file_name.to_string(),
            });
        }
    }

    Ok(())
}
