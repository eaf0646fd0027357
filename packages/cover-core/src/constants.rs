/// キャンバスの幅（px）
pub const CANVAS_WIDTH: u32 = 1200;

/// キャンバスの高さ（px）
pub const CANVAS_HEIGHT: u32 = 700;

/// アップロード可能な最大ファイルサイズ（10MB）
pub const MAX_UPLOAD_BYTES: u64 = 10 * 1024 * 1024;

/// デコード後の最大ピクセル数（1GP = 実質無制限、極端な入力のみ防止）
pub const MAX_PIXELS: u64 = 1_000_000_000;

/// ダウンロード時のファイル名
pub const DEFAULT_FILE_NAME: &str = "cover.jpg";

/// テキスト1行あたりの最大文字数
pub const MAX_TEXT_CHARS: usize = 50;

/// 保持するテキストの最大行数
pub const MAX_TEXT_LINES: usize = 2;
