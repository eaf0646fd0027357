//! カバー画像生成のセッション
//!
//! 前景画像とフォントはクレートに同梱しない。起動時に
//! `COVER_FOREGROUND_PATH`（PNG/JPEG）と `COVER_FONT_PATH`（TTF/OTF）で
//! 配置先を指定し、`AssetSources::load` で読み込む。どちらかが読めなければ
//! 起動を中止する。

pub mod assets;
pub mod handler;
pub mod scheduler;
pub mod state;
pub mod transform;

#[cfg(test)]
mod testing;

pub use assets::{AssetError, AssetSources};
pub use handler::{CoverDownload, CoverStudio, StudioError};
pub use scheduler::{RenderScheduler, RenderSlot};
pub use state::{ParamChange, RenderRequest, SessionAction, SessionEffect, SessionState};
pub use transform::{decode_upload, SelectedFile};
