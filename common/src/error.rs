//! エラー型定義

use thiserror::Error;

/// 共通エラー型（CLI引数や設定値の解釈失敗）
#[derive(Error, Debug, PartialEq, Eq)]
pub enum Error {
    #[error("不明な文書タイプ: {0}（電子添文 / IF / RMP / guide / other）")]
    UnknownDocType(String),

    #[error("不明な会社区分: {0}（自社 / 他社）")]
    UnknownCompanyType(String),
}

/// Result型エイリアス
pub type Result<T> = std::result::Result<T, Error>;
