//! 医薬品比較用の文書・薬価データ読み込みライブラリ
//!
//! 純粋なテキスト処理・集計は `pharma_compare_common`、
//! ファイル読み込み（PDF/XML/Excel）と出力はこのクレートが担う。

pub mod cli;
pub mod config;
pub mod error;
pub mod export;
pub mod loader;
pub mod logging;
pub mod prices;

pub use error::{PharmaError, Result};
pub use loader::{DocumentLoader, ProductCatalog};
pub use prices::{load_drug_prices, PriceTable};
