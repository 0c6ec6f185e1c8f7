//! Pharma Compare Common Library
//!
//! 文書の型定義と、ファイルI/Oを伴わないテキスト処理・集計・検索

pub mod types;
pub mod error;
pub mod doc_type;
pub mod text;
pub mod stats;
pub mod search;
pub mod compare;

pub use types::{CompanyType, DocType, Document, Section};
pub use error::{Error, Result};
pub use doc_type::detect_document_type;
pub use text::{clean_text, extract_first_heading, extract_sections, join_pages, page_header, PAGE_MARKER};
pub use stats::{count_by_product_type_for, DocumentStats};
pub use search::{normalize_for_search, search_sections, SearchHit, SearchOptions};
pub use compare::{CoverageGap, CoverageMatrix, CoverageRow};
