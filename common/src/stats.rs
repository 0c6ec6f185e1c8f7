//! 読み込み済み文書の統計

use crate::types::{DocType, Document};
use serde::Serialize;
use std::collections::BTreeMap;

const UNKNOWN: &str = "不明";

/// 文書の集計結果
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentStats {
    pub total_docs: usize,
    /// 文書タイプ別
    pub by_type: BTreeMap<String, usize>,
    /// 製品別
    pub by_product: BTreeMap<String, usize>,
    /// 製品カテゴリ別
    pub by_product_type: BTreeMap<String, usize>,
    /// 会社区分別
    pub by_company: BTreeMap<String, usize>,
}

impl DocumentStats {
    pub fn from_documents(documents: &[Document]) -> Self {
        let mut stats = Self {
            total_docs: documents.len(),
            ..Default::default()
        };

        for doc in documents {
            *stats.by_type.entry(doc.doc_type.label().to_string()).or_insert(0) += 1;
            *stats.by_product.entry(or_unknown(&doc.product_name)).or_insert(0) += 1;
            *stats.by_product_type.entry(or_unknown(&doc.product_type)).or_insert(0) += 1;

            let company = doc
                .company_type
                .map(|c| c.dir_name().to_string())
                .unwrap_or_else(|| UNKNOWN.to_string());
            *stats.by_company.entry(company).or_insert(0) += 1;
        }

        stats
    }
}

/// 指定文書タイプの件数を製品カテゴリ別に集計
pub fn count_by_product_type_for(documents: &[Document], doc_type: DocType) -> BTreeMap<String, usize> {
    let mut counts = BTreeMap::new();
    for doc in documents.iter().filter(|d| d.doc_type == doc_type) {
        *counts.entry(or_unknown(&doc.product_type)).or_insert(0) += 1;
    }
    counts
}

fn or_unknown(value: &str) -> String {
    if value.is_empty() {
        UNKNOWN.to_string()
    } else {
        value.to_string()
    }
}
