//! セクション横断キーワード検索
//!
//! 自社・他社の全文書セクションを対象に、全キーワードを含むセクションを
//! 出現回数の多い順に返す。照合はNFKC正規化＋小文字化した文字列同士で行う。

use crate::types::{CompanyType, DocType, Document};
use serde::Serialize;
use unicode_normalization::UnicodeNormalization;

/// スニペットの最大文字数
const SNIPPET_LEN: usize = 80;
/// 一致位置より前に含める文字数
const SNIPPET_CONTEXT: usize = 20;

/// 検索条件
#[derive(Debug, Clone, Default)]
pub struct SearchOptions {
    pub product_type: Option<String>,
    pub company_type: Option<CompanyType>,
    pub doc_type: Option<DocType>,
    /// 返す最大件数（Noneで全件）
    pub limit: Option<usize>,
}

/// 検索ヒット
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchHit {
    pub product_type: String,
    pub product_name: String,
    pub company_type: Option<CompanyType>,
    pub doc_type: DocType,
    pub file_name: String,
    pub page: Option<u32>,
    pub heading: Option<String>,
    pub snippet: String,
    pub score: usize,
}

/// 照合用に正規化
pub fn normalize_for_search(text: &str) -> String {
    text.nfkc().flat_map(char::to_lowercase).collect()
}

/// 小文字化した文字列と、その各文字が元の何文字目から来たかの対応
///
/// 小文字化で文字数が変わる場合（`İ` → `i̇` など）でも元の位置に戻せる。
fn fold_with_origin(text: &str) -> (String, Vec<usize>) {
    let mut folded = String::with_capacity(text.len());
    let mut origin = Vec::with_capacity(text.len());
    for (i, c) in text.chars().enumerate() {
        for lower in c.to_lowercase() {
            folded.push(lower);
            origin.push(i);
        }
    }
    (folded, origin)
}

/// 全文書のセクションを検索
pub fn search_sections(documents: &[Document], query: &str, options: &SearchOptions) -> Vec<SearchHit> {
    let terms: Vec<String> = query
        .split_whitespace()
        .map(normalize_for_search)
        .filter(|t| !t.is_empty())
        .collect();

    if terms.is_empty() {
        return Vec::new();
    }

    let mut hits = Vec::new();

    for doc in documents.iter().filter(|d| matches_filters(d, options)) {
        for section in &doc.sections {
            let display: String = section.text.nfkc().collect();
            let (haystack, origin) = fold_with_origin(&display);

            let counts: Vec<usize> = terms.iter().map(|t| haystack.matches(t.as_str()).count()).collect();
            if counts.iter().any(|&c| c == 0) {
                continue;
            }

            hits.push(SearchHit {
                product_type: doc.product_type.clone(),
                product_name: doc.product_name.clone(),
                company_type: doc.company_type,
                doc_type: doc.doc_type,
                file_name: doc.file_name.clone(),
                page: section.page,
                heading: section.heading.clone(),
                snippet: make_snippet(&display, &haystack, &origin, &terms[0]),
                score: counts.iter().sum(),
            });
        }
    }

    hits.sort_by(|a, b| {
        b.score
            .cmp(&a.score)
            .then_with(|| a.file_name.cmp(&b.file_name))
            .then_with(|| a.page.cmp(&b.page))
    });

    if let Some(limit) = options.limit {
        hits.truncate(limit);
    }

    hits
}

fn matches_filters(doc: &Document, options: &SearchOptions) -> bool {
    if let Some(product_type) = &options.product_type {
        if &doc.product_type != product_type {
            return false;
        }
    }
    if let Some(company) = options.company_type {
        if doc.company_type != Some(company) {
            return false;
        }
    }
    if let Some(doc_type) = options.doc_type {
        if doc.doc_type != doc_type {
            return false;
        }
    }
    true
}

/// 最初のキーワード付近を切り出す
fn make_snippet(display: &str, haystack: &str, origin: &[usize], term: &str) -> String {
    let match_char = haystack
        .find(term)
        .and_then(|pos| origin.get(haystack[..pos].chars().count()).copied())
        .unwrap_or(0);
    let start = match_char.saturating_sub(SNIPPET_CONTEXT);

    display
        .chars()
        .skip(start)
        .take(SNIPPET_LEN)
        .map(|c| if c == '\n' { ' ' } else { c })
        .collect()
}
