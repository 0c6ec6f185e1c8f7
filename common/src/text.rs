//! テキスト正規化とセクション分割
//!
//! PDFから抽出した全文は `--- ページ N ---` の区切り行でページごとに連結されている。
//! ここではその全文をページ単位のセクションに分割し、見出しを推定する。

use crate::types::Section;
use regex::Regex;

/// ページ区切りマーカー
pub const PAGE_MARKER: &str = "--- ページ";

/// 見出し探索の対象行数
const HEADING_SCAN_LINES: usize = 5;

/// ページ区切り行を生成
pub fn page_header(page: usize) -> String {
    format!("\n{} {} ---\n", PAGE_MARKER, page)
}

/// ページごとのテキストを区切り行付きで連結（1始まり）
pub fn join_pages<S: AsRef<str>>(page_texts: &[S]) -> String {
    page_texts
        .iter()
        .enumerate()
        .map(|(i, text)| format!("{}{}", page_header(i + 1), text.as_ref()))
        .collect()
}

/// テキストを正規化
///
/// - 3つ以上の連続改行を2つに
/// - 全角スペースを半角に
/// - 連続スペースを1つに
pub fn clean_text(text: &str) -> String {
    lazy_static::lazy_static! {
        static ref MANY_NEWLINES: Regex = Regex::new(r"\n{3,}").unwrap();
        static ref MANY_SPACES: Regex = Regex::new(r" {2,}").unwrap();
    }

    let text = MANY_NEWLINES.replace_all(text, "\n\n");
    let text = text.replace('\u{3000}', " ");
    let text = MANY_SPACES.replace_all(&text, " ");

    text.trim().to_string()
}

/// テキスト冒頭から最初の見出しらしい行を抽出
///
/// 先頭5行のうち、数字または【で始まり4文字以上ある最初の行
pub fn extract_first_heading(text: &str) -> Option<String> {
    lazy_static::lazy_static! {
        static ref HEADING_RE: Regex = Regex::new(r"^[\d【].{3,50}").unwrap();
    }

    text.split('\n')
        .take(HEADING_SCAN_LINES)
        .map(str::trim)
        .find(|line| HEADING_RE.is_match(line))
        .map(str::to_string)
}

/// 全文からページ単位のセクションを抽出
pub fn extract_sections(full_text: &str, file_name: &str) -> Vec<Section> {
    lazy_static::lazy_static! {
        static ref PAGE_NUM_RE: Regex = Regex::new(r"^\s*(\d+) ---").unwrap();
    }

    let mut sections = Vec::new();

    for chunk in full_text.split(PAGE_MARKER) {
        if chunk.trim().is_empty() {
            continue;
        }

        let (page, body) = match PAGE_NUM_RE.captures(chunk) {
            Some(caps) => {
                let page = caps[1].parse::<u32>().ok();
                let end = caps.get(0).map(|m| m.end()).unwrap_or(0);
                (page, &chunk[end..])
            }
            None => (None, chunk),
        };

        sections.push(Section {
            text: clean_text(body),
            page,
            heading: extract_first_heading(body),
            file_name: file_name.to_string(),
        });
    }

    sections
}
