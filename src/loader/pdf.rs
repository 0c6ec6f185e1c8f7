use crate::error::{PharmaError, Result};
use lopdf::Document;
use std::path::Path;
use tracing::debug;

/// PDFからページごとのテキストを抽出
///
/// テキストを取り出せないページは空文字列として扱う（スキャン画像のみのページなど）
pub fn extract_page_texts(path: &Path) -> Result<Vec<String>> {
    let pdf = Document::load(path)
        .map_err(|e| PharmaError::PdfLoad(format!("{}: {}", path.display(), e)))?;

    let texts = pdf
        .get_pages()
        .keys()
        .map(|&page_num| match pdf.extract_text(&[page_num]) {
            Ok(text) => text,
            Err(e) => {
                debug!("ページ{}のテキスト抽出に失敗 ({}): {}", page_num, path.display(), e);
                String::new()
            }
        })
        .collect();

    Ok(texts)
}
