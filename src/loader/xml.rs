use crate::error::{PharmaError, Result};
use std::path::Path;

/// XML（電子添文）の全テキストノードを文書順に連結
pub fn extract_text(path: &Path) -> Result<String> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| PharmaError::XmlLoad(format!("{}: {}", path.display(), e)))?;
    text_from_str(&content).map_err(|e| PharmaError::XmlLoad(format!("{}: {}", path.display(), e)))
}

pub fn text_from_str(content: &str) -> std::result::Result<String, roxmltree::Error> {
    let options = roxmltree::ParsingOptions {
        allow_dtd: true,
        ..Default::default()
    };
    let doc = roxmltree::Document::parse_with_options(content, options)?;

    Ok(doc
        .descendants()
        .filter(|n| n.is_text())
        .filter_map(|n| n.text())
        .collect())
}
