pub mod excel;

use crate::cli::ExportFormat;
use crate::error::Result;
use crate::prices::PriceTable;
use pharma_compare_common::{Document, DocumentStats};
use serde::Serialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// JSON出力の構造
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct JsonExport<'a> {
    generated_at: String,
    stats: &'a DocumentStats,
    documents: &'a [Document],
    prices: &'a BTreeMap<String, PriceTable>,
}

fn output_path_for_format(output: &Path, title: &str, extension: &str) -> PathBuf {
    if output.is_dir() || output.extension().is_none() {
        output.join(format!("{}.{}", title, extension))
    } else {
        output.to_path_buf()
    }
}

fn output_paths_for_both(output: &Path, title: &str) -> (PathBuf, PathBuf) {
    if output.is_dir() || output.extension().is_none() {
        (
            output.join(format!("{}.xlsx", title)),
            output.join(format!("{}.json", title)),
        )
    } else {
        let parent = output.parent().unwrap_or_else(|| Path::new("."));
        let stem = output.file_stem().and_then(|s| s.to_str()).unwrap_or(title);
        (
            parent.join(format!("{}.xlsx", stem)),
            parent.join(format!("{}.json", stem)),
        )
    }
}

/// 文書一覧・統計・薬価をまとめて書き出す
pub fn write_json(
    documents: &[Document],
    stats: &DocumentStats,
    prices: &BTreeMap<String, PriceTable>,
    output_path: &Path,
) -> Result<()> {
    let payload = JsonExport {
        generated_at: chrono::Local::now().to_rfc3339(),
        stats,
        documents,
        prices,
    };
    let json = serde_json::to_string_pretty(&payload)?;
    std::fs::write(output_path, json)?;
    Ok(())
}

/// 指定形式で書き出し、作成したファイルのパスを返す
///
/// `output` が拡張子なしならディレクトリとみなし `<title>.<拡張子>` を作る
pub fn export_results(
    documents: &[Document],
    prices: &BTreeMap<String, PriceTable>,
    format: &ExportFormat,
    output: &Path,
    title: &str,
) -> Result<Vec<PathBuf>> {
    let stats = DocumentStats::from_documents(documents);

    if output.extension().is_none() {
        std::fs::create_dir_all(output)?;
    }

    let written = match format {
        ExportFormat::Excel => {
            let path = output_path_for_format(output, title, "xlsx");
            excel::generate_excel(documents, &stats, prices, &path)?;
            vec![path]
        }
        ExportFormat::Json => {
            let path = output_path_for_format(output, title, "json");
            write_json(documents, &stats, prices, &path)?;
            vec![path]
        }
        ExportFormat::Both => {
            let (excel_path, json_path) = output_paths_for_both(output, title);
            excel::generate_excel(documents, &stats, prices, &excel_path)?;
            write_json(documents, &stats, prices, &json_path)?;
            vec![excel_path, json_path]
        }
    };

    Ok(written)
}
