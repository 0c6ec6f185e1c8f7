//! 薬価ファイル読み込み
//!
//! `<data_dir>/薬価/*.xlsx` の先頭シートを読み、区分（注射剤・内服薬など）ごとの表にする。

use crate::error::{PharmaError, Result};
use calamine::{open_workbook_auto, Data, Reader};
use pharma_compare_common::normalize_for_search;
use serde::Serialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

pub const PRICE_DIR_NAME: &str = "薬価";

/// 薬価表
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceTable {
    pub category: String,
    pub source_file: String,
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl PriceTable {
    /// データ行数（ヘッダー除く）
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn column_count(&self) -> usize {
        self.headers.len()
    }

    /// 列名から列の値を取得
    pub fn column(&self, name: &str) -> Option<Vec<&str>> {
        let idx = self.headers.iter().position(|h| h == name)?;
        Some(
            self.rows
                .iter()
                .map(|row| row.get(idx).map(String::as_str).unwrap_or(""))
                .collect(),
        )
    }

    /// いずれかのセルにキーワードを含む行（全角半角・大文字小文字を区別しない）
    pub fn find_rows(&self, keyword: &str) -> Vec<&Vec<String>> {
        let keyword = normalize_for_search(keyword.trim());
        if keyword.is_empty() {
            return Vec::new();
        }

        self.rows
            .iter()
            .filter(|row| row.iter().any(|cell| normalize_for_search(cell).contains(&keyword)))
            .collect()
    }
}

/// ファイル名から薬価区分を決める
pub fn price_category(file_name: &str) -> String {
    if file_name.contains("注射剤") {
        "注射剤".to_string()
    } else if file_name.contains("内服薬") || file_name.contains("内服") {
        "内服薬".to_string()
    } else {
        Path::new(file_name)
            .file_stem()
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_else(|| file_name.to_string())
    }
}

/// 薬価情報を読み込む
///
/// 同じ区分のファイルが複数あれば、ファイル名順で後のものが優先される。
pub fn load_drug_prices(data_dir: &Path) -> Result<BTreeMap<String, PriceTable>> {
    let mut prices = BTreeMap::new();
    let price_dir = data_dir.join(PRICE_DIR_NAME);

    if !price_dir.exists() {
        warn!("薬価フォルダが存在しません: {}", price_dir.display());
        return Ok(prices);
    }

    let mut excel_files: Vec<PathBuf> = std::fs::read_dir(&price_dir)?
        .flatten()
        .map(|e| e.path())
        .filter(|p| p.is_file() && p.extension().map(|e| e == "xlsx").unwrap_or(false))
        .collect();
    excel_files.sort();

    info!("薬価ファイル数: {}", excel_files.len());

    for excel_file in excel_files {
        match load_price_table(&excel_file) {
            Ok(table) => {
                info!(
                    "{}: {}行 × {}列",
                    table.source_file,
                    table.len(),
                    table.column_count()
                );
                prices.insert(table.category.clone(), table);
            }
            Err(e) => warn!("{}", e),
        }
    }

    Ok(prices)
}

/// 1ファイル分の薬価表を読み込む（先頭シート、1行目をヘッダー）
pub fn load_price_table(path: &Path) -> Result<PriceTable> {
    let source_file = path
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_default();
    let load_err = |msg: String| PharmaError::PriceLoad(format!("{}: {}", source_file, msg));

    let mut workbook = open_workbook_auto(path).map_err(|e| load_err(e.to_string()))?;
    let sheet_name = workbook
        .sheet_names()
        .first()
        .cloned()
        .ok_or_else(|| load_err("シートがありません".to_string()))?;
    let range = workbook
        .worksheet_range(&sheet_name)
        .map_err(|e| load_err(e.to_string()))?;

    let mut rows = range
        .rows()
        .map(|row| row.iter().map(cell_to_string).collect::<Vec<String>>());
    let headers = rows.next().unwrap_or_default();
    let rows: Vec<Vec<String>> = rows.filter(|row| row.iter().any(|c| !c.is_empty())).collect();

    Ok(PriceTable {
        category: price_category(&source_file),
        source_file,
        headers,
        rows,
    })
}

fn cell_to_string(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        Data::String(s) => s.trim().to_string(),
        // 整数値の浮動小数は小数点なしで表示
        Data::Float(f) if f.fract() == 0.0 && f.abs() < 1e15 => format!("{}", *f as i64),
        Data::Float(f) => f.to_string(),
        Data::Int(i) => i.to_string(),
        Data::Bool(b) => b.to_string(),
        other => other.to_string(),
    }
}
