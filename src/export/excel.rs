//! 文書一覧・統計・薬価のExcel出力

use crate::error::{PharmaError, Result};
use crate::prices::PriceTable;
use pharma_compare_common::{Document, DocumentStats};
use rust_xlsxwriter::*;
use std::collections::{BTreeMap, HashSet};
use std::path::Path;

const INVENTORY_HEADERS: [&str; 7] = [
    "製品カテゴリ",
    "区分",
    "製品名",
    "文書タイプ",
    "ファイル名",
    "ページ数",
    "セクション数",
];

/// シート名に使えない文字
const INVALID_SHEET_CHARS: &[char] = &['[', ']', ':', '*', '?', '/', '\\'];
const MAX_SHEET_NAME_CHARS: usize = 31;

pub fn generate_excel(
    documents: &[Document],
    stats: &DocumentStats,
    prices: &BTreeMap<String, PriceTable>,
    output_path: &Path,
) -> Result<()> {
    let mut workbook = Workbook::new();
    let header_format = Format::new()
        .set_bold()
        .set_background_color(Color::RGB(0xF5F5F5))
        .set_border(FormatBorder::Thin)
        .set_border_color(Color::RGB(0xAAAAAA));

    write_inventory(&mut workbook, documents, &header_format).map_err(excel_err)?;
    write_stats(&mut workbook, stats, &header_format).map_err(excel_err)?;

    let mut used_names: HashSet<String> =
        ["文書一覧", "統計"].iter().map(|n| n.to_lowercase()).collect();
    for table in prices.values() {
        let sheet_name = unique_sheet_name(price_sheet_name(&table.category), &mut used_names);
        write_price_table(&mut workbook, table, &sheet_name, &header_format).map_err(excel_err)?;
    }

    workbook.save(output_path).map_err(excel_err)?;
    Ok(())
}

fn write_inventory(
    workbook: &mut Workbook,
    documents: &[Document],
    header_format: &Format,
) -> std::result::Result<(), XlsxError> {
    let worksheet = workbook.add_worksheet();
    worksheet.set_name("文書一覧")?;

    for (col, header) in INVENTORY_HEADERS.iter().enumerate() {
        worksheet.write_string_with_format(0, col as u16, *header, header_format)?;
    }
    worksheet.set_column_width(2, 20)?;
    worksheet.set_column_width(3, 22)?;
    worksheet.set_column_width(4, 40)?;
    worksheet.set_freeze_panes(1, 0)?;

    for (i, doc) in documents.iter().enumerate() {
        let row = i as u32 + 1;
        let company = doc.company_type.map(|c| c.dir_name()).unwrap_or("");
        worksheet.write_string(row, 0, &doc.product_type)?;
        worksheet.write_string(row, 1, company)?;
        worksheet.write_string(row, 2, &doc.product_name)?;
        worksheet.write_string(row, 3, doc.doc_type.label())?;
        worksheet.write_string(row, 4, &doc.file_name)?;
        if let Some(pages) = doc.pages {
            worksheet.write_number(row, 5, pages as f64)?;
        }
        worksheet.write_number(row, 6, doc.sections.len() as f64)?;
    }

    Ok(())
}

fn write_stats(
    workbook: &mut Workbook,
    stats: &DocumentStats,
    header_format: &Format,
) -> std::result::Result<(), XlsxError> {
    let worksheet = workbook.add_worksheet();
    worksheet.set_name("統計")?;
    worksheet.set_column_width(0, 24)?;

    worksheet.write_string_with_format(0, 0, "総文書数", header_format)?;
    worksheet.write_number(0, 1, stats.total_docs as f64)?;

    let blocks = [
        ("製品カテゴリ別", &stats.by_product_type),
        ("会社区分別", &stats.by_company),
        ("文書タイプ別", &stats.by_type),
        ("製品別", &stats.by_product),
    ];

    let mut row = 2u32;
    for (title, counts) in blocks {
        worksheet.write_string_with_format(row, 0, title, header_format)?;
        worksheet.write_string_with_format(row, 1, "件数", header_format)?;
        row += 1;
        for (label, count) in counts {
            worksheet.write_string(row, 0, label)?;
            worksheet.write_number(row, 1, *count as f64)?;
            row += 1;
        }
        row += 1;
    }

    Ok(())
}

fn write_price_table(
    workbook: &mut Workbook,
    table: &PriceTable,
    sheet_name: &str,
    header_format: &Format,
) -> std::result::Result<(), XlsxError> {
    let worksheet = workbook.add_worksheet();
    worksheet.set_name(sheet_name)?;

    for (col, header) in table.headers.iter().enumerate() {
        worksheet.write_string_with_format(0, col as u16, header, header_format)?;
    }
    for (i, cells) in table.rows.iter().enumerate() {
        for (col, cell) in cells.iter().enumerate() {
            worksheet.write_string(i as u32 + 1, col as u16, cell)?;
        }
    }
    worksheet.set_freeze_panes(1, 0)?;

    Ok(())
}

/// 薬価区分からシート名を作る（禁止文字を除去し31文字以内）
pub fn price_sheet_name(category: &str) -> String {
    let name: String = format!("薬価_{}", category)
        .chars()
        .filter(|c| !INVALID_SHEET_CHARS.contains(c))
        .take(MAX_SHEET_NAME_CHARS)
        .collect();
    // 末尾のアポストロフィはシート名に使えない
    name.trim_end_matches('\'').to_string()
}

/// 使用済みのシート名と重ならない名前にする（Excelは大文字小文字を区別しない）
///
/// 重なる場合は `_2`, `_3` ... を付け、31文字に収まるよう元の名前を切り詰める。
pub fn unique_sheet_name(base: String, used: &mut HashSet<String>) -> String {
    if used.insert(base.to_lowercase()) {
        return base;
    }

    let mut n = 2;
    loop {
        let suffix = format!("_{}", n);
        let keep = MAX_SHEET_NAME_CHARS - suffix.chars().count();
        let candidate: String = base.chars().take(keep).chain(suffix.chars()).collect();
        if used.insert(candidate.to_lowercase()) {
            return candidate;
        }
        n += 1;
    }
}

fn excel_err(e: XlsxError) -> PharmaError {
    PharmaError::ExcelGeneration(e.to_string())
}
