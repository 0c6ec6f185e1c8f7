//! 薬価ファイル読み込みの統合テスト
//!
//! rust_xlsxwriterで作ったExcelをcalamine経由で読み戻す

use pharma_compare_rust::prices::{load_drug_prices, load_price_table, PRICE_DIR_NAME};
use rust_xlsxwriter::Workbook;
use std::path::Path;
use tempfile::tempdir;

fn write_price_xlsx(path: &Path, rows: &[(&str, &str, f64)]) {
    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();
    worksheet.write_string(0, 0, "品名").unwrap();
    worksheet.write_string(0, 1, "規格").unwrap();
    worksheet.write_string(0, 2, "薬価").unwrap();

    for (i, (name, spec, price)) in rows.iter().enumerate() {
        let row = i as u32 + 1;
        worksheet.write_string(row, 0, *name).unwrap();
        worksheet.write_string(row, 1, *spec).unwrap();
        worksheet.write_number(row, 2, *price).unwrap();
    }

    workbook.save(path).expect("Excel保存失敗");
}

#[test]
fn test_load_price_table() {
    let dir = tempdir().expect("Failed to create temp dir");
    let path = dir.path().join("tp20240417_内服薬.xlsx");
    write_price_xlsx(&path, &[
        ("セルトラリン錠25mg", "25mg1錠", 30.1),
        ("エスシタロプラム錠10mg", "10mg1錠", 120.0),
    ]);

    let table = load_price_table(&path).expect("薬価読み込み失敗");
    assert_eq!(table.category, "内服薬");
    assert_eq!(table.source_file, "tp20240417_内服薬.xlsx");
    assert_eq!(table.headers, vec!["品名", "規格", "薬価"]);
    assert_eq!(table.len(), 2);
    assert_eq!(table.rows[0][2], "30.1");
    // 整数値は小数点なし
    assert_eq!(table.rows[1][2], "120");

    let found = table.find_rows("エスシタロプラム");
    assert_eq!(found.len(), 1);
    assert_eq!(found[0][1], "10mg1錠");
}

#[test]
fn test_load_drug_prices_categories() {
    let dir = tempdir().expect("Failed to create temp dir");
    let price_dir = dir.path().join(PRICE_DIR_NAME);
    std::fs::create_dir_all(&price_dir).unwrap();

    write_price_xlsx(&price_dir.join("01_注射剤.xlsx"), &[("献血アルブミン", "5%50mL", 4500.0)]);
    write_price_xlsx(&price_dir.join("02_内服.xlsx"), &[("A錠", "1錠", 10.0)]);
    write_price_xlsx(&price_dir.join("外用薬.xlsx"), &[("B軟膏", "1g", 20.0), ("C貼付剤", "1枚", 30.0)]);
    std::fs::write(price_dir.join("readme.txt"), "対象外").unwrap();

    let prices = load_drug_prices(dir.path()).expect("薬価読み込み失敗");
    assert_eq!(prices.len(), 3);
    assert_eq!(prices["注射剤"].len(), 1);
    assert_eq!(prices["内服薬"].source_file, "02_内服.xlsx");
    assert_eq!(prices["外用薬"].len(), 2);
}

#[test]
fn test_same_category_later_file_wins() {
    let dir = tempdir().expect("Failed to create temp dir");
    let price_dir = dir.path().join(PRICE_DIR_NAME);
    std::fs::create_dir_all(&price_dir).unwrap();

    write_price_xlsx(&price_dir.join("2023_注射剤.xlsx"), &[("旧", "1瓶", 1.0)]);
    write_price_xlsx(&price_dir.join("2024_注射剤.xlsx"), &[("新", "1瓶", 2.0), ("新2", "1瓶", 3.0)]);

    let prices = load_drug_prices(dir.path()).unwrap();
    assert_eq!(prices.len(), 1);
    assert_eq!(prices["注射剤"].source_file, "2024_注射剤.xlsx");
    assert_eq!(prices["注射剤"].len(), 2);
}

#[test]
fn test_missing_price_dir_is_empty() {
    let dir = tempdir().expect("Failed to create temp dir");
    let prices = load_drug_prices(dir.path()).unwrap();
    assert!(prices.is_empty());
}

#[test]
fn test_broken_xlsx_is_skipped() {
    let dir = tempdir().expect("Failed to create temp dir");
    let price_dir = dir.path().join(PRICE_DIR_NAME);
    std::fs::create_dir_all(&price_dir).unwrap();
    std::fs::write(price_dir.join("壊れた.xlsx"), b"not a zip").unwrap();
    write_price_xlsx(&price_dir.join("注射剤.xlsx"), &[("献血グロベニン", "2.5g", 30000.0)]);

    let prices = load_drug_prices(dir.path()).unwrap();
    assert_eq!(prices.len(), 1);
    assert!(prices.contains_key("注射剤"));

    assert!(load_price_table(&price_dir.join("壊れた.xlsx")).is_err());
}
