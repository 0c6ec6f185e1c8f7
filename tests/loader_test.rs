//! 文書ローダーの統合テスト
//!
//! 一時フォルダに 製品カテゴリ/会社区分/製品名 の構成を作って読み込む

use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Object, Stream};
use pharma_compare_common::{CompanyType, DocType, DocumentStats};
use pharma_compare_rust::loader::CacheFile;
use pharma_compare_rust::DocumentLoader;
use std::path::Path;
use tempfile::{tempdir, TempDir};

/// 1ページ1行のテキストを持つPDFを作成
fn write_pdf(path: &Path, pages: &[&str]) {
    let mut doc = lopdf::Document::with_version("1.5");
    let pages_id = doc.new_object_id();
    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Courier",
    });
    let resources_id = doc.add_object(dictionary! {
        "Font" => dictionary! { "F1" => font_id },
    });

    let mut kids: Vec<Object> = Vec::new();
    for text in pages {
        let content = Content {
            operations: vec![
                Operation::new("BT", vec![]),
                Operation::new("Tf", vec!["F1".into(), 24.into()]),
                Operation::new("Td", vec![100.into(), 600.into()]),
                Operation::new("Tj", vec![Object::string_literal(*text)]),
                Operation::new("ET", vec![]),
            ],
        };
        let content_id = doc.add_object(Stream::new(dictionary! {}, content.encode().unwrap()));
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
        });
        kids.push(page_id.into());
    }

    let pages_dict = dictionary! {
        "Type" => "Pages",
        "Kids" => kids,
        "Count" => pages.len() as i64,
        "Resources" => resources_id,
        "MediaBox" => vec![0.into(), 0.into(), 595.into(), 842.into()],
    };
    doc.objects.insert(pages_id, Object::Dictionary(pages_dict));
    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);
    doc.save(path).expect("PDF保存失敗");
}

/// テスト用データフォルダ
///
/// IBD製剤/自社/製品A: IF(PDF 2ページ) + 電子添文(XML)
/// IBD製剤/他社/製品Z: RMP(PDF 1ページ)
/// 抗うつ製剤/自社: 空、他社フォルダなし
fn create_data_dir() -> TempDir {
    let dir = tempdir().expect("Failed to create temp dir");
    let root = dir.path();

    let own_a = root.join("IBD製剤").join("自社").join("製品A");
    let other_z = root.join("IBD製剤").join("他社").join("製品Z");
    std::fs::create_dir_all(&own_a).unwrap();
    std::fs::create_dir_all(&other_z).unwrap();
    std::fs::create_dir_all(root.join("抗うつ製剤").join("自社")).unwrap();

    write_pdf(&own_a.join("製品A_IF.pdf"), &["Dosage and administration", "Adverse reactions"]);
    write_pdf(&other_z.join("製品Z_RMP.pdf"), &["Safety specification"]);
    std::fs::write(
        own_a.join("製品A.xml"),
        r#"<?xml version="1.0" encoding="UTF-8"?>
<PackIns><Name>製品A錠</Name><Indication>潰瘍性大腸炎</Indication></PackIns>"#,
    )
    .unwrap();
    // 対象外の拡張子
    std::fs::write(own_a.join("memo.txt"), "メモ").unwrap();

    dir
}

#[test]
fn test_available_products() {
    let dir = create_data_dir();
    let loader = DocumentLoader::new(dir.path());

    let catalog = loader.available_products();
    assert_eq!(catalog.len(), 2);
    assert_eq!(catalog[0].product_type, "IBD製剤");
    assert_eq!(catalog[0].own, vec!["製品A".to_string()]);
    assert_eq!(catalog[0].competitor, vec!["製品Z".to_string()]);
    assert_eq!(catalog[1].product_type, "抗うつ製剤");
    assert!(catalog[1].products(CompanyType::Own).is_empty());
    assert!(catalog[1].products(CompanyType::Competitor).is_empty());
}

#[test]
fn test_load_product_documents_metadata() {
    let dir = create_data_dir();
    let loader = DocumentLoader::new(dir.path());

    let docs = loader.load_product_documents("IBD製剤", CompanyType::Own);
    assert_eq!(docs.len(), 2);

    // PDFが先、XMLが後
    let pdf = &docs[0];
    assert_eq!(pdf.file_name, "製品A_IF.pdf");
    assert_eq!(pdf.doc_type, DocType::InterviewForm);
    assert_eq!(pdf.pages, Some(2));
    assert_eq!(pdf.sections.len(), 2);
    assert_eq!(pdf.sections[0].page, Some(1));
    assert!(pdf.full_text.contains("Dosage"));
    assert_eq!(pdf.product_type, "IBD製剤");
    assert_eq!(pdf.company_type, Some(CompanyType::Own));
    assert_eq!(pdf.product_name, "製品A");

    let xml = &docs[1];
    assert_eq!(xml.doc_type, DocType::PackageInsert);
    assert_eq!(xml.pages, None);
    assert_eq!(xml.sections.len(), 1);
    assert_eq!(xml.sections[0].heading.as_deref(), Some("電子添文"));
    assert!(xml.sections[0].text.contains("潰瘍性大腸炎"));
}

#[test]
fn test_load_all_documents_and_stats() {
    let dir = create_data_dir();
    let loader = DocumentLoader::new(dir.path());

    let mut loaded = Vec::new();
    let docs = loader.load_all_documents_with(|product_type, company, count| {
        loaded.push((product_type.to_string(), company, count));
    });

    assert_eq!(docs.len(), 3);
    // 血漿分画製剤フォルダは無いのでスキップ
    assert_eq!(loaded.len(), 4);
    assert_eq!(loaded[0], ("IBD製剤".to_string(), CompanyType::Own, 2));
    assert_eq!(loaded[1], ("IBD製剤".to_string(), CompanyType::Competitor, 1));
    assert_eq!(loaded[3], ("抗うつ製剤".to_string(), CompanyType::Competitor, 0));

    let stats = DocumentStats::from_documents(&docs);
    assert_eq!(stats.total_docs, 3);
    assert_eq!(stats.by_company["自社"], 2);
    assert_eq!(stats.by_company["他社"], 1);
    assert_eq!(stats.by_type["医薬品リスク管理計画"], 1);
}

#[test]
fn test_product_name_is_parent_folder() {
    let dir = tempdir().expect("Failed to create temp dir");
    let nested = dir.path().join("IBD製剤").join("他社").join("製品Y").join("2023年版");
    std::fs::create_dir_all(&nested).unwrap();
    std::fs::write(nested.join("製品Y.xml"), "<Doc>本文</Doc>").unwrap();

    let loader = DocumentLoader::new(dir.path());
    let docs = loader.load_product_documents("IBD製剤", CompanyType::Competitor);
    assert_eq!(docs.len(), 1);
    assert_eq!(docs[0].product_name, "2023年版");
}

#[test]
fn test_custom_product_types() {
    let dir = create_data_dir();
    let loader = DocumentLoader::new(dir.path()).with_product_types(vec!["抗うつ製剤".to_string()]);

    assert!(loader.load_all_documents().is_empty());
    assert_eq!(loader.available_products().len(), 1);
}

#[test]
fn test_cache_is_saved_and_reused() {
    let dir = create_data_dir();

    let loader = DocumentLoader::new(dir.path()).with_cache(true);
    let first = loader.load_all_documents();
    loader.save_cache().expect("キャッシュ保存失敗");

    let cache = CacheFile::load(dir.path());
    assert_eq!(cache.len(), 3);

    let loader = DocumentLoader::new(dir.path()).with_cache(true);
    let second = loader.load_all_documents();
    assert_eq!(second.len(), first.len());
    for (a, b) in first.iter().zip(&second) {
        assert_eq!(a.file_path, b.file_path);
        assert_eq!(a.full_text, b.full_text);
        assert_eq!(a.product_name, b.product_name);
    }

    assert!(CacheFile::clear(dir.path()).unwrap());
    assert!(!CacheFile::clear(dir.path()).unwrap());
}

#[test]
fn test_cache_disabled_does_not_write() {
    let dir = create_data_dir();
    let loader = DocumentLoader::new(dir.path());
    loader.load_all_documents();
    loader.save_cache().unwrap();

    assert!(!CacheFile::cache_path(dir.path()).exists());
}

#[test]
fn test_cache_hit_after_rename_redetects_doc_type() {
    let dir = tempdir().expect("Failed to create temp dir");
    let product_dir = dir.path().join("IBD製剤").join("自社").join("製品A");
    std::fs::create_dir_all(&product_dir).unwrap();
    write_pdf(&product_dir.join("資料.pdf"), &["Interview form"]);

    let loader = DocumentLoader::new(dir.path()).with_cache(true);
    let docs = loader.load_product_documents("IBD製剤", CompanyType::Own);
    assert_eq!(docs[0].doc_type, DocType::Other);
    loader.save_cache().unwrap();

    std::fs::rename(product_dir.join("資料.pdf"), product_dir.join("製品A_IF.pdf")).unwrap();

    let loader = DocumentLoader::new(dir.path()).with_cache(true);
    let docs = loader.load_product_documents("IBD製剤", CompanyType::Own);
    assert_eq!(docs.len(), 1);
    assert_eq!(docs[0].file_name, "製品A_IF.pdf");
    assert_eq!(docs[0].doc_type, DocType::InterviewForm);
    assert_eq!(docs[0].sections[0].file_name, "製品A_IF.pdf");
}

#[test]
fn test_cache_drops_entries_of_deleted_files() {
    let dir = create_data_dir();

    let loader = DocumentLoader::new(dir.path()).with_cache(true);
    loader.load_all_documents();
    loader.save_cache().unwrap();
    assert_eq!(CacheFile::load(dir.path()).len(), 3);

    std::fs::remove_file(dir.path().join("IBD製剤").join("他社").join("製品Z").join("製品Z_RMP.pdf")).unwrap();

    let loader = DocumentLoader::new(dir.path()).with_cache(true);
    assert_eq!(loader.load_all_documents().len(), 2);
    loader.save_cache().unwrap();
    assert_eq!(CacheFile::load(dir.path()).len(), 2);
}
