//! 医薬品文書ローダー
//!
//! `<data_dir>/<製品カテゴリ>/<自社|他社>/<製品名>/` 配下のPDF・XMLを読み込み、
//! 文書タイプ判定とページ単位のセクション分割を行う。

pub mod cache;
mod pdf;
mod xml;

pub use cache::CacheFile;

use crate::error::{PharmaError, Result};
use pharma_compare_common::{
    clean_text, detect_document_type, extract_sections, join_pages, CompanyType, DocType, Document,
    Section,
};
use rayon::prelude::*;
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing::{debug, info, warn};
use walkdir::WalkDir;

const XML_HEADING: &str = "電子添文";

/// 製品カテゴリごとの製品一覧
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ProductCatalog {
    pub product_type: String,
    #[serde(rename = "自社")]
    pub own: Vec<String>,
    #[serde(rename = "他社")]
    pub competitor: Vec<String>,
}

impl ProductCatalog {
    pub fn products(&self, company: CompanyType) -> &[String] {
        match company {
            CompanyType::Own => &self.own,
            CompanyType::Competitor => &self.competitor,
        }
    }
}

pub struct DocumentLoader {
    data_dir: PathBuf,
    product_types: Vec<String>,
    cache: Option<Mutex<CacheFile>>,
}

impl DocumentLoader {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
            product_types: crate::config::DEFAULT_PRODUCT_TYPES
                .iter()
                .map(|s| s.to_string())
                .collect(),
            cache: None,
        }
    }

    pub fn with_product_types(mut self, product_types: Vec<String>) -> Self {
        self.product_types = product_types;
        self
    }

    /// 抽出キャッシュを有効化（既存キャッシュを読み込む）
    pub fn with_cache(mut self, enabled: bool) -> Self {
        self.cache = enabled.then(|| Mutex::new(CacheFile::load(&self.data_dir)));
        self
    }

    /// データフォルダが存在しなければエラー
    pub fn ensure_data_dir(&self) -> Result<()> {
        if !self.data_dir.is_dir() {
            return Err(PharmaError::FolderNotFound(self.data_dir.display().to_string()));
        }
        Ok(())
    }

    /// PDFファイルを読み込む
    pub fn load_pdf(&self, file_path: &Path) -> Result<Document> {
        let page_texts = pdf::extract_page_texts(file_path)?;
        Ok(build_pdf_document(file_path, &page_texts))
    }

    /// XMLファイル（電子添文）を読み込む
    pub fn load_xml(&self, file_path: &Path) -> Result<Document> {
        let text = xml::extract_text(file_path)?;
        Ok(build_xml_document(file_path, text))
    }

    /// 拡張子に応じて読み込む（キャッシュ有効時はハッシュ一致で再利用）
    pub fn load_file(&self, file_path: &Path) -> Result<Document> {
        let Some(cache) = &self.cache else {
            return self.extract(file_path);
        };

        let (hash, size) = cache::compute_file_hash(file_path)?;
        let cached = lock(cache).get(&hash).cloned();
        if let Some(doc) = cached {
            debug!("キャッシュヒット: {}", file_path.display());
            lock(cache).mark_seen(&hash);
            return Ok(rebind_to_path(doc, file_path));
        }

        let doc = self.extract(file_path)?;
        lock(cache).insert(hash, size, doc.clone());
        Ok(doc)
    }

    fn extract(&self, file_path: &Path) -> Result<Document> {
        match file_path.extension().and_then(|e| e.to_str()) {
            Some("pdf") => self.load_pdf(file_path),
            Some("xml") => self.load_xml(file_path),
            _ => Err(PharmaError::InvalidArgument(format!(
                "対応していない拡張子: {}",
                file_path.display()
            ))),
        }
    }

    /// 指定された製品カテゴリ・会社区分の文書を読み込む
    ///
    /// フォルダが無ければ空。読み込みに失敗したファイルは警告してスキップする。
    pub fn load_product_documents(&self, product_type: &str, company: CompanyType) -> Vec<Document> {
        let folder = self.data_dir.join(product_type).join(company.dir_name());

        if !folder.exists() {
            warn!("フォルダが存在しません: {}", folder.display());
            return Vec::new();
        }

        let pdf_files = collect_files(&folder, "pdf");
        let xml_files = collect_files(&folder, "xml");
        info!(
            "{}個のファイルを発見 (PDF: {}, XML: {}) - {}",
            pdf_files.len() + xml_files.len(),
            pdf_files.len(),
            xml_files.len(),
            folder.display()
        );

        let files: Vec<PathBuf> = pdf_files.into_iter().chain(xml_files).collect();

        files
            .par_iter()
            .filter_map(|path| match self.load_file(path) {
                Ok(mut doc) => {
                    doc.product_type = product_type.to_string();
                    doc.company_type = Some(company);
                    doc.product_name = path
                        .parent()
                        .and_then(|p| p.file_name())
                        .map(|n| n.to_string_lossy().to_string())
                        .unwrap_or_default();
                    Some(doc)
                }
                Err(e) => {
                    warn!("読み込みをスキップ: {}", e);
                    None
                }
            })
            .collect()
    }

    /// 全製品カテゴリ・全会社区分の文書を読み込む
    pub fn load_all_documents(&self) -> Vec<Document> {
        self.load_all_documents_with(|_, _, _| {})
    }

    /// 全文書を読み込み、カテゴリ×会社区分ごとに `on_loaded(カテゴリ, 会社区分, 件数)` を呼ぶ
    pub fn load_all_documents_with<F>(&self, mut on_loaded: F) -> Vec<Document>
    where
        F: FnMut(&str, CompanyType, usize),
    {
        let mut all_documents = Vec::new();

        for product_type in &self.product_types {
            if !self.data_dir.join(product_type).exists() {
                warn!("{}フォルダが存在しません", product_type);
                continue;
            }

            for company in CompanyType::ALL {
                let docs = self.load_product_documents(product_type, company);
                on_loaded(product_type, company, docs.len());
                all_documents.extend(docs);
            }
        }

        // 全件走査後なので、今回見つからなかったファイルのエントリは不要
        if let Some(cache) = &self.cache {
            let removed = lock(cache).retain_seen();
            if removed > 0 {
                debug!("キャッシュから{}件の古いエントリを削除", removed);
            }
        }

        all_documents
    }

    /// データフォルダに実在する製品カテゴリ
    pub fn existing_product_types(&self) -> Vec<&str> {
        self.product_types
            .iter()
            .filter(|t| self.data_dir.join(t.as_str()).exists())
            .map(|t| t.as_str())
            .collect()
    }

    /// 利用可能な全製品リストを取得
    pub fn available_products(&self) -> Vec<ProductCatalog> {
        self.existing_product_types()
            .into_iter()
            .map(|product_type| {
                let base = self.data_dir.join(product_type);
                ProductCatalog {
                    product_type: product_type.to_string(),
                    own: list_subdirs(&base.join(CompanyType::Own.dir_name())),
                    competitor: list_subdirs(&base.join(CompanyType::Competitor.dir_name())),
                }
            })
            .collect()
    }

    /// キャッシュを保存（無効時は何もしない）
    pub fn save_cache(&self) -> Result<()> {
        if let Some(cache) = &self.cache {
            lock(cache).save(&self.data_dir)?;
        }
        Ok(())
    }
}

/// ページテキストからPDF文書を組み立てる
pub fn build_pdf_document(file_path: &Path, page_texts: &[String]) -> Document {
    let file_name = file_name_of(file_path);
    let full_text = join_pages(page_texts);
    let sections = extract_sections(&full_text, &file_name);

    Document {
        full_text,
        sections,
        doc_type: detect_document_type(&file_name),
        file_path: file_path.display().to_string(),
        pages: Some(page_texts.len()),
        file_name,
        product_type: String::new(),
        company_type: None,
        product_name: String::new(),
    }
}

/// XMLテキストから電子添文を組み立てる
pub fn build_xml_document(file_path: &Path, text: String) -> Document {
    let file_name = file_name_of(file_path);
    let sections = vec![Section {
        text: clean_text(&text),
        page: None,
        heading: Some(XML_HEADING.to_string()),
        file_name: file_name.clone(),
    }];

    Document {
        full_text: text,
        sections,
        file_name,
        file_path: file_path.display().to_string(),
        pages: None,
        doc_type: DocType::PackageInsert,
        product_type: String::new(),
        company_type: None,
        product_name: String::new(),
    }
}

/// キャッシュから取り出した文書を現在のパスに合わせる
///
/// キャッシュは内容ハッシュで引くので、同一内容の別名ファイルやリネーム後の
/// ファイルでもヒットする。ファイル名から決まる項目は必ず再計算する。
fn rebind_to_path(mut doc: Document, file_path: &Path) -> Document {
    doc.file_name = file_name_of(file_path);
    doc.file_path = file_path.display().to_string();
    doc.doc_type = detect_document_type(&doc.file_name);
    for section in &mut doc.sections {
        section.file_name = doc.file_name.clone();
    }
    doc
}

fn file_name_of(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_default()
}

/// 拡張子が一致するファイルを再帰的に収集（パス順）
fn collect_files(folder: &Path, extension: &str) -> Vec<PathBuf> {
    let mut files: Vec<PathBuf> = WalkDir::new(folder)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
        .map(|e| e.into_path())
        .filter(|p| p.extension().map(|e| e == extension).unwrap_or(false))
        .collect();
    files.sort();
    files
}

fn list_subdirs(dir: &Path) -> Vec<String> {
    let Ok(entries) = std::fs::read_dir(dir) else {
        return Vec::new();
    };

    let mut names: Vec<String> = entries
        .flatten()
        .filter(|e| e.path().is_dir())
        .map(|e| e.file_name().to_string_lossy().to_string())
        .collect();
    names.sort();
    names
}

fn lock(cache: &Mutex<CacheFile>) -> std::sync::MutexGuard<'_, CacheFile> {
    cache.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}
