//! 文書抽出キャッシュモジュール
//!
//! ファイル内容のSHA-256をキーにして抽出済み文書をキャッシュし、
//! 同じPDF/XMLの再抽出をスキップする。

use crate::error::Result;
use pharma_compare_common::Document;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::collections::{HashMap, HashSet};
use std::fs::File;
use std::io::{BufReader, BufWriter, Read};
use std::path::{Path, PathBuf};
use tracing::warn;

const CACHE_FILE_NAME: &str = ".doc-cache.json";

/// キャッシュファイルの構造
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheFile {
    /// バージョン（互換性チェック用）
    version: u32,
    /// ファイルハッシュ → 抽出結果のマップ
    entries: HashMap<String, CacheEntry>,
    /// 今回の読み込みで参照されたハッシュ
    #[serde(skip)]
    seen: HashSet<String>,
}

/// キャッシュエントリ
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheEntry {
    pub file_name: String,
    pub file_size: u64,
    /// 登録日時（RFC3339）
    #[serde(default)]
    pub cached_at: String,
    pub document: Document,
}

impl CacheFile {
    const CURRENT_VERSION: u32 = 1;

    pub fn cache_path(data_dir: &Path) -> PathBuf {
        data_dir.join(CACHE_FILE_NAME)
    }

    /// キャッシュファイルを読み込み（壊れていれば空）
    pub fn load(data_dir: &Path) -> Self {
        let cache_path = Self::cache_path(data_dir);
        if !cache_path.exists() {
            return Self::default();
        }

        let file = match File::open(&cache_path) {
            Ok(f) => f,
            Err(_) => return Self::default(),
        };

        match serde_json::from_reader::<_, CacheFile>(BufReader::new(file)) {
            Ok(cache) if cache.version == Self::CURRENT_VERSION => cache,
            Ok(_) => {
                warn!("キャッシュバージョン不一致、再生成します");
                Self::default()
            }
            Err(e) => {
                warn!("キャッシュの読み込みに失敗、再生成します: {}", e);
                Self::default()
            }
        }
    }

    pub fn save(&self, data_dir: &Path) -> Result<()> {
        let file = File::create(Self::cache_path(data_dir))?;
        serde_json::to_writer(BufWriter::new(file), self)?;
        Ok(())
    }

    /// キャッシュファイルを削除（存在しなければfalse）
    pub fn clear(data_dir: &Path) -> Result<bool> {
        let cache_path = Self::cache_path(data_dir);
        if !cache_path.exists() {
            return Ok(false);
        }
        std::fs::remove_file(cache_path)?;
        Ok(true)
    }

    pub fn get(&self, hash: &str) -> Option<&Document> {
        self.entries.get(hash).map(|e| &e.document)
    }

    pub fn mark_seen(&mut self, hash: &str) {
        self.seen.insert(hash.to_string());
    }

    /// 今回参照されなかったエントリを削除し、削除件数を返す
    pub fn retain_seen(&mut self) -> usize {
        let before = self.entries.len();
        let seen = &self.seen;
        self.entries.retain(|hash, _| seen.contains(hash));
        before - self.entries.len()
    }

    pub fn insert(&mut self, hash: String, file_size: u64, document: Document) {
        self.seen.insert(hash.clone());
        self.entries.insert(hash, CacheEntry {
            file_name: document.file_name.clone(),
            file_size,
            cached_at: chrono::Local::now().to_rfc3339(),
            document,
        });
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for CacheFile {
    fn default() -> Self {
        Self {
            version: Self::CURRENT_VERSION,
            entries: HashMap::new(),
            seen: HashSet::new(),
        }
    }
}

/// ファイル内容のハッシュとサイズ
pub fn compute_file_hash(path: &Path) -> Result<(String, u64)> {
    let mut file = File::open(path)?;
    let mut hasher = Sha256::new();
    let mut buffer = [0u8; 8192];
    let mut size = 0u64;

    loop {
        let n = file.read(&mut buffer)?;
        if n == 0 {
            break;
        }
        hasher.update(&buffer[..n]);
        size += n as u64;
    }

    Ok((hex::encode(hasher.finalize()), size))
}
