use crate::error::{PharmaError, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

const API_KEY_ENV: &str = "OPENAI_API_KEY";

/// 既定の製品カテゴリ
pub const DEFAULT_PRODUCT_TYPES: &[&str] = &["血漿分画製剤", "IBD製剤", "抗うつ製剤"];

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub openai_api_key: Option<String>,

    /// データフォルダ
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,

    /// 読み込む製品カテゴリ（フォルダ名）
    #[serde(default = "default_product_types")]
    pub product_types: Vec<String>,

    /// 抽出キャッシュを使う
    #[serde(default = "default_use_cache")]
    pub use_cache: bool,
}

fn default_data_dir() -> PathBuf {
    PathBuf::from("data")
}

fn default_product_types() -> Vec<String> {
    DEFAULT_PRODUCT_TYPES.iter().map(|s| s.to_string()).collect()
}

fn default_use_cache() -> bool {
    true
}

impl Default for Config {
    fn default() -> Self {
        Self {
            openai_api_key: None,
            data_dir: default_data_dir(),
            product_types: default_product_types(),
            use_cache: default_use_cache(),
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path()?)
    }

    pub fn load_from(config_path: &Path) -> Result<Self> {
        if config_path.exists() {
            let content = std::fs::read_to_string(config_path)?;
            let config: Config = serde_json::from_str(&content)?;
            Ok(config)
        } else {
            Ok(Self::default())
        }
    }

    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path()?)
    }

    pub fn save_to(&self, config_path: &Path) -> Result<()> {
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(config_path, content)?;
        Ok(())
    }

    pub fn config_path() -> Result<PathBuf> {
        let home = dirs::home_dir()
            .ok_or_else(|| PharmaError::Config("ホームディレクトリが見つかりません".into()))?;
        Ok(home.join(".config").join("pharma-compare").join("config.json"))
    }

    pub fn get_api_key(&self) -> Result<String> {
        // 環境変数を優先
        if let Ok(key) = std::env::var(API_KEY_ENV) {
            if !key.trim().is_empty() {
                return Ok(key);
            }
        }

        self.openai_api_key.clone().ok_or(PharmaError::MissingApiKey)
    }

    pub fn has_api_key(&self) -> bool {
        self.get_api_key().is_ok()
    }

    pub fn set_api_key(&mut self, key: String) -> Result<()> {
        self.openai_api_key = Some(key);
        self.save()
    }

    pub fn set_data_dir(&mut self, dir: PathBuf) -> Result<()> {
        self.data_dir = dir;
        self.save()
    }
}
