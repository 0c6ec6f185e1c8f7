use clap::{Parser, Subcommand};
use pharma_compare_common::{CompanyType, DocType};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "pharma-compare")]
#[command(about = "医薬品比較用 文書・薬価データ読み込みツール", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// 詳細ログを出力
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// データフォルダ（省略時は設定ファイルの値）
    #[arg(short, long, global = true)]
    pub data_dir: Option<PathBuf>,

    /// 抽出キャッシュを使わない
    #[arg(long, global = true)]
    pub no_cache: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// 利用可能な製品一覧を表示
    Products,

    /// 全文書を読み込んで概要を表示
    Load {
        /// 読み込んだ文書をJSONで保存
        #[arg(long)]
        json: Option<PathBuf>,
    },

    /// 文書の統計情報を表示
    Stats {
        /// 製品カテゴリ別の内訳を表示する文書タイプ
        #[arg(long, default_value = "インタビューフォーム")]
        doc_type: DocType,
    },

    /// 薬価データを表示
    Prices {
        /// 区分（注射剤/内服薬 など）
        #[arg(short, long)]
        category: Option<String>,

        /// 品名などで行を検索
        #[arg(short, long)]
        find: Option<String>,
    },

    /// 全文書をキーワード検索
    Search {
        /// 検索キーワード（空白区切りでAND）
        #[arg(required = true)]
        query: String,

        /// 製品カテゴリで絞り込み
        #[arg(short, long)]
        product_type: Option<String>,

        /// 会社区分で絞り込み (自社/他社)
        #[arg(short, long)]
        company: Option<CompanyType>,

        /// 文書タイプで絞り込み
        #[arg(short = 't', long)]
        doc_type: Option<DocType>,

        /// 最大表示件数
        #[arg(short, long, default_value = "20")]
        limit: usize,

        /// JSONで出力
        #[arg(long)]
        json: bool,
    },

    /// 自社・他社製品の文書カバレッジを比較
    Compare {
        /// 製品カテゴリ
        #[arg(required = true)]
        product_type: String,

        /// 欠けている文書タイプも表示
        #[arg(long)]
        gaps: bool,
    },

    /// 文書一覧・統計・薬価をExcel/JSONに出力
    Export {
        /// 出力ファイル/ディレクトリ
        #[arg(required = true)]
        output: PathBuf,

        /// 出力形式 (excel/json/both)
        #[arg(short, long, default_value = "excel")]
        format: ExportFormat,

        /// ファイル名（ディレクトリ指定時）
        #[arg(short, long, default_value = "医薬品比較データ")]
        title: String,
    },

    /// キャッシュ管理
    Cache {
        /// キャッシュを削除
        #[arg(long)]
        clear: bool,

        /// キャッシュ情報を表示
        #[arg(long)]
        info: bool,
    },

    /// 設定を表示/編集
    Config {
        /// OpenAI APIキーを設定
        #[arg(long)]
        set_api_key: Option<String>,

        /// データフォルダを設定
        #[arg(long)]
        set_data_dir: Option<PathBuf>,

        /// 設定を表示
        #[arg(long)]
        show: bool,
    },
}

#[derive(Clone, Debug, Default, PartialEq)]
pub enum ExportFormat {
    #[default]
    Excel,
    Json,
    Both,
}

impl std::str::FromStr for ExportFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "excel" | "xlsx" => Ok(ExportFormat::Excel),
            "json" => Ok(ExportFormat::Json),
            "both" => Ok(ExportFormat::Both),
            _ => Err(format!("Unknown format: {}. Use excel, json, or both", s)),
        }
    }
}
