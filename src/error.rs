use thiserror::Error;

#[derive(Error, Debug)]
pub enum PharmaError {
    #[error("設定エラー: {0}")]
    Config(String),

    #[error("OpenAI APIキーが設定されていません。環境変数 OPENAI_API_KEY か `pharma-compare config --set-api-key YOUR_KEY` で設定してください")]
    MissingApiKey,

    #[error("フォルダが見つかりません: {0}")]
    FolderNotFound(String),

    #[error("PDFの読み込みに失敗: {0}")]
    PdfLoad(String),

    #[error("XMLの読み込みに失敗: {0}")]
    XmlLoad(String),

    #[error("薬価ファイルの読み込みに失敗: {0}")]
    PriceLoad(String),

    #[error("Excel生成エラー: {0}")]
    ExcelGeneration(String),

    #[error("不正な引数: {0}")]
    InvalidArgument(String),

    #[error("JSON解析エラー: {0}")]
    JsonParse(#[from] serde_json::Error),

    #[error("IOエラー: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Common(#[from] pharma_compare_common::Error),
}

pub type Result<T> = std::result::Result<T, PharmaError>;
