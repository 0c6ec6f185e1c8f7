//! 文書の共通型定義

use crate::error::Error;
use serde::{Deserialize, Serialize};

/// 文書タイプ
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum DocType {
    /// 電子添文（XML）
    #[serde(rename = "電子添文")]
    PackageInsert,
    /// インタビューフォーム
    #[serde(rename = "インタビューフォーム")]
    InterviewForm,
    /// 医薬品リスク管理計画
    #[serde(rename = "医薬品リスク管理計画")]
    RiskManagementPlan,
    /// 患者向け医薬品ガイド
    #[serde(rename = "患者向け医薬品ガイド")]
    PatientGuide,
    /// その他
    #[serde(rename = "その他")]
    Other,
}

impl DocType {
    /// 表示順の全タイプ
    pub const ALL: [DocType; 5] = [
        DocType::PackageInsert,
        DocType::InterviewForm,
        DocType::RiskManagementPlan,
        DocType::PatientGuide,
        DocType::Other,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            DocType::PackageInsert => "電子添文",
            DocType::InterviewForm => "インタビューフォーム",
            DocType::RiskManagementPlan => "医薬品リスク管理計画",
            DocType::PatientGuide => "患者向け医薬品ガイド",
            DocType::Other => "その他",
        }
    }
}

impl std::fmt::Display for DocType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

impl std::str::FromStr for DocType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "電子添文" | "insert" | "xml" => Ok(DocType::PackageInsert),
            "インタビューフォーム" | "if" => Ok(DocType::InterviewForm),
            "医薬品リスク管理計画" | "rmp" => Ok(DocType::RiskManagementPlan),
            "患者向け医薬品ガイド" | "guide" => Ok(DocType::PatientGuide),
            "その他" | "other" => Ok(DocType::Other),
            _ => Err(Error::UnknownDocType(s.to_string())),
        }
    }
}

/// 会社区分
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum CompanyType {
    #[serde(rename = "自社")]
    Own,
    #[serde(rename = "他社")]
    Competitor,
}

impl CompanyType {
    pub const ALL: [CompanyType; 2] = [CompanyType::Own, CompanyType::Competitor];

    /// データフォルダ上のディレクトリ名
    pub fn dir_name(&self) -> &'static str {
        match self {
            CompanyType::Own => "自社",
            CompanyType::Competitor => "他社",
        }
    }
}

impl std::fmt::Display for CompanyType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.dir_name())
    }
}

impl std::str::FromStr for CompanyType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "自社" | "own" => Ok(CompanyType::Own),
            "他社" | "competitor" => Ok(CompanyType::Competitor),
            _ => Err(Error::UnknownCompanyType(s.to_string())),
        }
    }
}

/// ページ（または文書全体）単位のセクション
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Section {
    pub text: String,
    pub page: Option<u32>,
    pub heading: Option<String>,
    pub file_name: String,
}

/// 読み込み済みの文書
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Document {
    pub full_text: String,
    pub sections: Vec<Section>,
    pub file_name: String,
    pub file_path: String,

    /// PDFのページ数（XMLはNone）
    #[serde(default)]
    pub pages: Option<usize>,

    pub doc_type: DocType,

    #[serde(default)]
    pub product_type: String,     // 製品カテゴリ

    #[serde(default)]
    pub company_type: Option<CompanyType>,

    #[serde(default)]
    pub product_name: String,     // 製品名（フォルダ名）
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_doc_type_serializes_as_label() {
        let json = serde_json::to_string(&DocType::InterviewForm).unwrap();
        assert_eq!(json, "\"インタビューフォーム\"");

        let parsed: DocType = serde_json::from_str("\"電子添文\"").unwrap();
        assert_eq!(parsed, DocType::PackageInsert);
    }

    #[test]
    fn test_company_type_from_str() {
        assert_eq!("自社".parse::<CompanyType>().unwrap(), CompanyType::Own);
        assert_eq!("Competitor".parse::<CompanyType>().unwrap(), CompanyType::Competitor);
        assert!("関連会社".parse::<CompanyType>().is_err());
    }

    #[test]
    fn test_doc_type_from_str_aliases() {
        assert_eq!("IF".parse::<DocType>().unwrap(), DocType::InterviewForm);
        assert_eq!("rmp".parse::<DocType>().unwrap(), DocType::RiskManagementPlan);
        assert!("添付文書PDF".parse::<DocType>().is_err());
    }

    #[test]
    fn test_document_json_is_camel_case() {
        let doc = Document {
            full_text: String::new(),
            sections: vec![],
            file_name: "a.xml".to_string(),
            file_path: "/data/a.xml".to_string(),
            pages: None,
            doc_type: DocType::PackageInsert,
            product_type: "IBD製剤".to_string(),
            company_type: Some(CompanyType::Own),
            product_name: "製品A".to_string(),
        };
        let json = serde_json::to_string(&doc).unwrap();
        assert!(json.contains("\"fileName\":\"a.xml\""));
        assert!(json.contains("\"companyType\":\"自社\""));
        assert!(json.contains("\"docType\":\"電子添文\""));
    }
}
