//! ファイル名からの文書タイプ判定

use crate::types::DocType;
use unicode_normalization::UnicodeNormalization;

const PATIENT_GUIDE_KEYWORD: &str = "患者向けガイド";

/// ファイル名から文書タイプを判定
///
/// 全角英数字はNFKCで半角に揃えてから判定する。判定は上から順に優先:
/// 1. `.xml` で終わる → 電子添文
/// 2. `IF.pdf` を含む → インタビューフォーム
/// 3. `RMP` を含む → 医薬品リスク管理計画
/// 4. `患者向けガイド` を含む → 患者向け医薬品ガイド
/// 5. それ以外 → その他
///
/// # Examples
/// ```
/// use pharma_compare_common::{detect_document_type, DocType};
///
/// assert_eq!(detect_document_type("製品A_ＩＦ.pdf"), DocType::InterviewForm);
/// ```
pub fn detect_document_type(file_name: &str) -> DocType {
    let normalized: String = file_name.nfkc().collect();

    if normalized.ends_with(".xml") {
        DocType::PackageInsert
    } else if normalized.contains("IF.pdf") {
        DocType::InterviewForm
    } else if normalized.contains("RMP") {
        DocType::RiskManagementPlan
    } else if normalized.contains(PATIENT_GUIDE_KEYWORD) || file_name.contains(PATIENT_GUIDE_KEYWORD) {
        DocType::PatientGuide
    } else {
        DocType::Other
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_xml_is_package_insert() {
        assert_eq!(detect_document_type("ゾルピデム.xml"), DocType::PackageInsert);
        // 全角拡張子
        assert_eq!(detect_document_type("添文．ｘｍｌ"), DocType::PackageInsert);
    }

    #[test]
    fn test_interview_form() {
        assert_eq!(detect_document_type("製品A_IF.pdf"), DocType::InterviewForm);
        assert_eq!(detect_document_type("製品AIF.pdf"), DocType::InterviewForm);
        assert_eq!(detect_document_type("製品A_ＩＦ.pdf"), DocType::InterviewForm);
    }

    #[test]
    fn test_rmp() {
        assert_eq!(detect_document_type("製品A_RMP_2024.pdf"), DocType::RiskManagementPlan);
        assert_eq!(detect_document_type("ＲＭＰ資材.pdf"), DocType::RiskManagementPlan);
    }

    #[test]
    fn test_patient_guide() {
        assert_eq!(detect_document_type("製品A_患者向けガイド.pdf"), DocType::PatientGuide);
    }

    #[test]
    fn test_priority_order() {
        // XML判定はRMPより優先
        assert_eq!(detect_document_type("RMP.xml"), DocType::PackageInsert);
        // IFはRMPより優先
        assert_eq!(detect_document_type("RMP_IF.pdf"), DocType::InterviewForm);
        // RMPは患者向けガイドより優先
        assert_eq!(detect_document_type("RMP_患者向けガイド.pdf"), DocType::RiskManagementPlan);
    }

    #[test]
    fn test_other() {
        assert_eq!(detect_document_type("製品概要.pdf"), DocType::Other);
        // 拡張子の大文字小文字は区別する
        assert_eq!(detect_document_type("添文.XML"), DocType::Other);
    }
}
