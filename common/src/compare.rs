//! 自社・他社製品の文書カバレッジ比較

use crate::types::{CompanyType, DocType, Document};
use serde::Serialize;
use std::collections::BTreeMap;

/// 1製品分のカバレッジ
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CoverageRow {
    pub product_name: String,
    pub company_type: CompanyType,
    /// `DocType::ALL` の順の文書数
    pub counts: [usize; 5],
}

impl CoverageRow {
    pub fn count(&self, doc_type: DocType) -> usize {
        self.counts[doc_type_index(doc_type)]
    }
}

/// 製品カテゴリ内の 製品 × 文書タイプ 件数表
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CoverageMatrix {
    pub product_type: String,
    /// 自社→他社、各区分内は製品名順
    pub rows: Vec<CoverageRow>,
}

/// 欠けている文書
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoverageGap {
    pub product_name: String,
    pub company_type: CompanyType,
    pub doc_type: DocType,
}

impl CoverageMatrix {
    pub fn build(documents: &[Document], product_type: &str) -> Self {
        let mut grouped: BTreeMap<(CompanyType, String), [usize; 5]> = BTreeMap::new();

        for doc in documents.iter().filter(|d| d.product_type == product_type) {
            // 会社区分が不明な文書は比較対象外
            let Some(company) = doc.company_type else { continue };
            let counts = grouped
                .entry((company, doc.product_name.clone()))
                .or_insert([0; 5]);
            counts[doc_type_index(doc.doc_type)] += 1;
        }

        let rows = grouped
            .into_iter()
            .map(|((company_type, product_name), counts)| CoverageRow {
                product_name,
                company_type,
                counts,
            })
            .collect();

        Self {
            product_type: product_type.to_string(),
            rows,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// 他製品にはあるが当該製品には無い文書タイプ
    pub fn missing(&self) -> Vec<CoverageGap> {
        let present: Vec<DocType> = DocType::ALL
            .iter()
            .copied()
            .filter(|&t| self.rows.iter().any(|r| r.count(t) > 0))
            .collect();

        let mut gaps = Vec::new();
        for row in &self.rows {
            for &doc_type in &present {
                if row.count(doc_type) == 0 {
                    gaps.push(CoverageGap {
                        product_name: row.product_name.clone(),
                        company_type: row.company_type,
                        doc_type,
                    });
                }
            }
        }
        gaps
    }

    /// タブ区切りの表に整形
    pub fn render(&self) -> String {
        let mut out = String::from("区分\t製品");
        for doc_type in DocType::ALL {
            out.push('\t');
            out.push_str(doc_type.label());
        }
        out.push('\n');

        for row in &self.rows {
            out.push_str(&format!("{}\t{}", row.company_type, row.product_name));
            for count in row.counts {
                out.push_str(&format!("\t{}", count));
            }
            out.push('\n');
        }
        out
    }
}

fn doc_type_index(doc_type: DocType) -> usize {
    match doc_type {
        DocType::PackageInsert => 0,
        DocType::InterviewForm => 1,
        DocType::RiskManagementPlan => 2,
        DocType::PatientGuide => 3,
        DocType::Other => 4,
    }
}
