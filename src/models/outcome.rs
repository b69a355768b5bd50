use serde::Serialize;

use crate::error::LookupError;
use crate::models::number::CanonicalNumber;
use crate::models::operator::{Classification, OperatorLabel};

/// 单个号码的查询结果：成功识别（含 Not Found）或自动化失败
pub type Resolution = Result<Classification, LookupError>;

/// 一行查询结果，每个号码恰好产生一次
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LookupOutcome {
    /// 在本批次中的序号（从 1 开始）
    pub position: usize,
    /// 规范化号码
    pub number: CanonicalNumber,
    /// 展示号码（去掉国家代码）
    pub display_number: String,
    /// 运营商标签
    pub operator: OperatorLabel,
    /// logo 地址，未识别时为空
    pub logo_url: String,
    /// 失败原因，仅 `Error` 结果有值
    #[serde(skip_serializing_if = "Option::is_none")]
    pub failure: Option<String>,
}

impl LookupOutcome {
    pub fn new(position: usize, number: CanonicalNumber, resolution: &Resolution) -> Self {
        let display_number = number.display_form().to_string();
        match resolution {
            Ok(classification) => Self {
                position,
                number,
                display_number,
                operator: classification.label,
                logo_url: classification.logo_url.to_string(),
                failure: None,
            },
            Err(e) => Self {
                position,
                number,
                display_number,
                operator: OperatorLabel::Error,
                logo_url: String::new(),
                failure: Some(e.to_string()),
            },
        }
    }

    pub fn is_error(&self) -> bool {
        self.operator == OperatorLabel::Error
    }
}

/// 一次批处理的统计
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct BatchSummary {
    pub total: usize,
    pub resolved: usize,
    pub not_found: usize,
    pub failed: usize,
}

impl BatchSummary {
    pub fn record(&mut self, outcome: &LookupOutcome) {
        match outcome.operator {
            OperatorLabel::Resolved(_) => self.resolved += 1,
            OperatorLabel::NotFound => self.not_found += 1,
            OperatorLabel::Error => self.failed += 1,
        }
    }

    pub fn completed(&self) -> usize {
        self.resolved + self.not_found + self.failed
    }
}

/// 导出用的 (号码, 运营商) 两列
pub fn export_rows(outcomes: &[LookupOutcome]) -> Vec<(String, String)> {
    outcomes
        .iter()
        .map(|o| (o.display_number.clone(), o.operator.to_string()))
        .collect()
}

/// 制表符分隔的结果文本，便于粘贴到表格软件
pub fn render_tsv(outcomes: &[LookupOutcome]) -> String {
    let mut text = String::from("Sr. No.\tNumber\tOperator\n");
    for outcome in outcomes {
        text.push_str(&format!(
            "{}\t{}\t{}\n",
            outcome.position, outcome.display_number, outcome.operator
        ));
    }
    text
}
