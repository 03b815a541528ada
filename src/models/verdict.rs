//! 分析结果模型
//!
//! `AnalysisResponse` 对应分析服务返回的 JSON，`Verdict` 是规整后的结果。

use serde::{Deserialize, Serialize};

/// 服务端 `analysis` 字段：单个字符串或字符串数组
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum AnalysisField {
    One(String),
    Many(Vec<String>),
}

impl AnalysisField {
    /// 统一转为有序列表，单个字符串变为一元素列表
    pub fn into_findings(self) -> Vec<String> {
        match self {
            AnalysisField::One(text) => vec![text],
            AnalysisField::Many(list) => list,
        }
    }
}

/// 分析服务的成功响应体
///
/// 邮件头字段可能为 `null`（原始邮件缺少该头），按空字符串处理。
#[derive(Debug, Clone, Deserialize)]
pub struct AnalysisResponse {
    pub is_suspicious: bool,
    #[serde(default)]
    pub sender: Option<String>,
    #[serde(default)]
    pub subject: Option<String>,
    #[serde(default)]
    pub recipient: Option<String>,
    #[serde(default)]
    pub date: Option<String>,
    #[serde(default)]
    pub analysis: Option<AnalysisField>,
}

/// 单封邮件的分析结论
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Verdict {
    pub is_suspicious: bool,
    pub sender: String,
    pub subject: String,
    pub recipient: String,
    pub date: String,
    /// 可读的判断理由，顺序与服务端一致
    pub findings: Vec<String>,
}

impl From<AnalysisResponse> for Verdict {
    fn from(resp: AnalysisResponse) -> Self {
        Self {
            is_suspicious: resp.is_suspicious,
            sender: resp.sender.unwrap_or_default(),
            subject: resp.subject.unwrap_or_default(),
            recipient: resp.recipient.unwrap_or_default(),
            date: resp.date.unwrap_or_default(),
            findings: resp
                .analysis
                .map(AnalysisField::into_findings)
                .unwrap_or_default(),
        }
    }
}
