//! 邮件校验服务 - 业务能力层
//!
//! 只负责"这个文件能不能提交"的判断

use crate::models::item::Candidate;
use tracing::debug;

/// 可接受的文件后缀（区分大小写）
pub const ACCEPTED_SUFFIX: &str = ".eml";

/// 邮件校验服务
///
/// 无状态，只看文件名后缀，不读取文件内容。
#[derive(Debug, Clone, Copy, Default)]
pub struct ItemValidator;

impl ItemValidator {
    pub fn new() -> Self {
        Self
    }

    /// 文件名是否以 `.eml` 结尾
    pub fn accepts(&self, name: &str) -> bool {
        name.ends_with(ACCEPTED_SUFFIX)
    }

    /// 批量过滤候选文件
    ///
    /// 不合格的文件静默丢弃，保留其余文件的原有顺序。
    pub fn filter_accepted<I>(&self, candidates: I) -> Vec<Candidate>
    where
        I: IntoIterator<Item = Candidate>,
    {
        candidates
            .into_iter()
            .filter(|candidate| {
                let ok = self.accepts(&candidate.name);
                if !ok {
                    debug!("跳过非 .eml 文件: {}", candidate.name);
                }
                ok
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accepts_only_exact_suffix() {
        let validator = ItemValidator::new();
        assert!(validator.accepts("invoice.eml"));
        assert!(validator.accepts(".eml"));
        assert!(!validator.accepts("invoice.EML"));
        assert!(!validator.accepts("invoice.eml.txt"));
        assert!(!validator.accepts("invoice.msg"));
        assert!(!validator.accepts("eml"));
    }

    #[test]
    fn test_filter_keeps_offered_order() {
        let validator = ItemValidator::new();
        let offered = vec![
            Candidate::new("/in/c.eml", "c.eml", 1),
            Candidate::new("/in/photo.png", "photo.png", 1),
            Candidate::new("/in/a.eml", "a.eml", 1),
            Candidate::new("/in/B.EML", "B.EML", 1),
        ];

        let accepted = validator.filter_accepted(offered);

        let names: Vec<_> = accepted.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["c.eml", "a.eml"]);
    }
}
