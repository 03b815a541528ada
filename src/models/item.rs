use serde::Serialize;
use std::fmt;
use std::path::PathBuf;

/// 待提交的候选文件（尚未通过校验）
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    pub path: PathBuf,
    /// 用户看到的文件名，校验规则只看它
    pub name: String,
    pub size: u64,
}

impl Candidate {
    pub fn new(path: impl Into<PathBuf>, name: impl Into<String>, size: u64) -> Self {
        Self {
            path: path.into(),
            name: name.into(),
            size,
        }
    }
}

/// 邮件在列表中的稳定标识，删除其他项时不会改变
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct ItemId(pub(crate) u64);

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// 已加入列表的邮件
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmailItem {
    pub id: ItemId,
    pub path: PathBuf,
    pub name: String,
    pub size: u64,
}
