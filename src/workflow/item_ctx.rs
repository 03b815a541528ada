//! 邮件处理上下文
//!
//! 封装"我正在处理这一批里的第几封邮件"这一信息

use crate::models::item::ItemId;
use std::fmt::Display;

/// 邮件处理上下文
#[derive(Debug, Clone)]
pub struct ItemCtx {
    /// 邮件的稳定标识
    pub item_id: ItemId,

    /// 当前位置（从1开始，仅用于日志显示）
    pub position: usize,

    /// 本批邮件总数
    pub total: usize,

    /// 文件名
    pub name: String,
}

impl ItemCtx {
    /// 创建新的邮件上下文
    pub fn new(item_id: ItemId, position: usize, total: usize, name: String) -> Self {
        Self {
            item_id,
            position,
            total,
            name,
        }
    }
}

impl Display for ItemCtx {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "[邮件 {}/{} {} {}]",
            self.position, self.total, self.item_id, self.name
        )
    }
}
