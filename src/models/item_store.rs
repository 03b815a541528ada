//! 邮件列表
//!
//! 有序保存已接受的邮件，以及与之按索引对齐的分析结果。
//! 不变式：`outcomes.len() == items.len()`，`outcomes[i]` 描述 `items[i]`。

use crate::error::StoreError;
use crate::models::item::{Candidate, EmailItem, ItemId};
use crate::models::verdict::Verdict;

/// 单封邮件的结果，`None` 表示尚未得到分析结论
pub type Outcome = Option<Verdict>;

#[derive(Debug, Default)]
pub struct ItemStore {
    items: Vec<EmailItem>,
    outcomes: Vec<Outcome>,
    next_id: u64,
}

impl ItemStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// 追加邮件，已有邮件及其结果保持不变
    ///
    /// 返回新加入邮件的标识，顺序与传入顺序一致。
    pub fn append<I>(&mut self, candidates: I) -> Vec<ItemId>
    where
        I: IntoIterator<Item = Candidate>,
    {
        let mut ids = Vec::new();
        for candidate in candidates {
            let id = ItemId(self.next_id);
            self.next_id += 1;
            self.items.push(EmailItem {
                id,
                path: candidate.path,
                name: candidate.name,
                size: candidate.size,
            });
            self.outcomes.push(None);
            ids.push(id);
        }
        ids
    }

    /// 删除指定位置的邮件及其结果，后续项整体前移
    pub fn remove(&mut self, index: usize) -> Result<EmailItem, StoreError> {
        self.check_index(index)?;
        self.outcomes.remove(index);
        Ok(self.items.remove(index))
    }

    /// 写入指定位置的结果
    pub fn set_outcome(&mut self, index: usize, outcome: Outcome) -> Result<(), StoreError> {
        self.check_index(index)?;
        self.outcomes[index] = outcome;
        Ok(())
    }

    pub fn get(&self, index: usize) -> Option<&EmailItem> {
        self.items.get(index)
    }

    pub fn outcome(&self, index: usize) -> Option<&Outcome> {
        self.outcomes.get(index)
    }

    /// 按标识查找当前位置
    pub fn position_of(&self, id: ItemId) -> Option<usize> {
        self.items.iter().position(|item| item.id == id)
    }

    /// 第一个尚无结果的位置
    pub fn first_unresolved(&self) -> Option<usize> {
        self.outcomes.iter().position(Option::is_none)
    }

    pub fn unresolved_count(&self) -> usize {
        self.outcomes.iter().filter(|o| o.is_none()).count()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&EmailItem, &Outcome)> {
        self.items.iter().zip(self.outcomes.iter())
    }

    fn check_index(&self, index: usize) -> Result<(), StoreError> {
        if index < self.items.len() {
            Ok(())
        } else {
            Err(StoreError::IndexOutOfRange {
                index,
                len: self.items.len(),
            })
        }
    }
}
