//! 批次会话
//!
//! 把邮件列表和批次运行状态放在同一个可共享的句柄里。编排器和用户操作
//! （添加、删除）都通过它访问状态，锁不会跨越网络请求持有。

use std::sync::Arc;

use serde::Serialize;
use tokio::sync::{Mutex, MutexGuard};
use tracing::{info, warn};

use crate::error::StoreError;
use crate::models::item::{Candidate, EmailItem, ItemId};
use crate::models::item_store::ItemStore;
use crate::models::verdict::Verdict;
use crate::services::ItemValidator;

/// 批次运行记录
#[derive(Debug, Default, Clone)]
pub struct BatchRunState {
    /// 正在分析的邮件（按标识记录，删除其他邮件不影响）
    pub current: Option<ItemId>,
    pub is_running: bool,
    pub last_error: Option<String>,
}

impl BatchRunState {
    pub(crate) fn begin(&mut self) {
        self.last_error = None;
        self.current = None;
        self.is_running = true;
    }

    pub(crate) fn finish(&mut self) {
        self.current = None;
        self.is_running = false;
    }

    pub(crate) fn fail(&mut self, message: String) {
        self.finish();
        self.last_error = Some(message);
    }
}

/// 对外展示的批次状态
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum BatchState {
    Idle,
    /// `cursor` 为正在分析的位置；该邮件在分析途中被删除时为 `None`
    Running { cursor: Option<usize> },
    Errored { message: String },
}

/// 单封邮件的展示状态
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemStatus {
    Pending,
    Analyzing,
    Suspicious,
    Safe,
}

#[derive(Debug, Clone, Serialize)]
pub struct ItemView {
    pub index: usize,
    pub id: ItemId,
    pub name: String,
    pub size: u64,
    pub status: ItemStatus,
    pub verdict: Option<Verdict>,
}

/// 某一时刻的只读视图
#[derive(Debug, Clone, Serialize)]
pub struct BatchSnapshot {
    pub items: Vec<ItemView>,
    pub state: BatchState,
    pub last_error: Option<String>,
}

impl BatchSnapshot {
    /// "正在分析第 k 封，共 n 封"，k 从1开始
    pub fn progress(&self) -> Option<(usize, usize)> {
        match self.state {
            BatchState::Running { cursor: Some(i) } => Some((i + 1, self.items.len())),
            _ => None,
        }
    }

    pub fn count(&self, status: ItemStatus) -> usize {
        self.items.iter().filter(|v| v.status == status).count()
    }
}

#[derive(Debug, Default)]
pub(crate) struct SessionState {
    pub(crate) store: ItemStore,
    pub(crate) run: BatchRunState,
}

impl SessionState {
    pub(crate) fn cursor(&self) -> Option<usize> {
        if !self.run.is_running {
            return None;
        }
        self.run.current.and_then(|id| self.store.position_of(id))
    }

    pub(crate) fn state(&self) -> BatchState {
        if self.run.is_running {
            BatchState::Running {
                cursor: self.cursor(),
            }
        } else if let Some(message) = &self.run.last_error {
            BatchState::Errored {
                message: message.clone(),
            }
        } else {
            BatchState::Idle
        }
    }
}

/// 批次会话句柄
///
/// 克隆得到的句柄共享同一份状态；不同 `new()` 出来的会话互不影响。
#[derive(Debug, Clone, Default)]
pub struct BatchSession {
    inner: Arc<Mutex<SessionState>>,
}

impl BatchSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// 添加文件：先经过校验，只追加 `.eml` 文件
    pub async fn add_files<I>(&self, candidates: I) -> Vec<ItemId>
    where
        I: IntoIterator<Item = Candidate>,
    {
        let accepted = ItemValidator::new().filter_accepted(candidates);
        let mut state = self.inner.lock().await;
        let ids = state.store.append(accepted);
        if !ids.is_empty() {
            info!("✓ 添加 {} 封邮件，共 {} 封", ids.len(), state.store.len());
        }
        ids
    }

    /// 删除指定位置的邮件
    ///
    /// 批次运行中也可以删除：编排器按标识重新定位，
    /// 被删除的正在分析的邮件，其结果会被丢弃。
    pub async fn remove(&self, index: usize) -> Result<EmailItem, StoreError> {
        let mut state = self.inner.lock().await;
        let removed = state.store.remove(index)?;
        if state.run.is_running && state.run.current == Some(removed.id) {
            warn!("⚠️ 正在分析的邮件已被移除: {}", removed.name);
        }
        Ok(removed)
    }

    pub async fn state(&self) -> BatchState {
        self.inner.lock().await.state()
    }

    pub async fn cursor(&self) -> Option<usize> {
        self.inner.lock().await.cursor()
    }

    pub async fn is_running(&self) -> bool {
        self.inner.lock().await.run.is_running
    }

    pub async fn last_error(&self) -> Option<String> {
        self.inner.lock().await.run.last_error.clone()
    }

    pub async fn len(&self) -> usize {
        self.inner.lock().await.store.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.inner.lock().await.store.is_empty()
    }

    /// 第 `index` 封邮件当前的结论
    pub async fn outcome(&self, index: usize) -> Option<Verdict> {
        self.inner
            .lock()
            .await
            .store
            .outcome(index)
            .cloned()
            .flatten()
    }

    pub async fn snapshot(&self) -> BatchSnapshot {
        let state = self.inner.lock().await;
        let cursor = state.cursor();

        let items = state
            .store
            .iter()
            .enumerate()
            .map(|(index, (item, outcome))| {
                let status = match outcome {
                    Some(v) if v.is_suspicious => ItemStatus::Suspicious,
                    Some(_) => ItemStatus::Safe,
                    None if cursor == Some(index) => ItemStatus::Analyzing,
                    None => ItemStatus::Pending,
                };
                ItemView {
                    index,
                    id: item.id,
                    name: item.name.clone(),
                    size: item.size,
                    status,
                    verdict: outcome.clone(),
                }
            })
            .collect();

        BatchSnapshot {
            items,
            state: state.state(),
            last_error: state.run.last_error.clone(),
        }
    }

    pub(crate) async fn lock(&self) -> MutexGuard<'_, SessionState> {
        self.inner.lock().await
    }
}
