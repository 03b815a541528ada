//! 批量邮件处理器 - 编排层
//!
//! ## 职责
//!
//! 按提交顺序逐封驱动邮件分析，维护批次状态。
//!
//! ## 核心规则
//!
//! 1. **顺序执行**：同一批次任意时刻最多一个请求在途
//! 2. **跳过已完成**：已有结论的邮件不再请求，重复启动即为续跑
//! 3. **遇错即停**：某封失败时记录错误并停止，已得到的结论全部保留
//! 4. **按标识定位**：请求返回后按 `ItemId` 找回位置再写入，
//!    期间用户删除邮件不会让结论写错位置

use std::future::Future;

use futures::future;
use serde::Serialize;
use tracing::{info, warn};

use crate::clients::AnalysisClient;
use crate::orchestrator::session::{BatchSession, BatchState};
use crate::workflow::{ItemCtx, ItemFlow};

/// 批次被取消时记录的错误信息
pub const CANCELLED_MESSAGE: &str = "分析已取消";

/// 单次启动的处理结果
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BatchReport {
    /// 本次新得到结论的数量
    pub analyzed: usize,
    /// 启动时已有结论而跳过的数量
    pub skipped: usize,
    /// 分析途中被用户删除、结论被丢弃的数量
    pub discarded: usize,
    pub cancelled: bool,
    pub error: Option<String>,
    /// 本次结束后的批次状态
    pub state: BatchState,
}

impl BatchReport {
    fn new() -> Self {
        Self {
            analyzed: 0,
            skipped: 0,
            discarded: 0,
            cancelled: false,
            error: None,
            state: BatchState::Idle,
        }
    }
}

/// 批次编排器
///
/// 持有会话句柄和分析客户端；会话可以克隆出去供用户操作使用。
pub struct BatchOrchestrator<C: AnalysisClient> {
    session: BatchSession,
    client: C,
    verbose_logging: bool,
}

impl<C: AnalysisClient> BatchOrchestrator<C> {
    pub fn new(session: BatchSession, client: C) -> Self {
        Self {
            session,
            client,
            verbose_logging: false,
        }
    }

    pub fn with_verbose_logging(mut self, verbose: bool) -> Self {
        self.verbose_logging = verbose;
        self
    }

    pub fn session(&self) -> &BatchSession {
        &self.session
    }

    /// 启动（或续跑）批次，直到全部完成或遇到错误
    pub async fn start(&self) -> BatchReport {
        self.start_until(future::pending::<()>()).await
    }

    /// 同 [`start`](Self::start)，但 `shutdown` 完成时取消在途请求并停止
    ///
    /// 被取消的邮件保持无结论，之后再次启动会从它开始。
    pub async fn start_until<F>(&self, shutdown: F) -> BatchReport
    where
        F: Future<Output = ()>,
    {
        let mut report = BatchReport::new();

        {
            let mut state = self.session.lock().await;
            if state.run.is_running {
                warn!("⚠️ 批次已在运行中，忽略本次启动");
                report.state = state.state();
                return report;
            }

            state.run.last_error = None;
            let unresolved = state.store.unresolved_count();
            report.skipped = state.store.len() - unresolved;

            if unresolved == 0 {
                info!("没有待分析的邮件 (共 {} 封)", state.store.len());
                report.state = state.state();
                return report;
            }

            crate::utils::logging::log_batch_start(unresolved, state.store.len());
            state.run.begin();
        }

        tokio::pin!(shutdown);
        let flow = ItemFlow::new(&self.client, self.verbose_logging);

        loop {
            let (item, ctx) = {
                let mut state = self.session.lock().await;
                let next = state
                    .store
                    .first_unresolved()
                    .and_then(|i| state.store.get(i).cloned().map(|item| (i, item)));

                match next {
                    Some((index, item)) => {
                        state.run.current = Some(item.id);
                        let ctx =
                            ItemCtx::new(item.id, index + 1, state.store.len(), item.name.clone());
                        (item, ctx)
                    }
                    None => {
                        state.run.finish();
                        break;
                    }
                }
            };

            let result = tokio::select! {
                biased;
                _ = &mut shutdown => None,
                r = flow.run(&item, &ctx) => Some(r),
            };

            let mut state = self.session.lock().await;
            let position = state.store.position_of(item.id);

            match (result, position) {
                (None, _) => {
                    warn!("{} ⏹️ 批次已取消", ctx);
                    state.run.fail(CANCELLED_MESSAGE.to_string());
                    report.cancelled = true;
                    report.error = Some(CANCELLED_MESSAGE.to_string());
                    break;
                }
                (Some(_), None) => {
                    warn!("{} ⚠️ 分析期间邮件已被移除，丢弃结果", ctx);
                    report.discarded += 1;
                }
                (Some(Ok(verdict)), Some(index)) => {
                    if let Err(e) = state.store.set_outcome(index, Some(verdict)) {
                        warn!("{} ⚠️ 写入结论失败: {}", ctx, e);
                        report.discarded += 1;
                    } else {
                        report.analyzed += 1;
                    }
                }
                (Some(Err(e)), Some(_)) => {
                    let message = e.user_message();
                    state.run.fail(message.clone());
                    report.error = Some(message);
                    break;
                }
            }
        }

        let state = self.session.lock().await;
        report.state = state.state();
        crate::utils::logging::log_batch_complete(&report);
        report
    }
}
