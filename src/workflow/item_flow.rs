//! 邮件处理流程 - 流程层
//!
//! 核心职责：定义"一封邮件"的处理流程（上传 → 等待结论 → 记录）
//! 不持有邮件列表，不决定下一封处理谁。

use std::time::Instant;

use tracing::{info, warn};

use crate::clients::AnalysisClient;
use crate::error::ApiError;
use crate::models::item::EmailItem;
use crate::models::verdict::Verdict;
use crate::utils::logging::truncate_text;
use crate::workflow::item_ctx::ItemCtx;

/// 邮件处理流程
pub struct ItemFlow<'a, C: AnalysisClient + ?Sized> {
    client: &'a C,
    verbose_logging: bool,
}

impl<'a, C: AnalysisClient + ?Sized> ItemFlow<'a, C> {
    pub fn new(client: &'a C, verbose_logging: bool) -> Self {
        Self {
            client,
            verbose_logging,
        }
    }

    /// 分析单封邮件
    pub async fn run(&self, item: &EmailItem, ctx: &ItemCtx) -> Result<Verdict, ApiError> {
        info!("{} 🔍 正在分析 ({} 字节)...", ctx, item.size);
        let started = Instant::now();

        match self.client.analyze(item).await {
            Ok(verdict) => {
                self.log_verdict(ctx, &verdict, started);
                Ok(verdict)
            }
            Err(e) => {
                warn!(
                    "{} ❌ 分析失败 ({:.1}s): {}",
                    ctx,
                    started.elapsed().as_secs_f64(),
                    e
                );
                Err(e)
            }
        }
    }

    fn log_verdict(&self, ctx: &ItemCtx, verdict: &Verdict, started: Instant) {
        let label = if verdict.is_suspicious {
            "⚠️ 可疑邮件"
        } else {
            "✓ 看起来安全"
        };
        info!(
            "{} {} ({:.1}s) 主题: {}",
            ctx,
            label,
            started.elapsed().as_secs_f64(),
            truncate_text(&verdict.subject, 60)
        );

        if self.verbose_logging {
            for (i, finding) in verdict.findings.iter().enumerate() {
                info!("{}   {}. {}", ctx, i + 1, finding);
            }
        }
    }
}
