//! 命令行驱动
//!
//! 负责：加载文件 → 校验入列 → 启动批次 → 出错时按配置续跑 → 输出结果

use crate::clients::{AnalysisClient, HttpAnalysisClient};
use crate::config::Config;
use crate::models::collect_candidates;
use crate::orchestrator::{BatchOrchestrator, BatchSession, BatchSnapshot};
use crate::services::{render, ReportWriter};
use crate::utils::logging;
use anyhow::Result;
use futures::future;
use std::path::PathBuf;
use std::time::Duration;
use tokio::sync::watch;
use tracing::{info, warn};

/// 应用主结构
pub struct App<C: AnalysisClient = HttpAnalysisClient> {
    config: Config,
    orchestrator: BatchOrchestrator<C>,
    report_writer: Option<ReportWriter>,
}

impl App<HttpAnalysisClient> {
    /// 初始化应用（使用 HTTP 分析客户端）
    pub fn initialize(config: Config, output: Option<PathBuf>) -> Result<Self> {
        let client = HttpAnalysisClient::new(&config)?;
        Ok(Self::with_client(config, client, output))
    }
}

impl<C: AnalysisClient> App<C> {
    pub fn with_client(config: Config, client: C, output: Option<PathBuf>) -> Self {
        let orchestrator = BatchOrchestrator::new(BatchSession::new(), client)
            .with_verbose_logging(config.verbose_logging);
        Self {
            config,
            orchestrator,
            report_writer: output.map(ReportWriter::with_path),
        }
    }

    pub fn session(&self) -> &BatchSession {
        self.orchestrator.session()
    }

    /// 运行应用主逻辑，Ctrl-C 取消当前批次并停止续跑
    pub async fn run(&self, paths: &[PathBuf]) -> Result<BatchSnapshot> {
        let (tx, rx) = watch::channel(false);
        let listener = tokio::spawn(async move {
            match tokio::signal::ctrl_c().await {
                Ok(()) => {
                    let _ = tx.send(true);
                }
                Err(e) => warn!("无法监听 Ctrl-C: {}", e),
            }
        });

        let result = self.run_until(paths, rx).await;
        listener.abort();
        result
    }

    /// 同 [`run`](Self::run)，`cancel` 变为 `true` 时取消
    ///
    /// 整个运行期间共用同一个信号：批次进行中、续跑等待中都会响应。
    pub async fn run_until(
        &self,
        paths: &[PathBuf],
        cancel: watch::Receiver<bool>,
    ) -> Result<BatchSnapshot> {
        logging::log_startup(&self.config);

        // 加载并校验文件
        let candidates = collect_candidates(paths).await?;
        let offered = candidates.len();
        let ids = self.session().add_files(candidates).await;

        if ids.is_empty() {
            anyhow::bail!("没有找到可分析的 .eml 文件 (共检查 {} 个文件)", offered);
        }
        if ids.len() < offered {
            info!("已忽略 {} 个非 .eml 文件", offered - ids.len());
        }

        // 启动批次，出错时续跑
        let mut resumes = 0;
        loop {
            let report = self
                .orchestrator
                .start_until(cancelled(cancel.clone()))
                .await;

            if report.cancelled || report.error.is_none() {
                break;
            }
            if *cancel.borrow() {
                warn!("⏹️ 已收到取消信号，不再续跑");
                break;
            }
            if resumes >= self.config.max_resumes {
                break;
            }

            resumes += 1;
            logging::log_resume(resumes, self.config.max_resumes, self.config.resume_delay_secs);

            let interrupted = tokio::select! {
                _ = tokio::time::sleep(Duration::from_secs(self.config.resume_delay_secs)) => false,
                _ = cancelled(cancel.clone()) => true,
            };
            if interrupted {
                warn!("⏹️ 等待续跑时收到取消信号，停止续跑");
                break;
            }
        }

        // 输出结果
        let snapshot = self.session().snapshot().await;
        println!("\n{}", render(&snapshot));
        logging::print_final_stats(&snapshot);

        if let Some(writer) = &self.report_writer {
            writer.write(&snapshot).await?;
            info!("报告已保存至: {}", writer.path().display());
        }

        Ok(snapshot)
    }
}

/// 等待取消信号；发送端已关闭且从未取消时永不完成
async fn cancelled(mut cancel: watch::Receiver<bool>) {
    if cancel.wait_for(|c| *c).await.is_err() {
        future::pending::<()>().await;
    }
}
