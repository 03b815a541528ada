//! 结果输出服务 - 业务能力层
//!
//! 只负责把批次视图渲染成文本或写成 JSON 报告，不关心流程

use anyhow::{Context, Result};
use serde::Serialize;
use std::fmt::Write as _;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::orchestrator::session::{BatchSnapshot, BatchState, ItemStatus, ItemView};

#[derive(Serialize)]
struct JsonReport<'a> {
    generated_at: String,
    #[serde(flatten)]
    snapshot: &'a BatchSnapshot,
}

/// JSON 报告写入服务
pub struct ReportWriter {
    report_path: PathBuf,
}

impl ReportWriter {
    /// 使用自定义文件路径创建
    pub fn with_path(path: impl Into<PathBuf>) -> Self {
        Self {
            report_path: path.into(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.report_path
    }

    /// 写入报告（覆盖已有文件）
    pub async fn write(&self, snapshot: &BatchSnapshot) -> Result<()> {
        let report = JsonReport {
            generated_at: chrono::Local::now().to_rfc3339(),
            snapshot,
        };
        let json = serde_json::to_string_pretty(&report)?;

        debug!(
            "写入报告: {} ({} 封邮件)",
            self.report_path.display(),
            snapshot.items.len()
        );

        if let Some(parent) = self.report_path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent)
                    .await
                    .with_context(|| format!("无法创建目录: {}", parent.display()))?;
            }
        }

        tokio::fs::write(&self.report_path, json)
            .await
            .with_context(|| format!("无法写入报告: {}", self.report_path.display()))?;

        Ok(())
    }
}

/// 把批次视图渲染为终端文本
pub fn render(snapshot: &BatchSnapshot) -> String {
    let mut out = String::new();
    let total = snapshot.items.len();

    for view in &snapshot.items {
        render_item(&mut out, view, total);
    }

    match &snapshot.state {
        BatchState::Errored { message } => {
            let _ = writeln!(out, "❌ 批次已停止: {}", message);
            let _ = writeln!(out, "   重新运行同一命令即可从未完成的邮件继续。");
        }
        BatchState::Running { .. } => {
            if let Some((k, n)) = snapshot.progress() {
                let _ = writeln!(out, "⏳ 正在分析第 {} 封，共 {} 封", k, n);
            }
        }
        BatchState::Idle => {}
    }

    out
}

fn render_item(out: &mut String, view: &ItemView, total: usize) {
    let badge = match view.status {
        ItemStatus::Suspicious => "⚠️ 可疑邮件",
        ItemStatus::Safe => "✅ 看起来安全",
        ItemStatus::Analyzing => "🔍 分析中",
        ItemStatus::Pending => "⏳ 未分析",
    };

    let _ = writeln!(
        out,
        "[{}/{}] {} ({} 字节)  {}",
        view.index + 1,
        total,
        view.name,
        view.size,
        badge
    );

    if let Some(verdict) = &view.verdict {
        let _ = writeln!(out, "    发件人: {}", verdict.sender);
        let _ = writeln!(out, "    收件人: {}", verdict.recipient);
        let _ = writeln!(out, "    主题:   {}", verdict.subject);
        let _ = writeln!(out, "    日期:   {}", verdict.date);
        if verdict.findings.is_empty() {
            let _ = writeln!(out, "    - (服务未给出说明)");
        }
        for finding in &verdict.findings {
            let _ = writeln!(out, "    - {}", finding);
        }
    }
    out.push('\n');
}
