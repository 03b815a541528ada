/// 日志工具模块
///
/// 提供日志初始化、格式化和输出的辅助函数
use tracing::{debug, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::orchestrator::batch_processor::BatchReport;
use crate::orchestrator::session::{BatchSnapshot, ItemStatus};

/// 初始化日志输出
///
/// `RUST_LOG` 优先；未设置或无法解析时按 `verbose` 选择 debug 或 info。
/// 重复调用（如测试中）沿用已安装的订阅器。
pub fn init(verbose: bool) {
    let default_level = default_directive(verbose);

    let mut invalid_env = None;
    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(e) => {
            if std::env::var_os(EnvFilter::DEFAULT_ENV).is_some() {
                invalid_env = Some(e);
            }
            EnvFilter::new(default_level)
        }
    };

    if let Err(e) = tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .try_init()
    {
        debug!("日志订阅器已存在，沿用现有配置: {}", e);
    }

    if let Some(e) = invalid_env {
        warn!("RUST_LOG 无法解析，改用 {}: {}", default_level, e);
    }
}

fn default_directive(verbose: bool) -> &'static str {
    if verbose {
        "phishing_guard=debug"
    } else {
        "phishing_guard=info"
    }
}

/// 记录程序启动信息
pub fn log_startup(config: &Config) {
    info!("{}", "=".repeat(60));
    info!("🛡️ Phishing Guard - 邮件批量分析");
    info!("🌐 分析接口: {}", config.analyze_url());
    info!("🔁 出错自动续跑次数: {}", config.max_resumes);
    info!("{}", "=".repeat(60));
}

/// 记录批次开始信息
///
/// # 参数
/// - `pending`: 待分析数量
/// - `total`: 邮件总数
pub fn log_batch_start(pending: usize, total: usize) {
    info!("\n{}", "=".repeat(60));
    info!("📦 开始分析: 待处理 {} 封 / 共 {} 封", pending, total);
    if pending < total {
        info!("💡 已有结论的 {} 封将被跳过", total - pending);
    }
    info!("{}", "=".repeat(60));
}

/// 记录批次结束信息
pub fn log_batch_complete(report: &BatchReport) {
    info!("\n{}", "─".repeat(60));
    match &report.error {
        Some(msg) if report.cancelled => warn!("⏹️ 批次中止: {}", msg),
        Some(msg) => warn!("❌ 批次因错误停止: {}", msg),
        None => info!("✓ 批次完成"),
    }
    info!(
        "本次分析 {} 封, 跳过 {} 封, 丢弃 {} 封",
        report.analyzed, report.skipped, report.discarded
    );
    info!("{}", "─".repeat(60));
}

/// 记录续跑信息
pub fn log_resume(attempt: u32, max_resumes: u32, delay_secs: u64) {
    info!(
        "🔁 {} 秒后续跑 (第 {}/{} 次)，已完成的邮件不会重复分析",
        delay_secs, attempt, max_resumes
    );
}

/// 打印最终统计信息
pub fn print_final_stats(snapshot: &BatchSnapshot) {
    let total = snapshot.items.len();
    let suspicious = snapshot.count(ItemStatus::Suspicious);
    let safe = snapshot.count(ItemStatus::Safe);

    info!("\n{}", "=".repeat(60));
    info!("📊 分析统计");
    info!(
        "完成时间: {}",
        chrono::Local::now().format("%Y-%m-%d %H:%M:%S")
    );
    info!("{}", "=".repeat(60));
    info!("⚠️ 可疑: {}/{}", suspicious, total);
    info!("✅ 安全: {}/{}", safe, total);
    info!("⏳ 未分析: {}", total - suspicious - safe);
    if let Some(err) = &snapshot.last_error {
        warn!("❌ 最近错误: {}", err);
    }
    info!("{}", "=".repeat(60));
}

/// 截断长文本用于日志显示
///
/// # 参数
/// - `text`: 原始文本
/// - `max_len`: 最大长度（按字符计）
pub fn truncate_text(text: &str, max_len: usize) -> String {
    if text.chars().count() > max_len {
        text.chars().take(max_len).collect::<String>() + "..."
    } else {
        text.to_string()
    }
}
