use anyhow::{Context, Result};
use clap::Parser;
use phishing_guard::cli::Cli;
use phishing_guard::utils::logging;
use phishing_guard::{App, Config};

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // 加载配置（默认值 < TOML < 环境变量 < 命令行）
    let mut config = Config::load(cli.config.as_deref()).context("加载配置失败")?;
    if let Some(url) = cli.api_base_url {
        config.api_base_url = url;
    }
    if let Some(n) = cli.max_resumes {
        config.max_resumes = n;
    }
    config.verbose_logging |= cli.verbose;

    // 初始化日志
    logging::init(config.verbose_logging);

    // 初始化并运行应用
    let app = App::initialize(config, cli.output)?;
    let snapshot = app.run(&cli.paths).await?;

    if let Some(err) = snapshot.last_error {
        anyhow::bail!("批次未全部完成: {}", err);
    }

    Ok(())
}
