use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "phishing-guard")]
#[command(about = "批量提交 .eml 邮件到钓鱼检测服务并查看结论", long_about = None)]
pub struct Cli {
    /// 邮件文件或文件夹（文件夹只展开一层），非 .eml 文件会被忽略
    #[arg(required = true)]
    pub paths: Vec<PathBuf>,

    /// 配置文件（TOML），默认读取当前目录下的 phishing_guard.toml
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// 分析服务地址，覆盖配置文件和环境变量
    #[arg(long)]
    pub api_base_url: Option<String>,

    /// 把结果写入 JSON 文件
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// 出错后自动续跑的次数
    #[arg(long)]
    pub max_resumes: Option<u32>,

    /// 详细日志
    #[arg(short, long)]
    pub verbose: bool,
}
