//! # Phishing Guard
//!
//! 把一批 `.eml` 邮件依次提交给远程钓鱼检测服务，并按邮件展示结论
//!
//! ## 架构设计
//!
//! ### ① 客户端层（Clients）
//! - `clients/` - 与远程分析服务交互，一次请求只处理一封邮件
//! - `AnalysisClient` - 分析能力抽象，`HttpAnalysisClient` 为 multipart 上传实现
//!
//! ### ② 业务能力层（Services）
//! - `ItemValidator` - 只接受 `.eml` 文件
//! - `ReportWriter` / `render` - 结果输出
//!
//! ### ③ 流程层（Workflow）
//! - `ItemCtx` - 上下文封装（第几封 / 共几封）
//! - `ItemFlow` - 单封邮件的分析流程
//!
//! ### ④ 编排层（Orchestration）
//! - `orchestrator/session` - 邮件列表与批次状态
//! - `orchestrator/batch_processor` - 顺序执行、遇错即停、续跑
//!
//! ## 模块结构

pub mod app;
pub mod cli;
pub mod clients;
pub mod config;
pub mod error;
pub mod models;
pub mod orchestrator;
pub mod services;
pub mod utils;
pub mod workflow;

// 重新导出常用类型
pub use app::App;
pub use clients::{AnalysisClient, HttpAnalysisClient};
pub use config::Config;
pub use error::{ApiError, AppError, AppResult, ConfigError, StoreError};
pub use models::{Candidate, EmailItem, ItemId, Verdict};
pub use orchestrator::{BatchOrchestrator, BatchReport, BatchSession, BatchSnapshot, BatchState};
pub use workflow::{ItemCtx, ItemFlow};
