//! 编排层（Orchestration Layer）
//!
//! ## 模块划分
//!
//! ### `session` - 批次会话
//! - 邮件列表（ItemStore）与批次运行状态的唯一持有者
//! - 用户操作（添加、删除）与编排器共享同一个句柄
//! - 提供只读视图（BatchSnapshot）用于展示
//!
//! ### `batch_processor` - 批量邮件处理器
//! - 顺序驱动每封邮件的分析
//! - 遇错即停，重复启动即续跑
//! - 支持取消在途请求
//!
//! ## 层次关系
//!
//! ```text
//! app (命令行驱动, 续跑策略)
//!     ↓
//! batch_processor (处理整个列表)
//!     ↓
//! workflow::ItemFlow (处理单封邮件)
//!     ↓
//! clients::AnalysisClient (远程分析服务)
//! ```

pub mod batch_processor;
pub mod session;

pub use batch_processor::{BatchOrchestrator, BatchReport, CANCELLED_MESSAGE};
pub use session::{BatchSession, BatchSnapshot, BatchState, ItemStatus, ItemView};
