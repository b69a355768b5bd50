//! # MNP Lookup
//!
//! 通过自动化浏览器批量查询手机号所属运营商
//!
//! ## 架构设计
//!
//! ### ① 基础设施层（Infrastructure）
//! - `infrastructure/` - 持有会话里的 Page，只暴露能力
//! - `JsExecutor` - 提供 eval() 能力
//!
//! ### ② 能力层（Browser / Services）
//! - `browser/` - 启动会话、等待元素、操作元素的 trait 以及 chromiumoxide 实现
//! - `services/` - 结果上报、运行日志、表格导入导出
//!
//! ### ③ 流程层（Workflow）
//! - `LookupCtx` - 上下文封装（序号 + 号码）
//! - `LookupFlow` - 单号码流程（打开 → 输入 → 提交 → 识别 → 关闭）
//!
//! ### ④ 编排层（Orchestration）
//! - `orchestrator/batch_processor` - 顺序处理整批号码并发布事件
//! - `app` - 读取输入、运行批次、导出结果

pub mod app;
pub mod browser;
pub mod config;
pub mod error;
pub mod infrastructure;
pub mod models;
pub mod orchestrator;
pub mod services;
pub mod utils;
pub mod workflow;

// 重新导出常用类型
pub use app::{App, RunReport};
pub use config::Config;
pub use error::{AppError, AppResult, LookupError};
pub use infrastructure::JsExecutor;
pub use models::{CanonicalNumber, LookupOutcome, OperatorLabel};
pub use orchestrator::{BatchHandle, Orchestrator};
pub use services::{BatchEvent, ReportSink};
pub use workflow::{LookupCtx, LookupFlow};
