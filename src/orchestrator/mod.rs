//! 编排层（Orchestration Layer）
//!
//! ## 模块划分
//!
//! ### `batch_processor` - 批量号码处理器
//! - 顺序遍历号码（Vec<CanonicalNumber>）
//! - 在后台任务上运行，通过通道发布事件
//! - 维护忙碌标记
//!
//! ## 层次关系
//!
//! ```text
//! App (读取输入 / 导出结果)
//!     ↓
//! batch_processor (处理 Vec<CanonicalNumber>)
//!     ↓
//! workflow::LookupFlow (处理单个号码)
//!     ↓
//! browser (能力层：启动会话 / 等待元素 / 操作元素)
//!     ↓
//! infrastructure (基础设施：JsExecutor)
//! ```

pub mod batch_processor;

pub use batch_processor::{progress_percent, run_batch, BatchHandle, Orchestrator};
