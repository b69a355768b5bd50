//! 浏览器自动化能力
//!
//! 上层只依赖这里的三个 trait：启动会话、在会话里等待元素、操作元素。
//! `headless` 模块基于 chromiumoxide 提供真实实现。

use std::time::Duration;

use async_trait::async_trait;

use crate::error::LookupError;

pub mod headless;

pub use headless::{ChromeElement, ChromeLauncher, ChromeSession};

/// 会话启动器：每次调用都得到一个全新的、隔离的浏览器会话
#[async_trait]
pub trait SessionLauncher: Send + Sync + 'static {
    type Session: BrowserSession;

    async fn launch(&self) -> Result<Self::Session, LookupError>;
}

/// 一个浏览器会话
#[async_trait]
pub trait BrowserSession: Send + Sync {
    type Element: PageElement;

    /// 导航到指定页面
    async fn navigate(&mut self, url: &str) -> Result<(), LookupError>;

    /// 等待元素出现且可点击
    async fn wait_for_clickable(
        &self,
        selector: &str,
        timeout: Duration,
    ) -> Result<Self::Element, LookupError>;

    /// 等待元素出现在 DOM 中
    async fn wait_for_present(
        &self,
        selector: &str,
        timeout: Duration,
    ) -> Result<Self::Element, LookupError>;

    /// 关闭会话并释放浏览器进程
    async fn close(&mut self) -> Result<(), LookupError>;
}

/// 页面元素
#[async_trait]
pub trait PageElement: Send + Sync {
    /// 模拟真实点击
    async fn click(&self) -> Result<(), LookupError>;

    /// 通过脚本触发点击，元素被遮挡时也能生效
    async fn activate(&self) -> Result<(), LookupError>;

    /// 清空输入框
    async fn clear(&self) -> Result<(), LookupError>;

    /// 输入文本
    async fn type_text(&self, text: &str) -> Result<(), LookupError>;

    /// 读取属性
    async fn attribute(&self, name: &str) -> Result<Option<String>, LookupError>;
}
