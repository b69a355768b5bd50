//! 单号码查询流程 - 流程层
//!
//! 核心职责：定义"一个号码"的完整查询流程
//!
//! 流程顺序：
//! 1. 启动独立浏览器会话 → 打开查询页
//! 2. 关闭 cookie 弹窗（可选，失败忽略）
//! 3. 输入号码 → 提交
//! 4. 等待运营商 logo → 读取 src → 识别运营商
//! 5. 无论成功失败都关闭会话

use std::time::Duration;

use tracing::{debug, info, warn};

use crate::browser::{BrowserSession, PageElement, SessionLauncher};
use crate::config::{Config, Selectors};
use crate::error::LookupError;
use crate::models::{classify, Resolution};
use crate::workflow::lookup_ctx::LookupCtx;

/// 单号码查询流程
///
/// - 每次查询启动一个全新的会话，绝不复用
/// - 自动化错误在这里收敛为 `Err`，不会再向上抛出
/// - 会话在返回前一定会被关闭
pub struct LookupFlow<L: SessionLauncher> {
    launcher: L,
    target_url: String,
    selectors: Selectors,
    wait_timeout: Duration,
}

impl<L: SessionLauncher> LookupFlow<L> {
    pub fn new(launcher: L, config: &Config) -> Self {
        Self {
            launcher,
            target_url: config.target_url.clone(),
            selectors: config.selectors.clone(),
            wait_timeout: config.wait_timeout(),
        }
    }

    pub fn launcher(&self) -> &L {
        &self.launcher
    }

    /// 查询一个号码
    pub async fn resolve_one(&self, ctx: &LookupCtx) -> Resolution {
        let mut session = self.launcher.launch().await.map_err(|e| {
            warn!("{} ❌ 启动会话失败: {}", ctx, e);
            e
        })?;

        let resolution = self.interact(&mut session, ctx).await;

        if let Err(e) = session.close().await {
            warn!("{} ⚠️ 关闭会话失败: {}", ctx, e);
        }

        match &resolution {
            Ok(classification) => info!("{} ✓ 运营商: {}", ctx, classification.label),
            Err(e) => warn!("{} ❌ 查询失败: {}", ctx, e),
        }

        resolution
    }

    async fn interact(&self, session: &mut L::Session, ctx: &LookupCtx) -> Resolution {
        session.navigate(&self.target_url).await?;
        debug!("{} 已打开 {}", ctx, self.target_url);

        self.dismiss_consent(session, ctx).await;

        let input = session
            .wait_for_clickable(&self.selectors.number_input, self.wait_timeout)
            .await?;
        input.click().await?;
        input.clear().await?;
        input.type_text(ctx.number.as_str()).await?;
        debug!("{} 已输入号码", ctx);

        let submit = session
            .wait_for_clickable(&self.selectors.submit_button, self.wait_timeout)
            .await?;
        submit.activate().await?;
        debug!("{} 已提交", ctx);

        let logo = session
            .wait_for_present(&self.selectors.operator_logo, self.wait_timeout)
            .await?;
        let src = logo
            .attribute("src")
            .await?
            .ok_or_else(|| LookupError::MissingAttribute {
                selector: self.selectors.operator_logo.clone(),
                attribute: "src".to_string(),
            })?;
        debug!("{} logo 地址: {}", ctx, src);

        Ok(classify(&src))
    }

    /// 尽力关闭 cookie 弹窗，找不到或点击失败都不影响后续流程
    async fn dismiss_consent(&self, session: &L::Session, ctx: &LookupCtx) {
        match session
            .wait_for_clickable(&self.selectors.consent_button, self.wait_timeout)
            .await
        {
            Ok(button) => {
                if let Err(e) = button.click().await {
                    debug!("{} cookie 弹窗点击失败: {}", ctx, e);
                }
            }
            Err(e) => debug!("{} 未出现 cookie 弹窗: {}", ctx, e),
        }
    }
}
