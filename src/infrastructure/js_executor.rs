//! JS 执行器 - 基础设施层
//!
//! 持有会话里唯一的 page，只暴露"执行 JS"的能力

use chromiumoxide::Page;
use serde::de::DeserializeOwned;
use serde_json::Value as JsonValue;

use crate::error::LookupError;

/// JS 执行器
///
/// 职责：
/// - 持有会话的 Page
/// - 暴露 eval() 能力
/// - 不认识号码 / 运营商
pub struct JsExecutor {
    page: Page,
}

impl JsExecutor {
    /// 创建新的 JS 执行器
    pub fn new(page: Page) -> Self {
        Self { page }
    }

    /// 获取 page 的引用（用于其他操作）
    pub fn page(&self) -> &Page {
        &self.page
    }

    /// 执行 JS 代码并返回 JSON 结果
    pub async fn eval(&self, js_code: impl Into<String>) -> Result<JsonValue, LookupError> {
        let result = self.page.evaluate(js_code.into()).await?;
        result
            .into_value()
            .map_err(|e| LookupError::Script(e.to_string()))
    }

    /// 执行 JS 代码并反序列化为指定类型
    pub async fn eval_as<T: DeserializeOwned>(
        &self,
        js_code: impl Into<String>,
    ) -> Result<T, LookupError> {
        let json_value = self.eval(js_code).await?;
        serde_json::from_value(json_value).map_err(|e| LookupError::Script(e.to_string()))
    }

    /// 选择器对应的元素是否可见且未禁用
    pub async fn is_clickable(&self, selector: &str) -> Result<bool, LookupError> {
        let js_code = format!(
            r#"
            (() => {{
                const el = document.querySelector({});
                if (!el || el.disabled) {{
                    return false;
                }}
                const rect = el.getBoundingClientRect();
                const style = window.getComputedStyle(el);
                return rect.width > 0 && rect.height > 0
                    && style.visibility !== 'hidden'
                    && style.display !== 'none';
            }})()
            "#,
            quote(selector)?
        );
        self.eval_as(js_code).await
    }

    /// 当前文档的 readyState
    pub async fn ready_state(&self) -> Result<String, LookupError> {
        self.eval_as("document.readyState").await
    }
}

fn quote(value: &str) -> Result<String, LookupError> {
    serde_json::to_string(value).map_err(|e| LookupError::Script(e.to_string()))
}
