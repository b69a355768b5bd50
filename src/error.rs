use std::time::Duration;

use thiserror::Error;

/// 应用程序错误类型
#[derive(Debug, Error)]
pub enum AppError {
    /// 浏览器能力不可用（启动前探测失败）
    #[error("浏览器不可用: {0}")]
    BrowserUnavailable(String),
    /// 配置错误
    #[error("配置错误: {0}")]
    Config(#[from] ConfigError),
    /// 表格导入导出错误
    #[error("表格错误: {0}")]
    Table(#[from] TableIoError),
    /// 已有批次在运行
    #[error("已有批次正在运行，请等待完成后再开始")]
    BatchInProgress,
    /// 批处理任务异常退出
    #[error("批处理任务异常退出: {0}")]
    Worker(String),
    /// 文件读写错误
    #[error("文件错误 ({path}): {source}")]
    File {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

/// 单个号码查询过程中的自动化错误
///
/// 只在 Session Driver 边界内部流动，最终会被转换为 `"Error"` 结果行
#[derive(Debug, Error)]
pub enum LookupError {
    /// 启动浏览器失败
    #[error("启动浏览器失败: {0}")]
    Launch(String),
    /// 导航失败
    #[error("导航到 {url} 失败: {reason}")]
    Navigation { url: String, reason: String },
    /// 等待元素超时
    #[error("等待元素 `{selector}` 超时 ({timeout:?})")]
    Timeout { selector: String, timeout: Duration },
    /// 元素缺少属性
    #[error("元素 `{selector}` 缺少属性 `{attribute}`")]
    MissingAttribute { selector: String, attribute: String },
    /// CDP 协议错误
    #[error("浏览器协议错误: {0}")]
    Protocol(#[from] chromiumoxide::error::CdpError),
    /// 页面脚本执行失败
    #[error("执行脚本失败: {0}")]
    Script(String),
}

/// 配置错误
#[derive(Debug, Error)]
pub enum ConfigError {
    /// 环境变量解析失败
    #[error("环境变量 {var_name} 解析失败: 值 '{value}' 无法转换为 {expected_type}")]
    EnvVarParseFailed {
        var_name: String,
        value: String,
        expected_type: String,
    },
    /// 读取配置文件失败
    #[error("读取配置文件失败 ({path}): {source}")]
    ReadFailed {
        path: String,
        #[source]
        source: std::io::Error,
    },
    /// TOML 解析失败
    #[error("TOML解析失败 ({path}): {source}")]
    TomlParseFailed {
        path: String,
        #[source]
        source: toml::de::Error,
    },
    /// 配置值非法
    #[error("配置项 {field} 非法: {reason}")]
    Invalid { field: String, reason: String },
}

/// 表格导入导出错误
#[derive(Debug, Error)]
pub enum TableIoError {
    /// 未编译表格支持
    #[error("表格导入导出不可用: {0}")]
    Unavailable(&'static str),
    /// 文件读写失败
    #[error("读写表格文件失败 ({path}): {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    /// CSV 解析或写入失败
    #[cfg(feature = "spreadsheet")]
    #[error("CSV 处理失败 ({path}): {source}")]
    Csv {
        path: String,
        #[source]
        source: csv::Error,
    },
}

impl AppError {
    /// 创建文件读写错误
    pub fn file(path: impl Into<String>, source: std::io::Error) -> Self {
        AppError::File {
            path: path.into(),
            source,
        }
    }
}

impl LookupError {
    /// 创建导航错误
    pub fn navigation(url: impl Into<String>, reason: impl ToString) -> Self {
        LookupError::Navigation {
            url: url.into(),
            reason: reason.to_string(),
        }
    }

    /// 是否为等待超时
    pub fn is_timeout(&self) -> bool {
        matches!(self, LookupError::Timeout { .. })
    }
}

/// 应用程序结果类型
pub type AppResult<T> = Result<T, AppError>;
