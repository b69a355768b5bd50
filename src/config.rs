use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

use serde::Deserialize;

use crate::error::ConfigError;

/// 查询页面上用到的 CSS 选择器
#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Selectors {
    /// Cookie 同意按钮（可能不存在）
    pub consent_button: String,
    /// 号码输入框
    pub number_input: String,
    /// 提交按钮
    pub submit_button: String,
    /// 运营商 logo 图片
    pub operator_logo: String,
}

impl Default for Selectors {
    fn default() -> Self {
        Self {
            consent_button: "#onetrust-accept-btn-handler".to_string(),
            number_input: "input[data-testid='item-input']".to_string(),
            submit_button: "button[data-testid='button-country-widget']".to_string(),
            operator_logo: "img[data-testid='summary-product-operator-logo']".to_string(),
        }
    }
}

/// 程序配置
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct Config {
    /// 目标URL
    pub target_url: String,
    /// 所有元素等待共用的超时时间（秒）
    pub wait_timeout_secs: u64,
    /// 是否使用无头模式
    pub headless: bool,
    /// 浏览器可执行文件路径，为空时自动探测
    pub chrome_executable: Option<PathBuf>,
    /// 额外的浏览器启动参数
    pub browser_args: Vec<String>,
    /// 页面选择器
    pub selectors: Selectors,
    /// 本次运行日志文件
    pub run_log_file: String,
    /// 查询失败号码输出文件
    pub failed_numbers_file: String,
    /// 是否显示详细日志
    pub verbose_logging: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            target_url: "https://www.ding.com".to_string(),
            wait_timeout_secs: 30,
            headless: true,
            chrome_executable: None,
            browser_args: vec!["--disable-gpu".to_string()],
            selectors: Selectors::default(),
            run_log_file: "lookup_log.txt".to_string(),
            failed_numbers_file: "failed_numbers.txt".to_string(),
            verbose_logging: false,
        }
    }
}

impl Config {
    /// 从 TOML 文件加载，未出现的字段使用默认值
    pub fn from_toml_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::ReadFailed {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml_str(&content).map_err(|source| ConfigError::TomlParseFailed {
            path: path.display().to_string(),
            source,
        })
    }

    pub fn from_toml_str(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    /// 默认值叠加环境变量
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::default().apply_env()
    }

    /// 用环境变量覆盖当前配置
    pub fn apply_env(self) -> Result<Self, ConfigError> {
        self.apply_vars(|name| std::env::var(name).ok())
    }

    fn apply_vars(mut self, var: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        if let Some(url) = var("MNP_TARGET_URL") {
            self.target_url = url;
        }
        if let Some(secs) = parse_var(&var, "MNP_WAIT_TIMEOUT_SECS", "u64")? {
            self.wait_timeout_secs = secs;
        }
        if let Some(headless) = parse_var(&var, "MNP_HEADLESS", "bool")? {
            self.headless = headless;
        }
        if let Some(path) = var("MNP_CHROME_EXECUTABLE") {
            self.chrome_executable = Some(PathBuf::from(path));
        }
        if let Some(path) = var("MNP_RUN_LOG") {
            self.run_log_file = path;
        }
        if let Some(path) = var("MNP_FAILED_FILE") {
            self.failed_numbers_file = path;
        }
        if let Some(verbose) = parse_var(&var, "MNP_VERBOSE", "bool")? {
            self.verbose_logging = verbose;
        }
        Ok(self)
    }

    /// 检查配置是否可用
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.wait_timeout_secs == 0 {
            return Err(ConfigError::Invalid {
                field: "wait_timeout_secs".to_string(),
                reason: "必须大于 0".to_string(),
            });
        }
        if self.target_url.trim().is_empty() {
            return Err(ConfigError::Invalid {
                field: "target_url".to_string(),
                reason: "不能为空".to_string(),
            });
        }
        Ok(())
    }

    pub fn wait_timeout(&self) -> Duration {
        Duration::from_secs(self.wait_timeout_secs)
    }
}

fn parse_var<T: FromStr>(
    var: &impl Fn(&str) -> Option<String>,
    name: &str,
    expected_type: &str,
) -> Result<Option<T>, ConfigError> {
    match var(name) {
        None => Ok(None),
        Some(value) => value
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| ConfigError::EnvVarParseFailed {
                var_name: name.to_string(),
                value,
                expected_type: expected_type.to_string(),
            }),
    }
}
