use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use chromiumoxide::element::Element;
use chromiumoxide::{Browser, BrowserConfig, Handler};
use futures::StreamExt;
use tokio::task::JoinHandle;
use tokio::time::sleep;
use tracing::{debug, error, info};

use crate::browser::{BrowserSession, PageElement, SessionLauncher};
use crate::config::Config;
use crate::error::{AppError, LookupError};
use crate::infrastructure::JsExecutor;

/// 元素轮询间隔
const POLL_INTERVAL: Duration = Duration::from_millis(250);

/// 有头模式下把窗口挪到屏幕外
const HEADED_ARGS: [&str; 2] = ["--start-minimized", "--window-position=-32000,0"];

/// 每次查询启动一个独立 Chromium 进程的启动器
pub struct ChromeLauncher {
    headless: bool,
    chrome_executable: Option<PathBuf>,
    browser_args: Vec<String>,
    request_timeout: Duration,
    profile_root: PathBuf,
    launched: AtomicUsize,
}

impl ChromeLauncher {
    pub fn new(config: &Config) -> Self {
        Self {
            headless: config.headless,
            chrome_executable: config.chrome_executable.clone(),
            browser_args: config.browser_args.clone(),
            request_timeout: config.wait_timeout(),
            profile_root: std::env::temp_dir(),
            launched: AtomicUsize::new(0),
        }
    }

    /// 启动前探测：浏览器可执行文件能否找到、启动参数能否构建
    pub fn probe(&self) -> Result<(), AppError> {
        if let Some(path) = &self.chrome_executable {
            if !path.exists() {
                return Err(AppError::BrowserUnavailable(format!(
                    "找不到浏览器可执行文件: {}",
                    path.display()
                )));
            }
        }
        self.browser_config(None)
            .map(|_| ())
            .map_err(|e| AppError::BrowserUnavailable(e.to_string()))
    }

    fn browser_config(&self, profile_dir: Option<&Path>) -> Result<BrowserConfig, LookupError> {
        let mut builder = BrowserConfig::builder()
            .request_timeout(self.request_timeout)
            .args(self.browser_args.iter().cloned());

        builder = if self.headless {
            builder.new_headless_mode()
        } else {
            builder.with_head().args(HEADED_ARGS)
        };

        if let Some(path) = &self.chrome_executable {
            builder = builder.chrome_executable(path);
        }
        if let Some(dir) = profile_dir {
            builder = builder.user_data_dir(dir);
        }

        builder.build().map_err(|e| {
            error!("配置浏览器失败: {}", e);
            LookupError::Launch(e)
        })
    }

    async fn start_browser(&self, profile_dir: &Path) -> Result<(Browser, Handler), LookupError> {
        let config = self.browser_config(Some(profile_dir))?;

        debug!("🚀 启动浏览器, 用户目录: {}", profile_dir.display());
        Browser::launch(config).await.map_err(|e| {
            error!("启动浏览器失败: {}", e);
            LookupError::Launch(e.to_string())
        })
    }

    /// 每个会话使用独立的用户目录，避免 cookie 串到下一个号码
    fn next_profile_dir(&self) -> PathBuf {
        let seq = self.launched.fetch_add(1, Ordering::Relaxed);
        self.profile_root
            .join(format!("mnp-lookup-{}-{}", std::process::id(), seq))
    }
}

#[async_trait]
impl SessionLauncher for ChromeLauncher {
    type Session = ChromeSession;

    async fn launch(&self) -> Result<ChromeSession, LookupError> {
        let profile_dir = self.next_profile_dir();
        let (browser, mut handler) = match self.start_browser(&profile_dir).await {
            Ok(started) => started,
            Err(e) => {
                discard_profile_dir(&profile_dir).await;
                return Err(e);
            }
        };

        // 在后台处理浏览器事件
        let handler_task = tokio::spawn(async move {
            while let Some(event) = handler.next().await {
                if let Err(e) = event {
                    debug!("浏览器事件处理错误: {}", e);
                }
            }
        });

        Ok(ChromeSession {
            browser,
            executor: None,
            handler_task,
            profile_dir,
            closed: false,
        })
    }
}

/// 一个独立的 Chromium 会话
pub struct ChromeSession {
    browser: Browser,
    executor: Option<JsExecutor>,
    handler_task: JoinHandle<()>,
    profile_dir: PathBuf,
    closed: bool,
}

impl ChromeSession {
    fn executor(&self) -> Result<&JsExecutor, LookupError> {
        self.executor
            .as_ref()
            .ok_or_else(|| LookupError::Script("页面尚未打开".to_string()))
    }

    async fn wait_for(
        &self,
        selector: &str,
        timeout: Duration,
        clickable: bool,
    ) -> Result<ChromeElement, LookupError> {
        let executor = self.executor()?;

        let poll = async {
            loop {
                let ready = !clickable || executor.is_clickable(selector).await.unwrap_or(false);
                if ready {
                    if let Ok(element) = executor.page().find_element(selector).await {
                        return ChromeElement { element };
                    }
                }
                sleep(POLL_INTERVAL).await;
            }
        };

        tokio::time::timeout(timeout, poll)
            .await
            .map_err(|_| LookupError::Timeout {
                selector: selector.to_string(),
                timeout,
            })
    }
}

#[async_trait]
impl BrowserSession for ChromeSession {
    type Element = ChromeElement;

    async fn navigate(&mut self, url: &str) -> Result<(), LookupError> {
        if self.executor.is_none() {
            let page = self
                .browser
                .new_page(url)
                .await
                .map_err(|e| LookupError::navigation(url, e))?;
            self.executor = Some(JsExecutor::new(page));
        } else {
            self.executor()?
                .page()
                .goto(url)
                .await
                .map_err(|e| LookupError::navigation(url, e))?;
        }

        if let Ok(state) = self.executor()?.ready_state().await {
            debug!("页面已打开: {} (readyState: {})", url, state);
        }
        Ok(())
    }

    async fn wait_for_clickable(
        &self,
        selector: &str,
        timeout: Duration,
    ) -> Result<ChromeElement, LookupError> {
        self.wait_for(selector, timeout, true).await
    }

    async fn wait_for_present(
        &self,
        selector: &str,
        timeout: Duration,
    ) -> Result<ChromeElement, LookupError> {
        self.wait_for(selector, timeout, false).await
    }

    async fn close(&mut self) -> Result<(), LookupError> {
        if self.closed {
            return Ok(());
        }
        self.closed = true;

        let result = self.browser.close().await;
        if let Err(e) = self.browser.wait().await {
            debug!("等待浏览器进程退出失败: {}", e);
        }
        self.handler_task.abort();

        discard_profile_dir(&self.profile_dir).await;

        info!("🧹 浏览器会话已关闭");
        result.map(|_| ()).map_err(LookupError::from)
    }
}

async fn discard_profile_dir(dir: &Path) {
    if let Err(e) = tokio::fs::remove_dir_all(dir).await {
        debug!("清理用户目录失败 {}: {}", dir.display(), e);
    }
}

/// chromiumoxide 元素
pub struct ChromeElement {
    element: Element,
}

#[async_trait]
impl PageElement for ChromeElement {
    async fn click(&self) -> Result<(), LookupError> {
        self.element.click().await?;
        Ok(())
    }

    async fn activate(&self) -> Result<(), LookupError> {
        self.element
            .call_js_fn("function() { this.click(); }", false)
            .await?;
        Ok(())
    }

    async fn clear(&self) -> Result<(), LookupError> {
        self.element
            .call_js_fn(
                "function() { this.value = ''; this.dispatchEvent(new Event('input', { bubbles: true })); }",
                false,
            )
            .await?;
        Ok(())
    }

    async fn type_text(&self, text: &str) -> Result<(), LookupError> {
        self.element.type_str(text).await?;
        Ok(())
    }

    async fn attribute(&self, name: &str) -> Result<Option<String>, LookupError> {
        Ok(self.element.attribute(name).await?)
    }
}
