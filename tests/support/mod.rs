//! 测试用的脚本化浏览器：不启动真实进程，按预设剧本返回元素
#![allow(dead_code)]

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use mnp_lookup::browser::{BrowserSession, PageElement, SessionLauncher};
use mnp_lookup::config::Selectors;
use mnp_lookup::LookupError;

pub const JIO_LOGO: &str = "https://imagerepo.ding.com/logo/RJ/IN.png";
pub const AIRTEL_LOGO: &str = "https://imagerepo.ding.com/logo/AI/IN.png";

/// 某个号码提交后页面的表现
#[derive(Debug, Clone)]
pub enum Plan {
    /// 出现 logo，src 为给定值
    Logo(String),
    /// 结果一直不出现
    NoLogo,
    /// logo 出现但没有 src
    MissingSrc,
}

#[derive(Debug, Default)]
pub struct Stats {
    pub launched: usize,
    pub closed: usize,
    pub active: usize,
    pub max_active: usize,
    pub typed: Vec<String>,
    pub consent_clicks: usize,
    pub activations: usize,
}

#[derive(Default)]
pub struct ScriptedLauncher {
    plans: HashMap<String, Plan>,
    failing_launches: HashSet<usize>,
    failing_navigations: HashSet<usize>,
    consent_present: bool,
    selectors: Selectors,
    pub stats: Arc<Mutex<Stats>>,
}

impl ScriptedLauncher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_plan(mut self, number: &str, plan: Plan) -> Self {
        self.plans.insert(number.to_string(), plan);
        self
    }

    /// 第 n 次启动失败（从 1 开始）
    pub fn fail_launch(mut self, nth: usize) -> Self {
        self.failing_launches.insert(nth);
        self
    }

    /// 第 n 个会话导航失败（从 1 开始）
    pub fn fail_navigation(mut self, nth: usize) -> Self {
        self.failing_navigations.insert(nth);
        self
    }

    pub fn with_consent(mut self) -> Self {
        self.consent_present = true;
        self
    }

    pub fn stats(&self) -> Arc<Mutex<Stats>> {
        Arc::clone(&self.stats)
    }
}

#[async_trait]
impl SessionLauncher for ScriptedLauncher {
    type Session = ScriptedSession;

    async fn launch(&self) -> Result<ScriptedSession, LookupError> {
        let seq = {
            let mut stats = self.stats.lock().unwrap();
            stats.launched += 1;
            stats.launched
        };

        if self.failing_launches.contains(&seq) {
            return Err(LookupError::Launch("scripted launch failure".to_string()));
        }

        {
            let mut stats = self.stats.lock().unwrap();
            stats.active += 1;
            stats.max_active = stats.max_active.max(stats.active);
        }

        Ok(ScriptedSession {
            seq,
            plans: self.plans.clone(),
            fail_navigation: self.failing_navigations.contains(&seq),
            consent_present: self.consent_present,
            selectors: self.selectors.clone(),
            typed: Arc::new(Mutex::new(String::new())),
            stats: Arc::clone(&self.stats),
            closed: false,
        })
    }
}

pub struct ScriptedSession {
    seq: usize,
    plans: HashMap<String, Plan>,
    fail_navigation: bool,
    consent_present: bool,
    selectors: Selectors,
    typed: Arc<Mutex<String>>,
    stats: Arc<Mutex<Stats>>,
    closed: bool,
}

impl ScriptedSession {
    fn element(&self, kind: Kind) -> ScriptedElement {
        ScriptedElement {
            kind,
            typed: Arc::clone(&self.typed),
            stats: Arc::clone(&self.stats),
        }
    }

    fn timeout(selector: &str, timeout: Duration) -> LookupError {
        LookupError::Timeout {
            selector: selector.to_string(),
            timeout,
        }
    }
}

#[async_trait]
impl BrowserSession for ScriptedSession {
    type Element = ScriptedElement;

    async fn navigate(&mut self, url: &str) -> Result<(), LookupError> {
        if self.fail_navigation {
            return Err(LookupError::navigation(url, format!("session {} crashed", self.seq)));
        }
        Ok(())
    }

    async fn wait_for_clickable(
        &self,
        selector: &str,
        timeout: Duration,
    ) -> Result<ScriptedElement, LookupError> {
        if selector == self.selectors.consent_button && self.consent_present {
            Ok(self.element(Kind::Consent))
        } else if selector == self.selectors.number_input {
            Ok(self.element(Kind::Input))
        } else if selector == self.selectors.submit_button {
            Ok(self.element(Kind::Submit))
        } else {
            Err(Self::timeout(selector, timeout))
        }
    }

    async fn wait_for_present(
        &self,
        selector: &str,
        timeout: Duration,
    ) -> Result<ScriptedElement, LookupError> {
        if selector != self.selectors.operator_logo {
            return Err(Self::timeout(selector, timeout));
        }

        let typed = self.typed.lock().unwrap().clone();
        let plan = self
            .plans
            .get(&typed)
            .cloned()
            .unwrap_or_else(|| Plan::Logo(JIO_LOGO.to_string()));

        match plan {
            Plan::Logo(src) => Ok(self.element(Kind::Logo(Some(src)))),
            Plan::MissingSrc => Ok(self.element(Kind::Logo(None))),
            Plan::NoLogo => Err(Self::timeout(selector, timeout)),
        }
    }

    async fn close(&mut self) -> Result<(), LookupError> {
        if !self.closed {
            self.closed = true;
            let mut stats = self.stats.lock().unwrap();
            stats.closed += 1;
            stats.active -= 1;
        }
        Ok(())
    }
}

#[derive(Debug, Clone)]
enum Kind {
    Consent,
    Input,
    Submit,
    Logo(Option<String>),
}

pub struct ScriptedElement {
    kind: Kind,
    typed: Arc<Mutex<String>>,
    stats: Arc<Mutex<Stats>>,
}

#[async_trait]
impl PageElement for ScriptedElement {
    async fn click(&self) -> Result<(), LookupError> {
        if let Kind::Consent = self.kind {
            self.stats.lock().unwrap().consent_clicks += 1;
        }
        Ok(())
    }

    async fn activate(&self) -> Result<(), LookupError> {
        self.stats.lock().unwrap().activations += 1;
        Ok(())
    }

    async fn clear(&self) -> Result<(), LookupError> {
        self.typed.lock().unwrap().clear();
        Ok(())
    }

    async fn type_text(&self, text: &str) -> Result<(), LookupError> {
        self.typed.lock().unwrap().push_str(text);
        self.stats.lock().unwrap().typed.push(text.to_string());
        Ok(())
    }

    async fn attribute(&self, name: &str) -> Result<Option<String>, LookupError> {
        match (&self.kind, name) {
            (Kind::Logo(src), "src") => Ok(src.clone()),
            _ => Ok(None),
        }
    }
}
