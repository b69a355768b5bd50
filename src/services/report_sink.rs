//! 结果上报 - 业务能力层
//!
//! 批处理任务把事件发到通道里，调用方按自己的节奏消费并交给 `ReportSink`

use tokio::sync::mpsc::UnboundedReceiver;
use tracing::info;

use crate::models::{BatchSummary, LookupOutcome};

/// 批处理事件
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BatchEvent {
    /// 即将处理的号码
    Current(String),
    /// 一个号码的结果
    Result(LookupOutcome),
    /// 进度百分比 (0..=100)
    Progress(u8),
    /// 批次结束，只发送一次
    Done(BatchSummary),
}

/// 事件接收方（界面 / 命令行 / 日志）
pub trait ReportSink {
    fn on_current(&mut self, number: &str);
    fn on_result(&mut self, outcome: &LookupOutcome);
    fn on_progress(&mut self, percent: u8);
    fn on_done(&mut self, summary: &BatchSummary);

    /// 分发单个事件
    fn handle(&mut self, event: &BatchEvent) {
        match event {
            BatchEvent::Current(number) => self.on_current(number),
            BatchEvent::Result(outcome) => self.on_result(outcome),
            BatchEvent::Progress(percent) => self.on_progress(*percent),
            BatchEvent::Done(summary) => self.on_done(summary),
        }
    }
}

impl<S: ReportSink + ?Sized> ReportSink for &mut S {
    fn on_current(&mut self, number: &str) {
        (**self).on_current(number)
    }
    fn on_result(&mut self, outcome: &LookupOutcome) {
        (**self).on_result(outcome)
    }
    fn on_progress(&mut self, percent: u8) {
        (**self).on_progress(percent)
    }
    fn on_done(&mut self, summary: &BatchSummary) {
        (**self).on_done(summary)
    }
}

/// 同时上报给两个接收方
impl<A: ReportSink, B: ReportSink> ReportSink for (A, B) {
    fn on_current(&mut self, number: &str) {
        self.0.on_current(number);
        self.1.on_current(number);
    }
    fn on_result(&mut self, outcome: &LookupOutcome) {
        self.0.on_result(outcome);
        self.1.on_result(outcome);
    }
    fn on_progress(&mut self, percent: u8) {
        self.0.on_progress(percent);
        self.1.on_progress(percent);
    }
    fn on_done(&mut self, summary: &BatchSummary) {
        self.0.on_done(summary);
        self.1.on_done(summary);
    }
}

/// 把通道里的事件全部转交给接收方，直到发送端关闭
pub async fn forward_events<S: ReportSink>(
    mut events: UnboundedReceiver<BatchEvent>,
    sink: &mut S,
) {
    while let Some(event) = events.recv().await {
        sink.handle(&event);
    }
}

/// 只写 tracing 日志
#[derive(Debug, Default)]
pub struct LogSink;

impl ReportSink for LogSink {
    fn on_current(&mut self, number: &str) {
        info!("📱 正在查询: {}", number);
    }

    fn on_result(&mut self, outcome: &LookupOutcome) {
        info!(
            "#{} {} → {}",
            outcome.position, outcome.display_number, outcome.operator
        );
    }

    fn on_progress(&mut self, percent: u8) {
        info!("📊 进度: {}%", percent);
    }

    fn on_done(&mut self, summary: &BatchSummary) {
        info!(
            "✅ 查询完成: 识别 {}, 未识别 {}, 失败 {}",
            summary.resolved, summary.not_found, summary.failed
        );
    }
}

/// 收集所有事件，供导出和测试使用
#[derive(Debug, Default)]
pub struct CollectingSink {
    pub current: Vec<String>,
    pub outcomes: Vec<LookupOutcome>,
    pub progress: Vec<u8>,
    pub done: Vec<BatchSummary>,
    pub events: Vec<BatchEvent>,
}

impl ReportSink for CollectingSink {
    fn on_current(&mut self, number: &str) {
        self.current.push(number.to_string());
        self.events.push(BatchEvent::Current(number.to_string()));
    }

    fn on_result(&mut self, outcome: &LookupOutcome) {
        self.outcomes.push(outcome.clone());
        self.events.push(BatchEvent::Result(outcome.clone()));
    }

    fn on_progress(&mut self, percent: u8) {
        self.progress.push(percent);
        self.events.push(BatchEvent::Progress(percent));
    }

    fn on_done(&mut self, summary: &BatchSummary) {
        self.done.push(*summary);
        self.events.push(BatchEvent::Done(*summary));
    }
}
