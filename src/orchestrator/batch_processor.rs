//! 批量号码处理器 - 编排层
//!
//! ## 职责
//!
//! 1. **顺序执行**：一次只处理一个号码，同一时刻最多一个浏览器会话
//! 2. **事件发布**：通过通道发布 当前号码 / 结果 / 进度 / 完成 事件
//! 3. **失败隔离**：单个号码失败只产生一行 `Error`，不会中断批次
//! 4. **忙碌标记**：批次运行期间拒绝再次启动
//!
//! ## 设计特点
//!
//! - 批次在独立的 tokio 任务上运行，调用方只消费事件
//! - 不重试，每个号码只尝试一次

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::browser::SessionLauncher;
use crate::error::{AppError, AppResult};
use crate::models::{BatchSummary, CanonicalNumber, LookupOutcome};
use crate::services::report_sink::{forward_events, BatchEvent, ReportSink};
use crate::workflow::{LookupCtx, LookupFlow};

/// 批量编排器
pub struct Orchestrator<L: SessionLauncher> {
    flow: Arc<LookupFlow<L>>,
    busy: Arc<AtomicBool>,
}

impl<L: SessionLauncher> Clone for Orchestrator<L> {
    fn clone(&self) -> Self {
        Self {
            flow: Arc::clone(&self.flow),
            busy: Arc::clone(&self.busy),
        }
    }
}

impl<L: SessionLauncher> Orchestrator<L> {
    pub fn new(flow: LookupFlow<L>) -> Self {
        Self {
            flow: Arc::new(flow),
            busy: Arc::new(AtomicBool::new(false)),
        }
    }

    pub fn flow(&self) -> &LookupFlow<L> {
        &self.flow
    }

    /// 是否有批次正在运行
    pub fn is_busy(&self) -> bool {
        self.busy.load(Ordering::SeqCst)
    }

    /// 在后台任务上启动一个批次
    ///
    /// 已有批次运行时返回 [`AppError::BatchInProgress`]
    pub fn start(&self, numbers: Vec<CanonicalNumber>) -> AppResult<BatchHandle> {
        if self
            .busy
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            return Err(AppError::BatchInProgress);
        }

        let guard = BusyGuard(Arc::clone(&self.busy));
        let flow = Arc::clone(&self.flow);
        let (tx, rx) = mpsc::unbounded_channel();

        let task = tokio::spawn(async move {
            let _guard = guard;
            run_batch(&flow, numbers, &tx).await
        });

        Ok(BatchHandle { events: rx, task })
    }
}

/// 批次运行期间持有，任务结束（包括 panic）时清除忙碌标记
struct BusyGuard(Arc<AtomicBool>);

impl Drop for BusyGuard {
    fn drop(&mut self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

/// 运行中批次的句柄
#[derive(Debug)]
pub struct BatchHandle {
    /// 事件流，批次结束后关闭
    pub events: UnboundedReceiver<BatchEvent>,
    task: JoinHandle<BatchSummary>,
}

impl BatchHandle {
    /// 把全部事件交给接收方，并等待批次结束
    pub async fn report_to<S: ReportSink>(self, sink: &mut S) -> AppResult<BatchSummary> {
        forward_events(self.events, sink).await;
        self.task
            .await
            .map_err(|e| AppError::Worker(e.to_string()))
    }

    /// 不消费事件，直接等待批次结束
    pub async fn join(self) -> AppResult<BatchSummary> {
        drop(self.events);
        self.task
            .await
            .map_err(|e| AppError::Worker(e.to_string()))
    }
}

/// 顺序处理所有号码
///
/// 事件顺序：对第 i 个号码依次发送 `Current`、`Result`、`Progress`，
/// 全部结束后发送一次 `Done`。接收方关闭不会中断批次。
pub async fn run_batch<L: SessionLauncher>(
    flow: &LookupFlow<L>,
    numbers: Vec<CanonicalNumber>,
    events: &UnboundedSender<BatchEvent>,
) -> BatchSummary {
    let total = numbers.len();
    let mut summary = BatchSummary {
        total,
        ..Default::default()
    };

    info!("📋 本批共 {} 个号码", total);

    for (index, number) in numbers.into_iter().enumerate() {
        let position = index + 1;
        let ctx = LookupCtx::new(position, total, number);

        emit(events, BatchEvent::Current(ctx.number.to_string()));

        let resolution = flow.resolve_one(&ctx).await;
        let outcome = LookupOutcome::new(position, ctx.number, &resolution);
        summary.record(&outcome);

        emit(events, BatchEvent::Result(outcome));
        emit(events, BatchEvent::Progress(progress_percent(position, total)));
    }

    emit(events, BatchEvent::Done(summary));
    summary
}

/// 已完成数量对应的百分比（向下取整）
pub fn progress_percent(completed: usize, total: usize) -> u8 {
    if total == 0 {
        return 100;
    }
    (completed.min(total) * 100 / total) as u8
}

fn emit(events: &UnboundedSender<BatchEvent>, event: BatchEvent) {
    if events.send(event).is_err() {
        debug!("事件接收方已关闭，继续处理批次");
    }
}
