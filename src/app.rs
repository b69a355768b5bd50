use std::path::Path;

use tracing::{info, warn};

use crate::browser::{ChromeLauncher, SessionLauncher};
use crate::config::Config;
use crate::error::{AppError, AppResult};
use crate::models::{collect_lines, export_rows, BatchSummary, LookupOutcome};
use crate::orchestrator::Orchestrator;
use crate::services::{select_table_io, CollectingSink, ReportSink, RunLog, TableIo};
use crate::utils::logging;
use crate::workflow::LookupFlow;

/// 应用主结构
pub struct App<L: SessionLauncher = ChromeLauncher> {
    config: Config,
    orchestrator: Orchestrator<L>,
    table_io: Box<dyn TableIo>,
}

/// 一次运行的结果
#[derive(Debug, Clone, Default)]
pub struct RunReport {
    pub summary: BatchSummary,
    pub outcomes: Vec<LookupOutcome>,
}

impl App<ChromeLauncher> {
    /// 初始化应用
    ///
    /// 浏览器不可用时在这里失败，不会进入任何批次
    pub fn initialize(config: Config) -> AppResult<Self> {
        config.validate()?;
        logging::log_startup(&config);

        let launcher = ChromeLauncher::new(&config);
        launcher.probe()?;
        info!("✓ 浏览器可用");

        Ok(Self::with_launcher(config, launcher))
    }
}

impl<L: SessionLauncher> App<L> {
    /// 使用指定的会话启动器创建应用
    pub fn with_launcher(config: Config, launcher: L) -> Self {
        let flow = LookupFlow::new(launcher, &config);
        let table_io = select_table_io();
        info!("📄 表格支持: {}", table_io.name());

        Self {
            orchestrator: Orchestrator::new(flow),
            table_io,
            config,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn orchestrator(&self) -> &Orchestrator<L> {
        &self.orchestrator
    }

    /// 读取输入文件
    ///
    /// `.csv` 文件通过表格能力读取第一列，其它文件按行读取
    pub async fn load_input(&self, path: &Path) -> AppResult<Vec<String>> {
        let is_table = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("csv"));

        if is_table {
            return Ok(self.table_io.import_numbers(path)?);
        }

        let content = tokio::fs::read_to_string(path)
            .await
            .map_err(|e| AppError::file(path.display().to_string(), e))?;
        Ok(content.lines().map(str::to_string).collect())
    }

    /// 运行一个批次
    ///
    /// 输入逐行规范化并去重；事件同时交给运行日志和 `sink`
    pub async fn run<S: ReportSink>(&self, raw_lines: &[String], sink: &mut S) -> AppResult<RunReport> {
        let numbers = collect_lines(raw_lines);
        logging::log_numbers_loaded(raw_lines.len(), numbers.len());

        if numbers.is_empty() {
            warn!("⚠️ 没有可查询的号码，程序结束");
            return Ok(RunReport::default());
        }

        let run_log = RunLog::from_config(&self.config);
        run_log
            .init(numbers.len())
            .map_err(|e| AppError::file(run_log.log_path().display().to_string(), e))?;

        let handle = self.orchestrator.start(numbers)?;

        let mut collector = CollectingSink::default();
        let summary = {
            let mut sinks = (run_log, (&mut collector, sink));
            handle.report_to(&mut sinks).await?
        };

        logging::print_final_stats(&summary, &self.config);

        Ok(RunReport {
            summary,
            outcomes: collector.outcomes,
        })
    }

    /// 导出结果表
    pub fn export(&self, path: &Path, outcomes: &[LookupOutcome]) -> AppResult<()> {
        self.table_io.export_results(path, &export_rows(outcomes))?;
        Ok(())
    }
}
