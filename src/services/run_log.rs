//! 运行日志 - 业务能力层
//!
//! 把每个结果追加到运行日志，把失败号码写入单独文件，方便下次重新提交

use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::config::Config;
use crate::models::{BatchSummary, LookupOutcome};
use crate::services::report_sink::ReportSink;

/// 运行日志
///
/// 职责：
/// - 批次开始时重写日志头
/// - 每个结果追加一行
/// - `Error` 结果的号码逐行写入失败文件
pub struct RunLog {
    log_path: PathBuf,
    failed_path: PathBuf,
}

impl RunLog {
    pub fn new(log_path: impl Into<PathBuf>, failed_path: impl Into<PathBuf>) -> Self {
        Self {
            log_path: log_path.into(),
            failed_path: failed_path.into(),
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(&config.run_log_file, &config.failed_numbers_file)
    }

    pub fn log_path(&self) -> &Path {
        &self.log_path
    }

    pub fn failed_path(&self) -> &Path {
        &self.failed_path
    }

    /// 初始化日志文件和失败文件
    pub fn init(&self, total: usize) -> std::io::Result<()> {
        let log_header = format!(
            "{}\n号码查询日志 - {}\n待查询号码: {}\n{}\n\n",
            "=".repeat(60),
            chrono::Local::now().format("%Y-%m-%d %H:%M:%S"),
            total,
            "=".repeat(60)
        );
        fs::write(&self.log_path, log_header)?;
        fs::write(&self.failed_path, "")?;
        Ok(())
    }

    fn append(path: &Path, line: &str) -> std::io::Result<()> {
        let mut file = OpenOptions::new().create(true).append(true).open(path)?;
        file.write_all(line.as_bytes())
    }

    fn append_or_warn(path: &Path, line: &str) {
        if let Err(e) = Self::append(path, line) {
            warn!("写入 {} 失败: {}", path.display(), e);
        }
    }
}

impl ReportSink for RunLog {
    fn on_current(&mut self, number: &str) {
        debug!("运行日志: 开始 {}", number);
    }

    fn on_result(&mut self, outcome: &LookupOutcome) {
        let line = match &outcome.failure {
            Some(reason) => format!(
                "{}\t{}\t{}\t{}\n",
                outcome.position, outcome.display_number, outcome.operator, reason
            ),
            None => format!(
                "{}\t{}\t{}\t{}\n",
                outcome.position, outcome.display_number, outcome.operator, outcome.logo_url
            ),
        };
        Self::append_or_warn(&self.log_path, &line);

        if outcome.is_error() {
            Self::append_or_warn(&self.failed_path, &format!("{}\n", outcome.number));
        }
    }

    fn on_progress(&mut self, _percent: u8) {}

    fn on_done(&mut self, summary: &BatchSummary) {
        let footer = format!(
            "\n{}\n完成时间: {}\n识别: {} | 未识别: {} | 失败: {} | 总计: {}\n",
            "─".repeat(60),
            chrono::Local::now().format("%Y-%m-%d %H:%M:%S"),
            summary.resolved,
            summary.not_found,
            summary.failed,
            summary.total
        );
        Self::append_or_warn(&self.log_path, &footer);
    }
}
