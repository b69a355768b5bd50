//! 表格导入导出 - 业务能力层
//!
//! 导入：读取第一列号码；导出：写出 (Number, Operator) 两列。
//! 是否支持由编译特性 `spreadsheet` 决定，启动时选择实现。

use std::path::Path;

use crate::error::TableIoError;

/// 表格导入导出能力
pub trait TableIo: Send + Sync {
    /// 实现名称（用于日志）
    fn name(&self) -> &'static str;

    /// 读取第一列的所有号码
    fn import_numbers(&self, path: &Path) -> Result<Vec<String>, TableIoError>;

    /// 写出 (号码, 运营商) 两列
    fn export_results(&self, path: &Path, rows: &[(String, String)]) -> Result<(), TableIoError>;
}

/// 启动时选择可用的实现
pub fn select_table_io() -> Box<dyn TableIo> {
    #[cfg(feature = "spreadsheet")]
    {
        Box::new(CsvTableIo)
    }
    #[cfg(not(feature = "spreadsheet"))]
    {
        Box::new(UnavailableTableIo)
    }
}

/// 未编译表格支持时的占位实现，所有调用都返回明确的错误
#[derive(Debug, Default)]
pub struct UnavailableTableIo;

const UNAVAILABLE_MESSAGE: &str = "未启用 spreadsheet 特性，请使用 `--features spreadsheet` 重新编译";

impl TableIo for UnavailableTableIo {
    fn name(&self) -> &'static str {
        "unavailable"
    }

    fn import_numbers(&self, _path: &Path) -> Result<Vec<String>, TableIoError> {
        Err(TableIoError::Unavailable(UNAVAILABLE_MESSAGE))
    }

    fn export_results(&self, _path: &Path, _rows: &[(String, String)]) -> Result<(), TableIoError> {
        Err(TableIoError::Unavailable(UNAVAILABLE_MESSAGE))
    }
}

#[cfg(feature = "spreadsheet")]
pub use csv_impl::CsvTableIo;

#[cfg(feature = "spreadsheet")]
mod csv_impl {
    use super::*;
    use tracing::{debug, info};

    /// 导出表头
    const HEADER: [&str; 2] = ["Number", "Operator"];

    /// 基于 csv 的实现
    #[derive(Debug, Default)]
    pub struct CsvTableIo;

    fn csv_error(path: &Path, source: csv::Error) -> TableIoError {
        TableIoError::Csv {
            path: path.display().to_string(),
            source,
        }
    }

    impl TableIo for CsvTableIo {
        fn name(&self) -> &'static str {
            "csv"
        }

        fn import_numbers(&self, path: &Path) -> Result<Vec<String>, TableIoError> {
            let mut reader = csv::ReaderBuilder::new()
                .has_headers(false)
                .flexible(true)
                .from_path(path)
                .map_err(|e| csv_error(path, e))?;

            let mut numbers = Vec::new();
            for (row, record) in reader.records().enumerate() {
                let record = record.map_err(|e| csv_error(path, e))?;
                let Some(cell) = record.get(0).map(str::trim) else {
                    continue;
                };
                if cell.is_empty() || (row == 0 && cell.eq_ignore_ascii_case(HEADER[0])) {
                    continue;
                }
                numbers.push(cell.to_string());
            }

            debug!("从 {} 读取到 {} 个号码", path.display(), numbers.len());
            Ok(numbers)
        }

        fn export_results(&self, path: &Path, rows: &[(String, String)]) -> Result<(), TableIoError> {
            let mut writer = csv::Writer::from_path(path).map_err(|e| csv_error(path, e))?;
            writer.write_record(HEADER).map_err(|e| csv_error(path, e))?;
            for (number, operator) in rows {
                writer
                    .write_record([number, operator])
                    .map_err(|e| csv_error(path, e))?;
            }
            writer.flush().map_err(|source| TableIoError::Io {
                path: path.display().to_string(),
                source,
            })?;

            info!("💾 已导出 {} 行到 {}", rows.len(), path.display());
            Ok(())
        }
    }
}
