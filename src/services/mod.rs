pub mod report_sink;
pub mod run_log;
pub mod table_io;

pub use report_sink::{forward_events, BatchEvent, CollectingSink, LogSink, ReportSink};
pub use run_log::RunLog;
#[cfg(feature = "spreadsheet")]
pub use table_io::CsvTableIo;
pub use table_io::{select_table_io, TableIo, UnavailableTableIo};
