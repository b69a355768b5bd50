//! 日志工具模块
//!
//! 提供日志初始化和批次统计输出的辅助函数
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::config::Config;
use crate::models::BatchSummary;

/// 初始化 tracing 日志
///
/// `RUST_LOG` 优先；否则默认 `info`，详细模式下为 `debug`
pub fn init(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    // 测试中可能被重复调用，忽略重复初始化
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init();
}

/// 记录程序启动信息
pub fn log_startup(config: &Config) {
    info!("{}", "=".repeat(60));
    info!("🚀 程序启动 - 运营商批量查询");
    info!("🌐 查询页面: {}", config.target_url);
    info!(
        "⏱️ 等待超时: {} 秒 | 无头模式: {}",
        config.wait_timeout_secs, config.headless
    );
    info!("{}", "=".repeat(60));
}

/// 记录号码加载信息
pub fn log_numbers_loaded(raw: usize, unique: usize) {
    info!("✓ 读取 {} 行输入，去重后 {} 个号码", raw, unique);
    info!("💡 号码将逐个查询，每个号码使用独立的浏览器会话\n");
}

/// 打印最终统计信息
pub fn print_final_stats(summary: &BatchSummary, config: &Config) {
    info!("\n{}", "=".repeat(60));
    info!("📊 全部处理完成统计");
    info!(
        "完成时间: {}",
        chrono::Local::now().format("%Y-%m-%d %H:%M:%S")
    );
    info!("{}", "=".repeat(60));
    info!("✅ 识别: {}/{}", summary.resolved, summary.total);
    info!("❔ 未识别: {}", summary.not_found);
    info!("❌ 失败: {}", summary.failed);
    info!("{}", "=".repeat(60));
    info!("\n日志已保存至: {}", config.run_log_file);
    if summary.failed > 0 {
        info!("失败号码已保存至: {}", config.failed_numbers_file);
    }
}
