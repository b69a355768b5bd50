use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use tokio::io::AsyncReadExt;

use mnp_lookup::models::render_tsv;
use mnp_lookup::services::LogSink;
use mnp_lookup::utils::logging;
use mnp_lookup::{App, Config, LookupOutcome};

/// 批量查询手机号所属运营商
#[derive(Parser, Debug)]
#[command(name = "mnp-lookup", version, about)]
struct Cli {
    /// 要查询的号码，未提供且没有 --input 时从标准输入按行读取
    numbers: Vec<String>,

    /// 输入文件（.csv 读取第一列，其它文件按行读取）
    #[arg(short, long)]
    input: Option<PathBuf>,

    /// TOML 配置文件
    #[arg(short, long, env = "MNP_CONFIG")]
    config: Option<PathBuf>,

    /// 导出结果到 CSV
    #[arg(short, long)]
    export: Option<PathBuf>,

    /// 结果输出格式
    #[arg(long, value_enum, default_value_t = OutputFormat::Table)]
    format: OutputFormat,

    /// 显示浏览器窗口
    #[arg(long)]
    headed: bool,

    /// 元素等待超时（秒）
    #[arg(long)]
    timeout: Option<u64>,

    /// 详细日志
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum OutputFormat {
    Table,
    Tsv,
    Json,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // 加载配置：默认值 → 配置文件 → 环境变量 → 命令行
    let mut config = match &cli.config {
        Some(path) => Config::from_toml_file(path)?,
        None => Config::default(),
    }
    .apply_env()?;
    if cli.headed {
        config.headless = false;
    }
    if let Some(secs) = cli.timeout {
        config.wait_timeout_secs = secs;
    }
    config.verbose_logging |= cli.verbose;

    // 初始化日志
    logging::init(config.verbose_logging);

    // 初始化应用（浏览器不可用时在这里退出）
    let app = App::initialize(config).context("初始化失败")?;

    let raw_lines = read_input(&app, &cli).await?;
    let report = app.run(&raw_lines, &mut LogSink).await?;

    print_outcomes(&report.outcomes, cli.format)?;

    if let Some(path) = &cli.export {
        app.export(path, &report.outcomes)
            .with_context(|| format!("导出失败: {}", path.display()))?;
    }

    Ok(())
}

async fn read_input(app: &App, cli: &Cli) -> Result<Vec<String>> {
    let mut lines = cli.numbers.clone();

    if let Some(path) = &cli.input {
        let from_file = app
            .load_input(path)
            .await
            .with_context(|| format!("读取输入失败: {}", path.display()))?;
        lines.extend(from_file);
    }

    if lines.is_empty() {
        let mut text = String::new();
        tokio::io::stdin()
            .read_to_string(&mut text)
            .await
            .context("读取标准输入失败")?;
        lines.extend(text.lines().map(str::to_string));
    }

    Ok(lines)
}

fn print_outcomes(outcomes: &[LookupOutcome], format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Tsv => print!("{}", render_tsv(outcomes)),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(outcomes)?),
        OutputFormat::Table => {
            println!("{:<8} {:<16} {}", "Sr. No.", "Number", "Operator");
            for outcome in outcomes {
                println!(
                    "{:<8} {:<16} {}",
                    outcome.position, outcome.display_number, outcome.operator
                );
            }
        }
    }
    Ok(())
}
