//! omfhint 命令行入口：从文件或标准输入读取 JSON 行格式的读数，经过滤器后输出

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde_json::Value;
use tokio::io::{AsyncBufReadExt, AsyncRead, AsyncWriteExt, BufReader};
use tracing::{debug, warn};

use omfhint::{
    plugin_info, ConfigManager, FilterConfig, LoggingAssetTracker, OmfHintFilter, Reading, FILTER_NAME,
};

/// OMF Hint filter - add OMF hints to sensor readings.
#[derive(Parser, Debug)]
#[command(name = "omfhint")]
#[command(author, version, about, long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Command,

    /// Verbose output (debug logging).
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Filter readings (JSON lines) and print the annotated readings.
    Filter {
        /// Configuration category JSON file.
        #[arg(short, long)]
        config: Option<PathBuf>,
        /// Hints JSON, overrides the hints of the configuration category.
        #[arg(long, conflicts_with = "hints_file")]
        hints: Option<String>,
        /// File containing the hints JSON.
        #[arg(long)]
        hints_file: Option<PathBuf>,
        /// Readings file, stdin when omitted.
        #[arg(short, long)]
        input: Option<PathBuf>,
        /// Filter instance name used for asset tracking.
        #[arg(long, default_value = FILTER_NAME)]
        name: String,
        /// Disable the filter (readings pass through unchanged).
        #[arg(long)]
        disable: bool,
    },
    /// Print the plugin information and default configuration.
    Info,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.verbose);

    match args.command {
        Command::Info => {
            println!("{}", serde_json::to_string_pretty(&plugin_info())?);
            Ok(())
        }
        Command::Filter {
            config,
            hints,
            hints_file,
            input,
            name,
            disable,
        } => {
            let config = load_config(&name, config, hints, hints_file, disable).await?;
            let filter = OmfHintFilter::new(&config, Arc::new(LoggingAssetTracker));
            debug!("{:?}", filter);

            match input {
                Some(path) => {
                    let file = tokio::fs::File::open(&path)
                        .await
                        .with_context(|| format!("failed to open {}", path.display()))?;
                    run_filter(&filter, file).await
                }
                None => run_filter(&filter, tokio::io::stdin()).await,
            }
        }
    }
}

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact()
        .init();
}

/// 合并配置分类文件与命令行参数
async fn load_config(
    name: &str,
    config_path: Option<PathBuf>,
    hints: Option<String>,
    hints_file: Option<PathBuf>,
    disable: bool,
) -> Result<FilterConfig> {
    let mut config = match config_path {
        Some(path) => {
            let text = tokio::fs::read_to_string(&path)
                .await
                .with_context(|| format!("failed to read {}", path.display()))?;
            FilterConfig::from_category(name, &text)?
        }
        // 无配置文件时默认启用
        None => ConfigManager::custom().name(name).enabled(true).build(),
    };

    if let Some(path) = hints_file {
        let text = tokio::fs::read_to_string(&path)
            .await
            .with_context(|| format!("failed to read {}", path.display()))?;
        config.hints = Some(text);
    } else if let Some(hints) = hints {
        config.hints = Some(hints);
    }
    if disable {
        config.enabled = false;
    }

    Ok(config)
}

/// 逐行读取读数；每行可以是单个读数或读数数组，按行作为一批处理
async fn run_filter<R>(filter: &OmfHintFilter, source: R) -> Result<()>
where
    R: AsyncRead + Unpin,
{
    let mut lines = BufReader::new(source).lines();
    let mut stdout = tokio::io::stdout();
    let mut line_no = 0usize;

    while let Some(line) = lines.next_line().await? {
        line_no += 1;
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        let batch = match parse_batch(line) {
            Ok(batch) => batch,
            Err(e) => {
                warn!("Skipping line {}: {}", line_no, e);
                continue;
            }
        };

        for reading in filter.ingest(batch) {
            let mut out = serde_json::to_string(&reading)?;
            out.push('\n');
            stdout.write_all(out.as_bytes()).await?;
        }
    }

    stdout.flush().await?;
    Ok(())
}

fn parse_batch(line: &str) -> Result<Vec<Reading>> {
    let value: Value = serde_json::from_str(line)?;
    let batch = match value {
        Value::Array(items) => items
            .into_iter()
            .map(serde_json::from_value)
            .collect::<Result<Vec<Reading>, _>>()?,
        other => vec![serde_json::from_value(other)?],
    };
    Ok(batch)
}
