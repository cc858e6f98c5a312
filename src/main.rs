mod cli;
mod output;

use std::path::PathBuf;
use anyhow::{Context, Result};
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use tokio_stream::StreamExt;

use cli::{Cli, Commands, ConfigAction, OutputFormat};
use dep_cleaner_cli::utils::format_size;
use dep_cleaner_cli::{Config, ScanSettings, Scanner};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // 日志输出到 stderr，避免污染 JSON/CSV 输出
    let level = if cli.verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();

    // 加载配置
    let config = match &cli.config {
        Some(config_path) => Config::load_from_file(config_path)?,
        None => Config::load_or_default()?,
    };

    match cli.command {
        Commands::Scan { paths, format, output, ignore, rule } => {
            let settings = build_settings(&config, ignore, &rule)?;
            let scan_paths = resolve_scan_paths(&config, paths)?;
            run_scan(settings, scan_paths, format, output).await?;
        }
        Commands::Rules => {
            print!("{}", output::render_rules(&config.scan_rules));
        }
        Commands::Config { action } => match action {
            ConfigAction::Show => print!("{}", config.to_toml_string()?),
            ConfigAction::Path => println!("{}", Config::default_config_path()?.display()),
        },
    }

    Ok(())
}

/// 根据命令行参数调整扫描配置
fn build_settings(config: &Config, extra_ignore: Vec<String>, rule_names: &[String]) -> Result<ScanSettings> {
    let mut settings = config.to_scan_settings();
    settings.ignore_patterns.extend(extra_ignore);

    if !rule_names.is_empty() {
        // 显式指定的规则即使在配置中被禁用也会启用
        settings.rules = config
            .scan_rules
            .iter()
            .filter(|rule| rule_names.iter().any(|name| name.eq_ignore_ascii_case(&rule.name)))
            .cloned()
            .map(|mut rule| {
                rule.enabled = true;
                rule
            })
            .collect();

        if settings.rules.is_empty() {
            anyhow::bail!("未知的规则: {}", rule_names.join(", "));
        }
    }

    Ok(settings)
}

/// 命令行路径优先，其次是配置中的路径，最后是当前目录
fn resolve_scan_paths(config: &Config, paths: Vec<String>) -> Result<Vec<PathBuf>> {
    if !paths.is_empty() {
        return Ok(paths.into_iter().map(PathBuf::from).collect());
    }
    if !config.scan_paths.is_empty() {
        return Ok(config.scan_paths.iter().map(PathBuf::from).collect());
    }
    Ok(vec![std::env::current_dir()?])
}

async fn run_scan(
    settings: ScanSettings,
    scan_paths: Vec<PathBuf>,
    format: OutputFormat,
    output_path: Option<PathBuf>,
) -> Result<()> {
    let scanner = Scanner::new(settings);
    let mut handle = scanner.start(&scan_paths);

    let progress = create_progress_bar();
    if let Some(mut stream) = handle.take_progress() {
        let progress = progress.clone();
        tokio::spawn(async move {
            while let Some(update) = stream.next().await {
                if update.is_scanning {
                    progress.set_message(format!(
                        "扫描: {} | 发现: {} | 大小: {}",
                        update.current_path.display(),
                        update.found_count,
                        format_size(update.total_size)
                    ));
                }
            }
        });
    }

    // Ctrl-C 取消扫描，返回部分结果
    let cancel = handle.cancel_handle();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::warn!("收到中断信号，正在停止扫描...");
            cancel.cancel();
        }
    });

    let result = handle.wait().await?;
    progress.finish_and_clear();

    let rendered = output::render(&result, format)?;
    match output_path {
        Some(path) => {
            std::fs::write(&path, rendered)
                .with_context(|| format!("无法写入结果文件: {}", path.display()))?;
            println!("结果已保存到 {}", path.display());
        }
        None => print!("{}", rendered),
    }

    Ok(())
}

/// 创建进度条
fn create_progress_bar() -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    let style = ProgressStyle::default_spinner()
        .template("{spinner:.green} [{elapsed_precise}] {msg}")
        .unwrap_or_else(|_| ProgressStyle::default_spinner())
        .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"]);
    pb.set_style(style);
    pb.enable_steady_tick(std::time::Duration::from_millis(100));
    pb
}
