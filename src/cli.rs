use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "dep-cleaner-cli")]
#[command(about = "查找可以安全删除的构建产物和依赖缓存目录")]
#[command(version = "0.1.0")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// 配置文件路径
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// 详细输出
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// 扫描指定目录中的构建产物
    Scan {
        /// 要扫描的目录路径（默认使用配置中的路径）
        paths: Vec<String>,

        /// 输出格式
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Table)]
        format: OutputFormat,

        /// 保存结果到文件
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// 追加忽略模式
        #[arg(short, long)]
        ignore: Vec<String>,

        /// 只使用指定名称的规则
        #[arg(short, long)]
        rule: Vec<String>,
    },

    /// 列出扫描规则
    Rules,

    /// 管理配置
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
pub enum ConfigAction {
    /// 显示当前配置
    Show,

    /// 显示配置文件路径
    Path,
}

#[derive(clap::ValueEnum, Clone, Copy, Debug)]
pub enum OutputFormat {
    /// 表格格式
    Table,
    /// JSON 格式
    Json,
    /// CSV 格式
    Csv,
}
