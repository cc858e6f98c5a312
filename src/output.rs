use anyhow::Result;
use std::fmt::Write;

use dep_cleaner_cli::models::{ScanResult, ScanRule};
use dep_cleaner_cli::utils::{format_relative_time, format_size, format_time};

use crate::cli::OutputFormat;

/// 按指定格式渲染扫描结果
pub fn render(result: &ScanResult, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Table => Ok(render_table(result)),
        OutputFormat::Json => Ok(serde_json::to_string_pretty(result)?),
        OutputFormat::Csv => Ok(render_csv(result)),
    }
}

fn render_table(result: &ScanResult) -> String {
    let mut out = String::new();

    if result.is_empty() {
        let _ = writeln!(out, "没有发现可清理的目录");
        return out;
    }

    let _ = writeln!(
        out,
        "{:<12} {:>10} {:>8} {:<12} {:<20} {}",
        "类型", "大小", "文件数", "修改时间", "项目", "路径"
    );
    for item in &result.items {
        let _ = writeln!(
            out,
            "{:<12} {:>10} {:>8} {:<12} {:<20} {}",
            item.rule_name,
            item.size_readable,
            item.file_count,
            format_relative_time(item.last_modified),
            item.project_name,
            item.path.display()
        );
    }

    let _ = writeln!(out);
    for (rule_name, stats) in result.stats_by_rule() {
        let _ = writeln!(out, "  {:<12} {} 个目录, {}", rule_name, stats.count, format_size(stats.size));
    }
    let _ = writeln!(
        out,
        "共 {} 个目录，总计 {}（扫描时间 {}）",
        result.total_count,
        format_size(result.total_size),
        format_time(result.scan_time)
    );

    out
}

fn render_csv(result: &ScanResult) -> String {
    let mut out = String::from("path,project_path,project_name,rule_name,size,file_count,last_modified\n");
    for item in &result.items {
        let _ = writeln!(
            out,
            "{},{},{},{},{},{},{}",
            csv_field(&item.path.to_string_lossy()),
            csv_field(&item.project_path.to_string_lossy()),
            csv_field(&item.project_name),
            csv_field(&item.rule_name),
            item.size,
            item.file_count,
            item.last_modified.to_rfc3339()
        );
    }
    out
}

/// 含逗号、引号或换行的字段需要加引号
fn csv_field(value: &str) -> String {
    if value.contains(|c: char| matches!(c, ',' | '"' | '\n')) {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}

/// 渲染规则列表
pub fn render_rules(rules: &[ScanRule]) -> String {
    let mut out = String::new();
    for rule in rules {
        let state = if rule.enabled { "启用" } else { "禁用" };
        let _ = writeln!(out, "{} [{}] 优先级 {}", rule.name, state, rule.priority);
        if !rule.description.is_empty() {
            let _ = writeln!(out, "  {}", rule.description);
        }
        let _ = writeln!(out, "  目标目录: {}", rule.target_dirs.join(", "));
        if !rule.project_markers.is_empty() {
            let requirement = if rule.require_markers { "必须" } else { "可选" };
            let _ = writeln!(out, "  项目标识({}): {}", requirement, rule.project_markers.join(", "));
        }
        if rule.exempt_from_global_exclusion {
            let _ = writeln!(out, "  豁免与目标目录同名的全局排除项");
        }
    }
    out
}
