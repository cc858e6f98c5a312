use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::PathBuf;

/// 扫描到的单个可清理目录
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ScanItem {
    /// 目录完整路径
    pub path: PathBuf,

    /// 所属项目的根路径
    pub project_path: PathBuf,

    /// 项目名称
    pub project_name: String,

    /// 命中的规则名称，如 "Maven"、"Node.js"
    pub rule_name: String,

    /// 大小（字节）
    pub size: u64,

    /// 可读的大小，如 "1.20 GB"
    pub size_readable: String,

    /// 文件数量
    pub file_count: usize,

    /// 目录最后修改时间
    pub last_modified: DateTime<Utc>,

    /// 是否选中（交给删除执行方使用）
    pub selected: bool,
}

impl ScanItem {
    /// 修改选中状态，这是扫描项创建后唯一可变的字段
    pub fn set_selected(&mut self, selected: bool) {
        self.selected = selected;
    }
}

/// 一次扫描的汇总结果
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScanResult {
    /// 扫描到的目录列表
    pub items: Vec<ScanItem>,

    /// 总大小
    pub total_size: u64,

    /// 总数量
    pub total_count: usize,

    /// 扫描时间
    pub scan_time: DateTime<Utc>,
}

/// 按规则分组的统计
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RuleStats {
    pub count: usize,
    pub size: u64,
}

impl Default for ScanResult {
    fn default() -> Self {
        Self::new()
    }
}

impl ScanResult {
    /// 创建新的扫描结果
    pub fn new() -> Self {
        Self {
            items: Vec::new(),
            total_size: 0,
            total_count: 0,
            scan_time: Utc::now(),
        }
    }

    /// 添加扫描项，同时更新总大小和总数量
    pub fn add_item(&mut self, item: ScanItem) {
        self.total_size += item.size;
        self.total_count += 1;
        self.items.push(item);
    }

    /// 完成扫描：按路径排序，保证同一棵目录树的结果顺序稳定
    pub fn finish(&mut self) {
        self.items.sort_by(|a, b| a.path.cmp(&b.path));
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// 获取所有选中的扫描项
    pub fn selected_items(&self) -> Vec<&ScanItem> {
        self.items.iter().filter(|item| item.selected).collect()
    }

    /// 选中项的总大小
    pub fn selected_size(&self) -> u64 {
        self.items
            .iter()
            .filter(|item| item.selected)
            .map(|item| item.size)
            .sum()
    }

    /// 按规则名称统计数量和大小
    pub fn stats_by_rule(&self) -> BTreeMap<String, RuleStats> {
        let mut stats: BTreeMap<String, RuleStats> = BTreeMap::new();
        for item in &self.items {
            let entry = stats.entry(item.rule_name.clone()).or_default();
            entry.count += 1;
            entry.size += item.size;
        }
        stats
    }
}

/// 扫描进度，尽力投递，允许丢失
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ScanProgress {
    /// 当前扫描路径
    pub current_path: PathBuf,

    /// 已扫描的目录数量
    pub scanned_dirs: usize,

    /// 已发现的目录数量
    pub found_count: usize,

    /// 已发现的总大小
    pub total_size: u64,

    /// 是否正在扫描
    pub is_scanning: bool,
}
