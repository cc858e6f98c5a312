use std::path::Path;

use crate::models::ScanRule;
use crate::scanner::exclusion::ExclusionEngine;
use crate::scanner::project_root::find_nearest_marker;
use crate::scanner::rule_selector::select_best_rule;

/// 规则匹配器 - 根据目录名和启用的规则判断目录属于哪类构建产物
pub struct RuleMatcher {
    /// 启用的规则，保持配置中的顺序
    rules: Vec<ScanRule>,
}

impl RuleMatcher {
    /// 创建规则匹配器，只保留启用的规则
    pub fn new(rules: Vec<ScanRule>) -> Self {
        Self {
            rules: rules.into_iter().filter(|rule| rule.enabled).collect(),
        }
    }

    /// 找到所有匹配该目录的规则
    ///
    /// 规则需要同时满足：目录名是目标目录、路径未被全局排除、
    /// 要求验证时能在祖先目录中找到项目标识。
    pub fn matching_rules<'a>(&'a self, path: &Path, exclusion: &ExclusionEngine) -> Vec<&'a ScanRule> {
        let dir_name = match path.file_name().and_then(|n| n.to_str()) {
            Some(name) => name,
            None => return Vec::new(),
        };

        self.rules
            .iter()
            .filter(|rule| rule.targets(dir_name))
            .filter(|rule| !exclusion.is_excluded(path, rule))
            .filter(|rule| {
                // 要求验证但没有配置标识时，规则静默失效
                !rule.require_markers
                    || find_nearest_marker(path, &rule.project_markers).is_some()
            })
            .collect()
    }

    /// 对目录进行分类，没有规则匹配时返回 None
    pub fn classify<'a>(&'a self, path: &Path, exclusion: &ExclusionEngine) -> Option<&'a ScanRule> {
        let matched = self.matching_rules(path, exclusion);
        match matched.len() {
            0 => None,
            1 => Some(matched[0]),
            _ => select_best_rule(&matched),
        }
    }
}
