use std::path::Path;
use globset::{GlobBuilder, GlobSet, GlobSetBuilder};

use crate::models::ScanRule;

/// 扫描时一律跳过的系统目录（不区分大小写）
const SYSTEM_DIRS: &[&str] = &[
    "System Volume Information",
    "$RECYCLE.BIN",
    "Windows",
    "Program Files",
    "Program Files (x86)",
    "ProgramData",
    "Library",
    "System",
    "Applications",
];

/// 排除引擎 - 负责忽略模式和全局路径排除
pub struct ExclusionEngine {
    /// 用户配置的忽略模式（子串匹配完整路径）
    ignore_patterns: Vec<String>,

    /// 忽略模式编译出的通配符集合（匹配目录名）
    ignore_globs: GlobSet,

    /// 全局路径排除项（子串匹配完整路径）
    global_path_excludes: Vec<String>,
}

impl ExclusionEngine {
    /// 创建排除引擎，无法解析的通配符只记录警告，仍然参与子串匹配
    pub fn new(ignore_patterns: Vec<String>, global_path_excludes: Vec<String>) -> Self {
        let mut builder = GlobSetBuilder::new();
        for pattern in &ignore_patterns {
            match GlobBuilder::new(pattern).literal_separator(true).build() {
                Ok(glob) => {
                    builder.add(glob);
                }
                Err(err) => {
                    tracing::warn!("无效的忽略模式 {}: {}", pattern, err);
                }
            }
        }

        let ignore_globs = builder.build().unwrap_or_else(|err| {
            tracing::warn!("构建忽略模式集合失败: {}", err);
            GlobSet::empty()
        });

        Self {
            ignore_patterns,
            ignore_globs,
            global_path_excludes,
        }
    }

    /// 检查路径是否被全局排除
    ///
    /// 不豁免的规则检查所有排除项；豁免的规则只跳过与自己目标目录同名的排除项，
    /// 其余排除项（比如路径中出现的 node_modules）仍然生效。
    pub fn is_excluded(&self, path: &Path, rule: &ScanRule) -> bool {
        let path_str = path.to_string_lossy();

        self.global_path_excludes.iter().any(|exclude| {
            if rule.exempt_from_global_exclusion && rule.owns_token(exclude) {
                return false;
            }
            path_str.contains(exclude.as_str())
        })
    }

    /// 检查路径是否命中用户的忽略模式，命中后整个子树都不再扫描
    pub fn matches_ignore_pattern(&self, path: &Path) -> bool {
        let path_str = path.to_string_lossy();
        if self
            .ignore_patterns
            .iter()
            .any(|pattern| path_str.contains(pattern.as_str()))
        {
            return true;
        }

        match path.file_name() {
            Some(name) => self.ignore_globs.is_match(name),
            None => false,
        }
    }
}

/// 判断是否为隐藏目录或系统目录
pub fn is_system_or_hidden_dir(path: &Path) -> bool {
    let name = match path.file_name() {
        Some(name) => name.to_string_lossy(),
        None => return false,
    };

    if name.starts_with('.') {
        return true;
    }

    SYSTEM_DIRS
        .iter()
        .any(|system_dir| system_dir.eq_ignore_ascii_case(&name))
}
