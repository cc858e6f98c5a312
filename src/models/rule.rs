use serde::{Deserialize, Serialize};

/// 扫描规则 - 描述一类可安全删除的构建产物或依赖目录
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ScanRule {
    /// 规则名称，如 "Maven"
    pub name: String,

    /// 规则描述
    #[serde(default)]
    pub description: String,

    /// 要匹配的目录名，如 ["target"]
    pub target_dirs: Vec<String>,

    /// 是否启用
    #[serde(default = "default_enabled")]
    pub enabled: bool,

    /// 优先级（数字越大优先级越高）
    #[serde(default)]
    pub priority: i32,

    /// 项目标识文件，用于确认项目类型
    #[serde(default)]
    pub project_markers: Vec<String>,

    /// 是否必须在祖先目录中找到项目标识
    #[serde(default)]
    pub require_markers: bool,

    /// 是否从全局排除中豁免（只豁免自己的目标目录）
    #[serde(default)]
    pub exempt_from_global_exclusion: bool,
}

fn default_enabled() -> bool {
    true
}

impl ScanRule {
    /// 创建一条最简单的规则：只按目录名匹配，不验证项目标识
    pub fn new(name: impl Into<String>, target_dirs: &[&str], priority: i32) -> Self {
        Self {
            name: name.into(),
            description: String::new(),
            target_dirs: target_dirs.iter().map(|s| s.to_string()).collect(),
            enabled: true,
            priority,
            project_markers: Vec::new(),
            require_markers: false,
            exempt_from_global_exclusion: false,
        }
    }

    /// 要求在祖先目录中找到指定的项目标识
    pub fn with_markers(mut self, markers: &[&str]) -> Self {
        self.project_markers = markers.iter().map(|s| s.to_string()).collect();
        self.require_markers = true;
        self
    }

    /// 设置是否豁免全局排除
    pub fn exempt_from_global(mut self, exempt: bool) -> Self {
        self.exempt_from_global_exclusion = exempt;
        self
    }

    /// 目录名是否是本规则的目标目录
    pub fn targets(&self, dir_name: &str) -> bool {
        self.target_dirs.iter().any(|target| target == dir_name)
    }

    /// 规则是否通过项目标识验证
    pub fn is_verified(&self) -> bool {
        self.require_markers && !self.project_markers.is_empty()
    }

    /// 排除项是否恰好是本规则自己的目标目录
    pub fn owns_token(&self, token: &str) -> bool {
        self.targets(token)
    }
}
