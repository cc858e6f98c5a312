use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use anyhow::{Context, Result};

use crate::config::defaults::DefaultConfig;
use crate::models::ScanRule;
use crate::scanner::ScanSettings;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// 扫描的根目录列表
    pub scan_paths: Vec<String>,

    /// 忽略模式（子串匹配路径，或通配符匹配目录名）
    pub ignore_patterns: Vec<String>,

    /// 全局路径排除（应用于所有规则）
    pub global_path_excludes: Vec<String>,

    /// 扫描规则
    pub scan_rules: Vec<ScanRule>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            scan_paths: DefaultConfig::default_scan_paths(),
            ignore_patterns: Vec::new(),
            global_path_excludes: DefaultConfig::default_global_path_excludes(),
            scan_rules: DefaultConfig::default_scan_rules(),
        }
    }
}

impl Config {
    /// 从文件加载配置
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("无法读取配置文件: {}", path.display()))?;
        Self::from_toml_str(&content)
            .with_context(|| format!("配置文件格式错误: {}", path.display()))
    }

    /// 从 TOML 文本解析配置，缺少的字段使用默认值
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content)?;
        Ok(config)
    }

    /// 序列化为 TOML 文本
    pub fn to_toml_string(&self) -> Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// 获取默认配置文件路径
    pub fn default_config_path() -> Result<PathBuf> {
        let mut path = dirs::config_dir()
            .ok_or_else(|| anyhow::anyhow!("无法找到配置目录"))?;
        path.push("dep-cleaner-cli");
        path.push("config.toml");
        Ok(path)
    }

    /// 加载默认位置的配置，文件不存在时使用默认配置（不会写入文件）
    pub fn load_or_default() -> Result<Self> {
        let config_path = Self::default_config_path()?;

        if config_path.exists() {
            Self::load_from_file(&config_path)
        } else {
            tracing::debug!("配置文件不存在，使用默认配置: {}", config_path.display());
            Ok(Self::default())
        }
    }

    /// 获取启用的扫描规则
    pub fn enabled_rules(&self) -> Vec<ScanRule> {
        self.scan_rules
            .iter()
            .filter(|rule| rule.enabled)
            .cloned()
            .collect()
    }

    /// 生成一次扫描使用的配置快照
    pub fn to_scan_settings(&self) -> ScanSettings {
        ScanSettings {
            rules: self.enabled_rules(),
            ignore_patterns: self.ignore_patterns.clone(),
            global_path_excludes: self.global_path_excludes.clone(),
        }
    }
}
