use std::path::Path;
use std::time::SystemTime;
use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use walkdir::WalkDir;

/// 大小计算器 - 负责统计匹配目录的大小和文件数量
#[derive(Debug, Clone, Default)]
pub struct SizeCalculator;

/// 目录大小统计
#[derive(Debug, Clone)]
pub struct DirectorySizeInfo {
    /// 目录下所有普通文件的总大小
    pub size: u64,

    /// 普通文件数量
    pub file_count: usize,

    /// 目录本身的最后修改时间
    pub last_modified: DateTime<Utc>,
}

impl SizeCalculator {
    /// 创建新的大小计算器
    pub fn new() -> Self {
        Self
    }

    /// 计算指定目录的大小
    ///
    /// 目录本身无法读取时返回错误；子项的权限错误等会被忽略，继续统计其余部分。
    pub fn calculate_directory_size(&self, dir_path: &Path) -> Result<DirectorySizeInfo> {
        let metadata = std::fs::symlink_metadata(dir_path)
            .with_context(|| format!("无法读取目录信息: {}", dir_path.display()))?;
        if !metadata.is_dir() {
            anyhow::bail!("不是目录: {}", dir_path.display());
        }

        // 先确认目录可以列出，避免把无法访问的目录统计成 0
        std::fs::read_dir(dir_path)
            .with_context(|| format!("无法读取目录内容: {}", dir_path.display()))?;

        let mut total_size = 0u64;
        let mut file_count = 0usize;

        for entry in WalkDir::new(dir_path).follow_links(false) {
            let entry = match entry {
                Ok(entry) => entry,
                Err(err) => {
                    tracing::debug!("计算大小时跳过: {}", err);
                    continue;
                }
            };

            if !entry.file_type().is_file() {
                continue;
            }

            match entry.metadata() {
                Ok(file_metadata) => {
                    total_size += file_metadata.len();
                    file_count += 1;
                }
                Err(err) => tracing::debug!("无法读取文件信息: {}", err),
            }
        }

        let last_modified = metadata.modified().unwrap_or(SystemTime::UNIX_EPOCH);

        Ok(DirectorySizeInfo {
            size: total_size,
            file_count,
            last_modified: DateTime::<Utc>::from(last_modified),
        })
    }
}
