use std::path::{Path, PathBuf};

/// 通用项目标识：版本控制目录以及各生态的构建描述文件
pub const PROJECT_MARKERS: &[&str] = &[
    ".git",
    ".svn",
    "pom.xml",
    "build.gradle",
    "build.gradle.kts",
    "settings.gradle",
    "settings.gradle.kts",
    "package.json",
    "Cargo.toml",
    "go.mod",
];

/// 版本控制目录标识
const VCS_MARKER: &str = ".git";

/// 项目根目录解析结果
#[derive(Debug, Clone, PartialEq)]
pub struct ProjectRoot {
    /// 项目根路径
    pub path: PathBuf,

    /// 项目名称（根目录的目录名）
    pub name: String,
}

/// 项目根目录解析器 - 从匹配到的构建目录向上查找所属项目
#[derive(Debug, Clone, Default)]
pub struct ProjectRootResolver;

impl ProjectRootResolver {
    pub fn new() -> Self {
        Self
    }

    /// 解析构建目录所属的项目根目录
    ///
    /// 从父目录开始向上收集所有带项目标识的目录，从最顶层开始优先选择包含 .git 的目录；
    /// 都没有 .git 时返回最顶层的项目目录；一个都没找到时退回到构建目录的父目录。
    /// 嵌套项目中的构建目录因此会归属到最外层的项目。
    pub fn resolve(&self, build_path: &Path) -> ProjectRoot {
        let parent = build_path.parent().unwrap_or(build_path);

        // 不把文件系统根目录当作候选
        let project_roots: Vec<&Path> = parent
            .ancestors()
            .filter(|dir| dir.parent().is_some())
            .filter(|dir| has_project_marker(dir))
            .collect();

        let root = project_roots
            .iter()
            .rev()
            .find(|dir| dir.join(VCS_MARKER).exists())
            .or_else(|| project_roots.last())
            .copied()
            .unwrap_or(parent);

        ProjectRoot {
            path: root.to_path_buf(),
            name: project_name(root),
        }
    }
}

/// 从项目路径中提取项目名称
pub fn project_name(project_path: &Path) -> String {
    project_path
        .file_name()
        .map(|name| name.to_string_lossy().to_string())
        .unwrap_or_else(|| project_path.to_string_lossy().to_string())
}

/// 检查目录是否包含任意一个通用项目标识
fn has_project_marker(dir: &Path) -> bool {
    PROJECT_MARKERS.iter().any(|marker| dir.join(marker).exists())
}

/// 从父目录开始向上查找最近的、包含任一指定标识的目录
pub fn find_nearest_marker(path: &Path, markers: &[String]) -> Option<PathBuf> {
    if markers.is_empty() {
        return None;
    }

    let parent = path.parent()?;
    parent
        .ancestors()
        .find(|dir| markers.iter().any(|marker| dir.join(marker).exists()))
        .map(Path::to_path_buf)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_fallback_to_parent_without_markers() {
        let temp_dir = tempdir().unwrap();
        let base = temp_dir.path().canonicalize().unwrap();
        let build = base.join("plain").join("build");
        fs::create_dir_all(&build).unwrap();

        let root = ProjectRootResolver::new().resolve(&build);
        assert_eq!(root.path, base.join("plain"));
        assert_eq!(root.name, "plain");
    }

    #[test]
    fn test_topmost_marker_directory_wins() {
        let temp_dir = tempdir().unwrap();
        let base = temp_dir.path().canonicalize().unwrap();
        let outer = base.join("outer");
        let inner = outer.join("packages").join("inner");
        fs::create_dir_all(inner.join("node_modules")).unwrap();
        fs::write(outer.join("package.json"), "{}").unwrap();
        fs::write(inner.join("package.json"), "{}").unwrap();

        let root = ProjectRootResolver::new().resolve(&inner.join("node_modules"));
        assert_eq!(root.path, outer);
        assert_eq!(root.name, "outer");
    }

    #[test]
    fn test_git_directory_preferred_over_topmost() {
        let temp_dir = tempdir().unwrap();
        let base = temp_dir.path().canonicalize().unwrap();
        let umbrella = base.join("umbrella");
        let repo = umbrella.join("repo");
        fs::create_dir_all(repo.join(".git")).unwrap();
        fs::create_dir_all(repo.join("target")).unwrap();
        fs::write(umbrella.join("pom.xml"), "<project/>").unwrap();
        fs::write(repo.join("Cargo.toml"), "[package]").unwrap();

        let root = ProjectRootResolver::new().resolve(&repo.join("target"));
        assert_eq!(root.path, repo);
        assert_eq!(root.name, "repo");
    }

    #[test]
    fn test_find_nearest_marker() {
        let temp_dir = tempdir().unwrap();
        let base = temp_dir.path().canonicalize().unwrap();
        let project = base.join("app");
        let nested = project.join("module").join("target");
        fs::create_dir_all(&nested).unwrap();
        fs::write(project.join("pom.xml"), "<project/>").unwrap();

        let markers = vec!["pom.xml".to_string()];
        assert_eq!(find_nearest_marker(&nested, &markers), Some(project.clone()));

        // 标识只在目标目录内部时不算
        let other = base.join("other").join("target");
        fs::create_dir_all(&other).unwrap();
        fs::write(other.join("Cargo.toml"), "").unwrap();
        assert_eq!(find_nearest_marker(&other, &["Cargo.toml".to_string()]), None);

        assert_eq!(find_nearest_marker(&nested, &[]), None);
    }
}
