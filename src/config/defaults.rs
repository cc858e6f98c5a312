use crate::models::ScanRule;

pub struct DefaultConfig;

impl DefaultConfig {
    /// 默认扫描规则
    pub fn default_scan_rules() -> Vec<ScanRule> {
        vec![
            ScanRule {
                name: "Node.js".to_string(),
                description: "Node.js 依赖和构建目录".to_string(),
                target_dirs: strings(&[
                    "node_modules", "dist", "build", ".next", ".nuxt", "out", ".output",
                    ".vite", ".turbo", ".cache", ".parcel-cache", "coverage", ".nyc_output",
                ]),
                enabled: true,
                priority: 100,
                project_markers: strings(&["package.json"]),
                require_markers: true,
                exempt_from_global_exclusion: true,
            },
            ScanRule {
                name: "Python".to_string(),
                description: "Python 缓存和虚拟环境".to_string(),
                target_dirs: strings(&["__pycache__", ".venv", "venv", ".pytest_cache", ".mypy_cache"]),
                enabled: true,
                priority: 90,
                project_markers: strings(&["requirements.txt", "setup.py", "pyproject.toml", "Pipfile"]),
                require_markers: false,
                exempt_from_global_exclusion: true,
            },
            ScanRule {
                name: "Maven".to_string(),
                description: "Java Maven 构建目录".to_string(),
                target_dirs: strings(&["target"]),
                enabled: true,
                priority: 80,
                project_markers: strings(&["pom.xml"]),
                require_markers: true,
                exempt_from_global_exclusion: false,
            },
            ScanRule {
                name: "Gradle".to_string(),
                description: "Java Gradle 构建目录".to_string(),
                target_dirs: strings(&["build", ".gradle"]),
                enabled: true,
                priority: 80,
                project_markers: strings(&[
                    "build.gradle", "build.gradle.kts", "settings.gradle", "settings.gradle.kts",
                ]),
                require_markers: true,
                exempt_from_global_exclusion: false,
            },
            ScanRule {
                name: "Rust".to_string(),
                description: "Rust 构建目录".to_string(),
                target_dirs: strings(&["target"]),
                enabled: true,
                priority: 80,
                project_markers: strings(&["Cargo.toml"]),
                require_markers: true,
                exempt_from_global_exclusion: false,
            },
            ScanRule {
                name: "Go".to_string(),
                description: "Go vendor 目录".to_string(),
                target_dirs: strings(&["vendor"]),
                enabled: false,
                priority: 70,
                project_markers: strings(&["go.mod"]),
                require_markers: true,
                exempt_from_global_exclusion: true,
            },
            ScanRule {
                name: "Java IDE".to_string(),
                description: "Java IDE 输出目录".to_string(),
                target_dirs: strings(&["out"]),
                enabled: true,
                priority: 60,
                project_markers: strings(&[".idea", "pom.xml", "build.gradle", "build.gradle.kts"]),
                require_markers: false,
                exempt_from_global_exclusion: false,
            },
        ]
    }

    /// 默认全局路径排除：其他生态的依赖目录里不再查找构建产物
    pub fn default_global_path_excludes() -> Vec<String> {
        strings(&["node_modules", "vendor", ".venv", "venv"])
    }

    /// 默认扫描的根目录
    pub fn default_scan_paths() -> Vec<String> {
        ["Code", "Projects", "Development"]
            .iter()
            .filter_map(|name| dirs::home_dir().map(|home| home.join(name)))
            .filter(|path| path.is_dir())
            .map(|path| path.to_string_lossy().to_string())
            .collect()
    }
}

fn strings(values: &[&str]) -> Vec<String> {
    values.iter().map(|s| s.to_string()).collect()
}
