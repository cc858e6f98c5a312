use std::path::Path;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use walkdir::WalkDir;

use crate::models::{ScanItem, ScanProgress, ScanRule};
use crate::scanner::exclusion::{is_system_or_hidden_dir, ExclusionEngine};
use crate::scanner::project_root::ProjectRootResolver;
use crate::scanner::rule_matcher::RuleMatcher;
use crate::scanner::size_calculator::SizeCalculator;
use crate::utils::format_size;

/// 每扫描多少个目录发送一次进度
pub const PROGRESS_INTERVAL: usize = 64;

/// 对单个目录的处理决定
#[derive(Debug)]
pub enum VisitDecision {
    /// 继续向下遍历
    Continue,

    /// 跳过整个子树，不产生结果
    Skip,

    /// 目录被规则命中，产生结果并跳过子树
    Classify(ScanItem),
}

/// 所有遍历任务共享的计数器
#[derive(Debug, Default)]
pub struct ScanCounters {
    scanned_dirs: AtomicUsize,
    found_count: AtomicUsize,
    total_size: AtomicU64,
}

impl ScanCounters {
    pub fn scanned_dirs(&self) -> usize {
        self.scanned_dirs.load(Ordering::Relaxed)
    }

    fn record_item(&self, size: u64) {
        self.found_count.fetch_add(1, Ordering::Relaxed);
        self.total_size.fetch_add(size, Ordering::Relaxed);
    }

    /// 生成当前进度快照
    pub fn snapshot(&self, current_path: &Path, is_scanning: bool) -> ScanProgress {
        ScanProgress {
            current_path: current_path.to_path_buf(),
            scanned_dirs: self.scanned_dirs.load(Ordering::Relaxed),
            found_count: self.found_count.load(Ordering::Relaxed),
            total_size: self.total_size.load(Ordering::Relaxed),
            is_scanning,
        }
    }
}

/// 遍历任务的输出通道和取消信号
#[derive(Clone)]
pub struct WalkSink {
    /// 发现的目录发往汇总任务
    pub items: mpsc::Sender<ScanItem>,

    /// 进度通道，满了就丢弃
    pub progress: mpsc::Sender<ScanProgress>,

    /// 共享的取消信号
    pub cancel: CancellationToken,

    pub counters: Arc<ScanCounters>,
}

impl WalkSink {
    /// 发送进度更新，通道满了或已关闭时直接跳过
    fn send_progress(&self, current_path: &Path) {
        let _ = self
            .progress
            .try_send(self.counters.snapshot(current_path, true));
    }
}

/// 目录遍历器 - 对每个根路径做深度优先遍历，命中规则的目录不再向下扫描
pub struct DirectoryWalker {
    matcher: RuleMatcher,
    exclusion: ExclusionEngine,
    resolver: ProjectRootResolver,
    size_calculator: SizeCalculator,
}

impl DirectoryWalker {
    pub fn new(matcher: RuleMatcher, exclusion: ExclusionEngine) -> Self {
        Self {
            matcher,
            exclusion,
            resolver: ProjectRootResolver::new(),
            size_calculator: SizeCalculator::new(),
        }
    }

    /// 遍历单个根路径（阻塞调用，需要在 spawn_blocking 中运行）
    pub fn walk(&self, root_path: &Path, sink: &WalkSink) {
        tracing::debug!("开始遍历: {}", root_path.display());

        let mut entries = WalkDir::new(root_path).follow_links(false).into_iter();

        while let Some(entry) = entries.next() {
            if sink.cancel.is_cancelled() {
                tracing::debug!("扫描已取消，停止遍历: {}", root_path.display());
                break;
            }

            let entry = match entry {
                Ok(entry) => entry,
                Err(err) => {
                    // 权限不足等错误，跳过继续
                    tracing::debug!("遍历目录时出错: {}", err);
                    continue;
                }
            };

            if !entry.file_type().is_dir() {
                continue;
            }

            let scanned = sink.counters.scanned_dirs.fetch_add(1, Ordering::Relaxed) + 1;

            match self.visit(entry.path(), entry.depth()) {
                VisitDecision::Continue => {
                    if scanned % PROGRESS_INTERVAL == 0 {
                        sink.send_progress(entry.path());
                    }
                }
                VisitDecision::Skip => entries.skip_current_dir(),
                VisitDecision::Classify(item) => {
                    entries.skip_current_dir();

                    // 统计大小期间可能已经取消
                    if sink.cancel.is_cancelled() {
                        break;
                    }

                    sink.counters.record_item(item.size);
                    if sink.items.blocking_send(item).is_err() {
                        break; // 汇总任务已关闭
                    }
                    sink.send_progress(entry.path());
                }
            }
        }
    }

    /// 决定如何处理一个目录
    ///
    /// 顺序：忽略模式 → 规则匹配 → 隐藏/系统目录。根目录本身不做隐藏目录检查。
    pub fn visit(&self, path: &Path, depth: usize) -> VisitDecision {
        if self.exclusion.matches_ignore_pattern(path) {
            return VisitDecision::Skip;
        }

        if let Some(rule) = self.matcher.classify(path, &self.exclusion) {
            return match self.build_item(path, rule) {
                Some(item) => VisitDecision::Classify(item),
                None => VisitDecision::Skip,
            };
        }

        if depth > 0 && is_system_or_hidden_dir(path) {
            return VisitDecision::Skip;
        }

        VisitDecision::Continue
    }

    /// 为命中的目录生成扫描项，无法统计大小时返回 None
    fn build_item(&self, path: &Path, rule: &ScanRule) -> Option<ScanItem> {
        let size_info = match self.size_calculator.calculate_directory_size(path) {
            Ok(info) => info,
            Err(err) => {
                tracing::debug!("跳过无法统计的目录: {:#}", err);
                return None;
            }
        };

        let project = self.resolver.resolve(path);

        Some(ScanItem {
            path: path.to_path_buf(),
            project_path: project.path,
            project_name: project.name,
            rule_name: rule.name.clone(),
            size: size_info.size,
            size_readable: format_size(size_info.size),
            file_count: size_info.file_count,
            last_modified: size_info.last_modified,
            selected: true,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    fn walker(rules: Vec<ScanRule>, ignore: &[&str], excludes: &[&str]) -> DirectoryWalker {
        DirectoryWalker::new(
            RuleMatcher::new(rules),
            ExclusionEngine::new(
                ignore.iter().map(|s| s.to_string()).collect(),
                excludes.iter().map(|s| s.to_string()).collect(),
            ),
        )
    }

    #[test]
    fn test_visit_decisions() {
        let temp_dir = tempdir().unwrap();
        let base = temp_dir.path().canonicalize().unwrap();
        let app = base.join("app");
        fs::create_dir_all(app.join("node_modules").join("left-pad")).unwrap();
        fs::create_dir_all(app.join("src")).unwrap();
        fs::create_dir_all(app.join(".git")).unwrap();
        fs::create_dir_all(app.join("skipme")).unwrap();
        fs::write(app.join("package.json"), "{}").unwrap();
        fs::write(app.join("node_modules").join("left-pad").join("index.js"), "x".repeat(10)).unwrap();

        let walker = walker(
            vec![ScanRule::new("Node.js", &["node_modules"], 100).with_markers(&["package.json"])],
            &["skipme"],
            &[],
        );

        assert!(matches!(walker.visit(&app.join("src"), 2), VisitDecision::Continue));
        assert!(matches!(walker.visit(&app.join(".git"), 2), VisitDecision::Skip));
        assert!(matches!(walker.visit(&app.join("skipme"), 2), VisitDecision::Skip));

        match walker.visit(&app.join("node_modules"), 2) {
            VisitDecision::Classify(item) => {
                assert_eq!(item.rule_name, "Node.js");
                assert_eq!(item.project_path, app);
                assert_eq!(item.project_name, "app");
                assert_eq!(item.size, 10);
                assert_eq!(item.file_count, 1);
                assert_eq!(item.size_readable, "10 B");
                assert!(item.selected);
            }
            other => panic!("unexpected decision: {:?}", other),
        }
    }

    #[test]
    fn test_hidden_root_is_not_skipped() {
        let temp_dir = tempdir().unwrap();
        let hidden_root = temp_dir.path().join(".workspace");
        fs::create_dir_all(&hidden_root).unwrap();

        let walker = walker(Vec::new(), &[], &[]);
        assert!(matches!(walker.visit(&hidden_root, 0), VisitDecision::Continue));
        assert!(matches!(walker.visit(&hidden_root, 1), VisitDecision::Skip));
    }

    #[test]
    fn test_hidden_target_directory_is_classified() {
        let temp_dir = tempdir().unwrap();
        let base = temp_dir.path().canonicalize().unwrap();
        let venv = base.join("tool").join(".venv");
        fs::create_dir_all(&venv).unwrap();

        let walker = walker(
            vec![ScanRule::new("Python", &[".venv"], 90).exempt_from_global(true)],
            &[],
            &[".venv"],
        );

        assert!(matches!(walker.visit(&venv, 2), VisitDecision::Classify(_)));
    }

    #[test]
    fn test_unsizable_match_is_skipped_without_item() {
        let temp_dir = tempdir().unwrap();
        let base = temp_dir.path().canonicalize().unwrap();
        let vanished = base.join("app").join("node_modules");

        let walker = walker(vec![ScanRule::new("Node.js", &["node_modules"], 100)], &[], &[]);
        assert!(matches!(walker.visit(&vanished, 2), VisitDecision::Skip));
    }

    #[tokio::test]
    async fn test_full_progress_channel_does_not_block_walk() {
        let temp_dir = tempdir().unwrap();
        let base = temp_dir.path().canonicalize().unwrap();
        for name in ["a", "b", "c", "d"] {
            fs::create_dir_all(base.join(name).join("node_modules")).unwrap();
        }

        let walker = walker(vec![ScanRule::new("Node.js", &["node_modules"], 100)], &[], &[]);
        let (items_tx, mut items_rx) = mpsc::channel(16);
        // 容量为 1 且从不读取
        let (progress_tx, mut progress_rx) = mpsc::channel(1);
        let sink = WalkSink {
            items: items_tx,
            progress: progress_tx,
            cancel: CancellationToken::new(),
            counters: Arc::new(ScanCounters::default()),
        };

        let root = base.clone();
        tokio::task::spawn_blocking(move || walker.walk(&root, &sink))
            .await
            .unwrap();

        let mut found = Vec::new();
        while let Some(item) = items_rx.recv().await {
            found.push(item.path);
        }
        found.sort();
        assert_eq!(
            found,
            ["a", "b", "c", "d"]
                .iter()
                .map(|name| base.join(name).join("node_modules"))
                .collect::<Vec<_>>()
        );

        // 只保留了第一条进度，其余被丢弃
        assert!(progress_rx.try_recv().is_ok());
        assert!(progress_rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_walk_prunes_matched_directories() {
        let temp_dir = tempdir().unwrap();
        let base = temp_dir.path().canonicalize().unwrap();
        let app = base.join("app");
        fs::create_dir_all(app.join("node_modules").join("pkg").join("node_modules")).unwrap();
        fs::write(app.join("package.json"), "{}").unwrap();

        let walker = walker(vec![ScanRule::new("Node.js", &["node_modules"], 100)], &[], &[]);
        let (items_tx, mut items_rx) = mpsc::channel(16);
        let (progress_tx, _progress_rx) = mpsc::channel(1);
        let sink = WalkSink {
            items: items_tx,
            progress: progress_tx,
            cancel: CancellationToken::new(),
            counters: Arc::new(ScanCounters::default()),
        };

        let root = base.clone();
        tokio::task::spawn_blocking(move || walker.walk(&root, &sink))
            .await
            .unwrap();

        let mut found = Vec::new();
        while let Some(item) = items_rx.recv().await {
            found.push(item.path);
        }
        assert_eq!(found, vec![app.join("node_modules")]);
    }

    #[tokio::test]
    async fn test_walk_stops_when_cancelled() {
        let temp_dir = tempdir().unwrap();
        let base = temp_dir.path().canonicalize().unwrap();
        fs::create_dir_all(base.join("a").join("node_modules")).unwrap();

        let walker = walker(vec![ScanRule::new("Node.js", &["node_modules"], 100)], &[], &[]);
        let (items_tx, mut items_rx) = mpsc::channel(16);
        let (progress_tx, _progress_rx) = mpsc::channel(1);
        let cancel = CancellationToken::new();
        cancel.cancel();
        let sink = WalkSink {
            items: items_tx,
            progress: progress_tx,
            cancel,
            counters: Arc::new(ScanCounters::default()),
        };

        let root = base.clone();
        tokio::task::spawn_blocking(move || walker.walk(&root, &sink))
            .await
            .unwrap();

        assert!(items_rx.recv().await.is_none());
    }
}
