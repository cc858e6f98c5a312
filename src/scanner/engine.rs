use std::path::{Path, PathBuf};
use std::sync::Arc;
use anyhow::{Context, Result};
use futures::future::join_all;
use tokio::sync::{mpsc, Mutex};
use tokio::task::JoinHandle;
use tokio_stream::wrappers::ReceiverStream;
use tokio_util::sync::CancellationToken;

use crate::models::{ScanItem, ScanProgress, ScanResult, ScanRule};
use crate::scanner::exclusion::ExclusionEngine;
use crate::scanner::rule_matcher::RuleMatcher;
use crate::scanner::walker::{DirectoryWalker, ScanCounters, WalkSink};

/// 进度通道容量，满了之后的进度更新直接丢弃
pub const PROGRESS_BUFFER: usize = 100;

/// 结果通道容量
const ITEM_BUFFER: usize = 100;

/// 一次扫描使用的配置快照，扫描期间只读
#[derive(Debug, Clone, Default)]
pub struct ScanSettings {
    /// 扫描规则（未启用的规则会被忽略）
    pub rules: Vec<ScanRule>,

    /// 用户忽略模式
    pub ignore_patterns: Vec<String>,

    /// 全局路径排除项
    pub global_path_excludes: Vec<String>,
}

/// 取消句柄，可以在任意任务中克隆和调用
#[derive(Debug, Clone, Default)]
pub struct CancelHandle {
    token: CancellationToken,
}

impl CancelHandle {
    /// 请求取消扫描，遍历任务会在检查到信号后停止
    pub fn cancel(&self) {
        self.token.cancel();
    }

    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }
}

/// 正在进行的扫描
pub struct ScanHandle {
    progress: Option<mpsc::Receiver<ScanProgress>>,
    cancel: CancelHandle,
    task: JoinHandle<ScanResult>,
}

impl ScanHandle {
    /// 取出进度流，只能取一次
    pub fn take_progress(&mut self) -> Option<ReceiverStream<ScanProgress>> {
        self.progress.take().map(ReceiverStream::new)
    }

    /// 获取取消句柄
    pub fn cancel_handle(&self) -> CancelHandle {
        self.cancel.clone()
    }

    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    /// 等待所有遍历任务和汇总任务结束，返回（可能是部分的）扫描结果
    pub async fn wait(self) -> Result<ScanResult> {
        self.task.await.context("扫描任务异常退出")
    }
}

/// 扫描器 - 每个根路径一个并发遍历任务，由独立的汇总任务收集结果
pub struct Scanner {
    walker: Arc<DirectoryWalker>,
}

impl Scanner {
    /// 使用扫描配置创建扫描器
    pub fn new(settings: ScanSettings) -> Self {
        let matcher = RuleMatcher::new(settings.rules);
        let exclusion = ExclusionEngine::new(settings.ignore_patterns, settings.global_path_excludes);

        Self {
            walker: Arc::new(DirectoryWalker::new(matcher, exclusion)),
        }
    }

    /// 启动扫描并立即返回句柄（必须在 tokio 运行时中调用）
    pub fn start<P: AsRef<Path>>(&self, root_paths: &[P]) -> ScanHandle {
        let roots = resolve_roots(root_paths);
        let (progress_tx, progress_rx) = mpsc::channel(PROGRESS_BUFFER);
        let cancel = CancelHandle::default();

        let task = tokio::spawn(run_scan(
            Arc::clone(&self.walker),
            roots,
            progress_tx,
            cancel.token.clone(),
        ));

        ScanHandle {
            progress: Some(progress_rx),
            cancel,
            task,
        }
    }

    /// 扫描并等待结果，不关心进度
    pub async fn scan<P: AsRef<Path>>(&self, root_paths: &[P]) -> Result<ScanResult> {
        self.start(root_paths).wait().await
    }
}

/// 扫描入口：根路径、启用的规则、忽略模式、全局排除项
pub fn scan<P: AsRef<Path>>(
    root_paths: &[P],
    enabled_rules: Vec<ScanRule>,
    ignore_patterns: Vec<String>,
    global_path_excludes: Vec<String>,
) -> ScanHandle {
    Scanner::new(ScanSettings {
        rules: enabled_rules,
        ignore_patterns,
        global_path_excludes,
    })
    .start(root_paths)
}

/// 规范化根路径，跳过不存在或不是目录的路径
///
/// 重复的根路径以及位于其他根路径之下的根路径都会被去掉，每个目录只遍历一次。
fn resolve_roots<P: AsRef<Path>>(root_paths: &[P]) -> Vec<PathBuf> {
    let mut candidates: Vec<PathBuf> = Vec::new();

    for path in root_paths {
        let path = path.as_ref();
        match std::fs::canonicalize(path) {
            Ok(root) if root.is_dir() => candidates.push(root),
            Ok(_) => tracing::warn!("不是目录: {}", path.display()),
            Err(_) => tracing::warn!("路径不存在: {}", path.display()),
        }
    }

    // 按组件排序后，祖先目录总是排在其子目录之前
    candidates.sort();
    candidates.dedup();

    let mut roots: Vec<PathBuf> = Vec::new();
    for root in candidates {
        if let Some(parent) = roots.iter().find(|kept| root.starts_with(kept)) {
            tracing::debug!("{} 已包含在 {} 中，跳过", root.display(), parent.display());
            continue;
        }
        roots.push(root);
    }

    roots
}

async fn run_scan(
    walker: Arc<DirectoryWalker>,
    roots: Vec<PathBuf>,
    progress_tx: mpsc::Sender<ScanProgress>,
    cancel: CancellationToken,
) -> ScanResult {
    tracing::info!("开始扫描 {} 个路径", roots.len());

    let result = Arc::new(Mutex::new(ScanResult::new()));
    let counters = Arc::new(ScanCounters::default());
    let (items_tx, items_rx) = mpsc::channel(ITEM_BUFFER);

    // 启动结果汇总任务
    let aggregator = tokio::spawn(aggregate(items_rx, Arc::clone(&result)));

    // 每个根路径一个遍历任务
    let tasks: Vec<_> = roots
        .into_iter()
        .map(|root| {
            let walker = Arc::clone(&walker);
            let sink = WalkSink {
                items: items_tx.clone(),
                progress: progress_tx.clone(),
                cancel: cancel.clone(),
                counters: Arc::clone(&counters),
            };
            tokio::task::spawn_blocking(move || walker.walk(&root, &sink))
        })
        .collect();

    // 关闭发送端，这样汇总任务知道何时结束
    drop(items_tx);

    for outcome in join_all(tasks).await {
        if let Err(err) = outcome {
            tracing::warn!("遍历任务异常退出: {}", err);
        }
    }

    if let Err(err) = aggregator.await {
        tracing::warn!("汇总任务异常退出: {}", err);
    }

    let mut scan_result = std::mem::take(&mut *result.lock().await);
    scan_result.finish();

    let _ = progress_tx.try_send(counters.snapshot(Path::new(""), false));

    if cancel.is_cancelled() {
        tracing::info!("扫描已取消，返回 {} 个部分结果", scan_result.total_count);
    } else {
        tracing::info!(
            "扫描完成！发现 {} 个目录，扫描了 {} 个目录",
            scan_result.total_count,
            counters.scanned_dirs()
        );
    }

    scan_result
}

/// 汇总任务：串行地把结果写入共享的扫描结果
async fn aggregate(mut items: mpsc::Receiver<ScanItem>, result: Arc<Mutex<ScanResult>>) {
    while let Some(item) = items.recv().await {
        result.lock().await.add_item(item);
    }
}
