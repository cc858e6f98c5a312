pub mod engine;
pub mod exclusion;
pub mod project_root;
pub mod rule_matcher;
pub mod rule_selector;
pub mod size_calculator;
pub mod walker;

pub use engine::{scan, CancelHandle, ScanHandle, ScanSettings, Scanner};
pub use exclusion::{is_system_or_hidden_dir, ExclusionEngine};
pub use project_root::{find_nearest_marker, ProjectRoot, ProjectRootResolver, PROJECT_MARKERS};
pub use rule_matcher::RuleMatcher;
pub use rule_selector::select_best_rule;
pub use size_calculator::{DirectorySizeInfo, SizeCalculator};
pub use walker::{DirectoryWalker, VisitDecision};
