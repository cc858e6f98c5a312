pub mod rule;
pub mod scan_result;

pub use rule::ScanRule;
pub use scan_result::{RuleStats, ScanItem, ScanProgress, ScanResult};
