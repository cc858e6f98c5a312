use crate::models::ScanRule;

/// 从多个匹配的规则中选择最佳的一个
///
/// 通过项目标识验证的规则总是优先于未验证的规则，与优先级数值无关；
/// 同一组内选择优先级最高的规则，优先级相同时保留输入顺序中的第一个。
pub fn select_best_rule<'a>(rules: &[&'a ScanRule]) -> Option<&'a ScanRule> {
    let (verified, unverified): (Vec<&ScanRule>, Vec<&ScanRule>) =
        rules.iter().copied().partition(|rule| rule.is_verified());

    highest_priority(&verified).or_else(|| highest_priority(&unverified))
}

/// 选出优先级最高的规则，只有严格更高才替换，保证相同优先级时先到先得
fn highest_priority<'a>(rules: &[&'a ScanRule]) -> Option<&'a ScanRule> {
    rules.iter().copied().fold(None, |best, rule| match best {
        Some(current) if rule.priority <= current.priority => Some(current),
        _ => Some(rule),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_priority_wins_when_none_verified() {
        let gradle = ScanRule::new("Gradle", &["build"], 80);
        let node = ScanRule::new("Node.js", &["build"], 100);

        let best = select_best_rule(&[&gradle, &node]).unwrap();
        assert_eq!(best.name, "Node.js");
    }

    #[test]
    fn test_verified_rule_beats_higher_priority() {
        let node = ScanRule::new("Node.js", &["build"], 100);
        let gradle = ScanRule::new("Gradle", &["build"], 80).with_markers(&["build.gradle"]);

        let best = select_best_rule(&[&node, &gradle]).unwrap();
        assert_eq!(best.name, "Gradle");
    }

    #[test]
    fn test_equal_priority_keeps_input_order() {
        let maven = ScanRule::new("Maven", &["target"], 80).with_markers(&["pom.xml"]);
        let rust = ScanRule::new("Rust", &["target"], 80).with_markers(&["Cargo.toml"]);

        let best = select_best_rule(&[&maven, &rust]).unwrap();
        assert_eq!(best.name, "Maven");

        let best = select_best_rule(&[&rust, &maven]).unwrap();
        assert_eq!(best.name, "Rust");
    }

    #[test]
    fn test_single_and_empty_input() {
        let only = ScanRule::new("Java IDE", &["out"], 60);
        assert_eq!(select_best_rule(&[&only]).unwrap().name, "Java IDE");
        assert!(select_best_rule(&[]).is_none());
    }
}
