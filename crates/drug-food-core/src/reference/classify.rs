//! Risk classification of extracted reference text.

use crate::models::{RecommendedAction, RiskLevel};

/// Risk and action assigned to a block of reference text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Classification {
    pub risk_level: RiskLevel,
    pub action: RecommendedAction,
}

impl Classification {
    pub fn has_interaction(&self) -> bool {
        self.risk_level != RiskLevel::None
    }
}

/// Assigns a risk level to reference text.
pub trait ContentClassifier: Send + Sync {
    fn classify(&self, text: &str) -> Classification;
}

const HIGH_RISK_KEYWORDS: &[&str] = &["avoid", "contraindicated", "dangerous", "severe", "serious"];
const MODERATE_RISK_KEYWORDS: &[&str] = &["limit", "reduce", "moderate", "caution"];
const NO_RISK_KEYWORDS: &[&str] = &["safe", "no interaction", "no effect"];

/// Keyword heuristic. Tiers are checked from most to least severe; the first
/// tier with a hit wins, otherwise Low/Monitor.
#[derive(Debug, Default, Clone, Copy)]
pub struct KeywordClassifier;

impl ContentClassifier for KeywordClassifier {
    fn classify(&self, text: &str) -> Classification {
        let lower = text.to_lowercase();
        let hit = |keywords: &[&str]| keywords.iter().any(|k| lower.contains(k));

        let (risk_level, action) = if hit(HIGH_RISK_KEYWORDS) {
            (RiskLevel::High, RecommendedAction::Avoid)
        } else if hit(MODERATE_RISK_KEYWORDS) {
            (RiskLevel::Moderate, RecommendedAction::Limit)
        } else if hit(NO_RISK_KEYWORDS) {
            (RiskLevel::None, RecommendedAction::Safe)
        } else {
            (RiskLevel::Low, RecommendedAction::Monitor)
        };

        Classification { risk_level, action }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn classify(text: &str) -> Classification {
        KeywordClassifier.classify(text)
    }

    #[test]
    fn test_high_beats_monitor() {
        let c = classify("Avoid grapefruit juice. Your doctor will monitor your liver.");
        assert_eq!(c.risk_level, RiskLevel::High);
        assert_eq!(c.action, RecommendedAction::Avoid);
        assert!(c.has_interaction());
    }

    #[test]
    fn test_high_beats_moderate_and_safe() {
        let c = classify(
            "Use caution. It is safe in small amounts but may cause SERIOUS side effects.",
        );
        assert_eq!(c.risk_level, RiskLevel::High);
    }

    #[test]
    fn test_moderate() {
        let c = classify("Limit your intake of alcohol.");
        assert_eq!(c.risk_level, RiskLevel::Moderate);
        assert_eq!(c.action, RecommendedAction::Limit);
    }

    #[test]
    fn test_none() {
        let c = classify("Food has no effect on absorption.");
        assert_eq!(c.risk_level, RiskLevel::None);
        assert_eq!(c.action, RecommendedAction::Safe);
        assert!(!c.has_interaction());
    }

    #[test]
    fn test_default_low() {
        let c = classify("Take with a full glass of water.");
        assert_eq!(c.risk_level, RiskLevel::Low);
        assert_eq!(c.action, RecommendedAction::Monitor);
        assert!(c.has_interaction());
    }
}
