//! Static interaction rule records.

use serde::{Deserialize, Serialize};

use super::{RecommendedAction, RiskLevel};

/// Canonical form of a drug or food term: trimmed, lowercase, underscores
/// read as spaces.
pub fn normalize_term(term: &str) -> String {
    term.trim().to_lowercase().replace('_', " ")
}

/// One (drug, food) rule in the static knowledge base.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct InteractionRecord {
    /// Canonical generic drug name, see [`normalize_term`]
    pub drug: String,
    /// Canonical food term or category name, see [`normalize_term`]
    pub food: String,
    pub risk_level: RiskLevel,
    pub mechanism: String,
    pub effect: String,
    pub recommendation: String,
}

impl InteractionRecord {
    pub fn new(
        drug: &str,
        food: &str,
        risk_level: RiskLevel,
        mechanism: &str,
        effect: &str,
        recommendation: &str,
    ) -> Self {
        Self {
            drug: normalize_term(drug),
            food: normalize_term(food),
            risk_level,
            mechanism: mechanism.into(),
            effect: effect.into(),
            recommendation: recommendation.into(),
        }
    }

    /// Action implied by the stored recommendation text.
    pub fn action(&self) -> RecommendedAction {
        RecommendedAction::from_recommendation(&self.recommendation)
    }
}
