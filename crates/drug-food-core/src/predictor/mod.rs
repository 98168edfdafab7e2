//! Rule-based interaction predictor.
//!
//! Deterministic last resort over the static rule table. Matching order,
//! first match wins:
//!
//! 1. exact (drug, food) pair
//! 2. food category: a rule for the same drug whose food is in a category
//!    containing the query food (categories in precedence order)
//! 3. substring: rule drug and query drug contain one another, and the rule
//!    food is contained in the query food
//! 4. no match: no known interaction

use std::sync::Arc;

use crate::models::{
    normalize_term, InteractionRecord, InteractionVerdict, RecommendedAction, RiskLevel,
    SourceTag,
};
use crate::tables::{FoodCategoryTable, InteractionTable};

/// Provenance footer for rule-based verdicts.
pub const RULE_PROVENANCE: &str = "ML Prediction - Based on known drug-food interactions";

/// How a rule was matched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchKind {
    Exact,
    Category,
    Substring,
}

/// Predicts interactions from the static rule table.
pub struct RulePredictor {
    interactions: Arc<InteractionTable>,
    categories: Arc<FoodCategoryTable>,
}

impl RulePredictor {
    pub fn new(interactions: Arc<InteractionTable>, categories: Arc<FoodCategoryTable>) -> Self {
        Self {
            interactions,
            categories,
        }
    }

    /// Rendered prediction text. Never fails.
    pub fn predict(&self, drug: &str, food: &str) -> String {
        self.assess(drug, food).render()
    }

    /// Structured prediction.
    pub fn assess(&self, drug: &str, food: &str) -> InteractionVerdict {
        match self.find_rule(drug, food) {
            Some((record, kind)) => {
                tracing::debug!(
                    drug = %drug,
                    food = %food,
                    rule_drug = %record.drug,
                    rule_food = %record.food,
                    ?kind,
                    "Rule matched"
                );
                matched_verdict(record)
            }
            None => no_interaction_verdict(),
        }
    }

    /// The rule that applies to a pair, if any.
    pub fn find_rule(&self, drug: &str, food: &str) -> Option<(&InteractionRecord, MatchKind)> {
        let drug = normalize_term(drug);
        let food = normalize_term(food);

        if let Some(record) = self.interactions.get(&drug, &food) {
            return Some((record, MatchKind::Exact));
        }

        for category in self.categories.categories_of(&food) {
            if let Some(record) = self
                .interactions
                .iter()
                .find(|r| r.drug == drug && category.contains(&r.food))
            {
                return Some((record, MatchKind::Category));
            }
        }

        if drug.is_empty() || food.is_empty() {
            return None;
        }
        self.interactions
            .iter()
            .find(|r| {
                (r.drug.contains(drug.as_str()) || drug.contains(r.drug.as_str()))
                    && food.contains(r.food.as_str())
            })
            .map(|r| (r, MatchKind::Substring))
    }
}

fn matched_verdict(record: &InteractionRecord) -> InteractionVerdict {
    InteractionVerdict {
        risk_level: record.risk_level,
        has_interaction: record.risk_level != RiskLevel::None,
        recommended_action: record.action(),
        interaction_note: "Known interaction in medical database".into(),
        recommendation_note: record.recommendation.to_lowercase(),
        reason: record.mechanism.clone(),
        source_tag: SourceTag::Ml,
        provenance: RULE_PROVENANCE.into(),
    }
}

fn no_interaction_verdict() -> InteractionVerdict {
    InteractionVerdict {
        risk_level: RiskLevel::None,
        has_interaction: false,
        recommended_action: RecommendedAction::Safe,
        interaction_note: "No known interactions in database".into(),
        recommendation_note: "This combination appears safe based on available data".into(),
        reason: "No significant drug-food interactions found in our medical database".into(),
        source_tag: SourceTag::Ml,
        provenance: RULE_PROVENANCE.into(),
    }
}
