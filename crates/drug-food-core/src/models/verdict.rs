//! Interaction verdicts and their rendered text form.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Ordinal severity of a drug-food interaction.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum RiskLevel {
    None,
    Low,
    Moderate,
    High,
}

impl RiskLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            RiskLevel::None => "None",
            RiskLevel::Low => "Low",
            RiskLevel::Moderate => "Moderate",
            RiskLevel::High => "High",
        }
    }
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What the patient should do with the food.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum RecommendedAction {
    Avoid,
    Limit,
    Monitor,
    Safe,
}

impl RecommendedAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            RecommendedAction::Avoid => "Avoid",
            RecommendedAction::Limit => "Limit",
            RecommendedAction::Monitor => "Monitor",
            RecommendedAction::Safe => "Safe",
        }
    }

    /// Derive an action from free recommendation text.
    ///
    /// Keywords are checked in severity order: avoid, limit, monitor.
    pub fn from_recommendation(text: &str) -> Self {
        let lower = text.to_lowercase();
        if lower.contains("avoid") {
            RecommendedAction::Avoid
        } else if lower.contains("limit") {
            RecommendedAction::Limit
        } else if lower.contains("monitor") {
            RecommendedAction::Monitor
        } else {
            RecommendedAction::Safe
        }
    }
}

impl fmt::Display for RecommendedAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Provenance of a verdict.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum SourceTag {
    /// Authoritative reference document
    Official,
    /// Generative narrative
    Ai,
    /// Static rule table
    Ml,
    /// Unexpected failure at the resolver boundary
    Error,
}

impl SourceTag {
    pub fn as_str(&self) -> &'static str {
        match self {
            SourceTag::Official => "official",
            SourceTag::Ai => "ai",
            SourceTag::Ml => "ml",
            SourceTag::Error => "error",
        }
    }
}

impl fmt::Display for SourceTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Canonical verdict shape shared by the reference scraper and the predictor.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct InteractionVerdict {
    pub risk_level: RiskLevel,
    pub has_interaction: bool,
    pub recommended_action: RecommendedAction,
    /// Qualifier after Yes/No on the interaction line
    pub interaction_note: String,
    /// Text after the action on the recommendation line
    pub recommendation_note: String,
    /// Plain-language explanation
    pub reason: String,
    pub source_tag: SourceTag,
    /// Human-readable provenance footer
    pub provenance: String,
}

impl InteractionVerdict {
    /// Render the verdict in the shared four-field layout.
    pub fn render(&self) -> String {
        let interaction = if self.has_interaction { "Yes" } else { "No" };
        format!(
            "\n**RISK LEVEL**: {}\n\n**INTERACTION**: {} - {}\n\n**RECOMMENDATION**: {} - {}\n\n**REASON**: {}\n\n---\n*Source: {}*\n",
            self.risk_level,
            interaction,
            self.interaction_note,
            self.recommended_action,
            self.recommendation_note,
            self.reason,
            self.provenance,
        )
    }
}

/// Outward result of one resolution: `(source, text, canonical drug)`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct InteractionReport {
    pub source: SourceTag,
    pub text: String,
    pub canonical_drug: String,
}

impl InteractionReport {
    pub fn new(
        source: SourceTag,
        text: impl Into<String>,
        canonical_drug: impl Into<String>,
    ) -> Self {
        Self {
            source,
            text: text.into(),
            canonical_drug: canonical_drug.into(),
        }
    }
}
