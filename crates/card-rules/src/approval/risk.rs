use serde::{Deserialize, Serialize};

/// Categorical credit-risk bucket consumed by the card-count rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum RiskLevel {
    Low,
    Medium,
    High,
}

/// External credit-risk scoring seam.
///
/// Pure and infallible from the engine's perspective; deployments substitute
/// a bureau-backed implementation behind this trait.
pub trait RiskScorer: Send + Sync {
    fn score(&self, age: u32, card_count: u32) -> RiskLevel;
}

/// Built-in heuristic scorer used when no external scorer is wired in.
///
/// Young applicants and heavy card loads rate High, thin or early files rate
/// Medium, established light users rate Low.
#[derive(Debug, Default, Clone, Copy)]
pub struct StandardRiskScorer;

impl RiskScorer for StandardRiskScorer {
    fn score(&self, age: u32, card_count: u32) -> RiskLevel {
        if age < 21 || card_count > 5 {
            return RiskLevel::High;
        }
        if card_count >= 3 || age < 25 {
            return RiskLevel::Medium;
        }
        RiskLevel::Low
    }
}
