use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Applicant record submitted for a credit-card decision.
///
/// One instance per verification call, immutable while the engine runs.
/// `politically_exposed` is optional on the wire; its absence is a request
/// validation error handled at the HTTP boundary, not by the engine.
/// `job_industry_code` is unused by the current rules and carried for future
/// underwriting work.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Applicant {
    pub income: i64,
    pub number_of_credit_cards: u32,
    pub age: u32,
    #[serde(default)]
    pub politically_exposed: Option<bool>,
    pub job_industry_code: String,
    pub phone_number: String,
}

/// Final decision produced by the rules engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    Approved,
    Declined,
}

impl Status {
    pub const fn label(self) -> &'static str {
        match self {
            Status::Approved => "approved",
            Status::Declined => "declined",
        }
    }
}

/// Loose per-rule constraint mapping as loaded from configuration.
pub type Constraints = Map<String, Value>;

/// One entry of the rule configuration: a recognized name plus overrides.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleDefinition {
    pub name: String,
    #[serde(default)]
    pub constraints: Constraints,
}

/// Closed set of rule kinds the engine understands.
///
/// Definition names outside this set are skipped with a diagnostic at build
/// time; they never abort construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuleKind {
    Income,
    Age,
    CreditCards,
    PoliticallyExposed,
    PhoneLocation,
    Master,
}

impl RuleKind {
    /// Wire name used in rule definition files.
    pub const fn as_str(self) -> &'static str {
        match self {
            RuleKind::Income => "Income",
            RuleKind::Age => "Age",
            RuleKind::CreditCards => "NoOfCreditCards",
            RuleKind::PoliticallyExposed => "PoliticallyExposed",
            RuleKind::PhoneLocation => "PhoneLocation",
            RuleKind::Master => "Master",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "Income" => Some(RuleKind::Income),
            "Age" => Some(RuleKind::Age),
            "NoOfCreditCards" => Some(RuleKind::CreditCards),
            "PoliticallyExposed" => Some(RuleKind::PoliticallyExposed),
            "PhoneLocation" => Some(RuleKind::PhoneLocation),
            "Master" => Some(RuleKind::Master),
            _ => None,
        }
    }
}

/// The evaluators a valid engine must hold; Master is optional and absent here.
pub const REQUIRED_RULES: [RuleKind; 5] = [
    RuleKind::Income,
    RuleKind::Age,
    RuleKind::CreditCards,
    RuleKind::PoliticallyExposed,
    RuleKind::PhoneLocation,
];
