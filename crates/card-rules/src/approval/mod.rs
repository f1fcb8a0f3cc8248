//! Credit-card application approval: rule compilation, verification, and the
//! HTTP decision boundary.
//!
//! Rule definitions arrive as loosely-typed `{name, constraints}` records and
//! are compiled once into typed evaluators; from then on the engine is
//! read-only and shared freely across concurrent requests. Only the master
//! rule performs I/O (the approved-phone allowlist read); everything else is
//! pure predicate work.

pub mod allowlist;
mod constraints;
pub mod domain;
pub mod engine;
pub mod risk;
pub mod router;
mod rules;
pub mod service;
pub mod source;

#[cfg(test)]
mod tests;

pub use allowlist::{AllowlistError, ApprovedPhoneStore};
pub use domain::{Applicant, Constraints, RuleDefinition, RuleKind, Status, REQUIRED_RULES};
pub use engine::{EngineBuildError, RulesEngine};
pub use risk::{RiskLevel, RiskScorer, StandardRiskScorer};
pub use router::approval_router;
pub use service::{ApprovalService, Decision};
pub use source::{load_from_path, load_from_reader, DefinitionsError};
