//! Credit-card application decisioning built around a configurable rules engine.
//!
//! The [`approval`] module carries the domain: rule definitions are loaded from
//! configuration, compiled into typed evaluators, and combined into a
//! [`approval::RulesEngine`] that turns an [`approval::Applicant`] into an
//! approved/declined [`approval::Status`]. The remaining modules provide the
//! ambient service concerns (configuration, telemetry, app-level errors) shared
//! with the HTTP binary in `services/api`.

pub mod approval;
pub mod config;
pub mod error;
pub mod telemetry;
