use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::warn;

use super::allowlist::ApprovedPhoneStore;
use super::domain::{Applicant, Status};
use super::engine::RulesEngine;
use super::risk::RiskScorer;

/// Decision boundary wrapping the rules engine.
///
/// After an approval the applicant's phone number is recorded in the
/// allowlist so later applications can take the master bypass. Persistence
/// failures are logged and never alter the already-decided status.
pub struct ApprovalService<S, R> {
    engine: RulesEngine<S, R>,
    store: Arc<S>,
}

/// Timestamped outcome returned to callers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Decision {
    pub status: Status,
    pub decided_at: DateTime<Utc>,
}

impl<S, R> ApprovalService<S, R>
where
    S: ApprovedPhoneStore + 'static,
    R: RiskScorer + 'static,
{
    pub fn new(engine: RulesEngine<S, R>, store: Arc<S>) -> Self {
        Self { engine, store }
    }

    pub async fn decide(&self, applicant: &Applicant) -> Decision {
        let status = self.engine.verify(applicant).await;

        if status == Status::Approved {
            if let Err(err) = self.store.record_approval(&applicant.phone_number).await {
                warn!(
                    error = %err,
                    phone_number = %applicant.phone_number,
                    "failed to record approved phone"
                );
            }
        }

        Decision {
            status,
            decided_at: Utc::now(),
        }
    }
}
