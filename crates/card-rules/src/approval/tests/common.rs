use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use serde_json::{json, Value};

use crate::approval::allowlist::{AllowlistError, ApprovedPhoneStore};
use crate::approval::domain::{Applicant, Constraints, RuleDefinition};
use crate::approval::engine::RulesEngine;
use crate::approval::risk::{RiskLevel, RiskScorer};
use crate::approval::service::ApprovalService;

pub(super) fn applicant() -> Applicant {
    Applicant {
        income: 120_000,
        number_of_credit_cards: 1,
        age: 29,
        politically_exposed: Some(false),
        job_industry_code: "15-100 - Plumbing".to_string(),
        phone_number: "268-741-8863".to_string(),
    }
}

pub(super) fn constraints(value: Value) -> Constraints {
    value.as_object().cloned().expect("constraint fixture is an object")
}

pub(super) fn definition(name: &str, value: Value) -> RuleDefinition {
    RuleDefinition {
        name: name.to_string(),
        constraints: constraints(value),
    }
}

/// Standard fixture config: defaults everywhere except the exposure flag,
/// which deployments override to decline exposed applicants.
pub(super) fn definitions() -> Vec<RuleDefinition> {
    vec![
        definition("Master", json!({ "check_approved_phones": true })),
        definition("Income", json!({ "minimum_salary": 100_000 })),
        definition("NoOfCreditCards", json!({ "max_credit_card_count": 3 })),
        definition("Age", json!({ "min_age_allowed": 18 })),
        definition("PoliticallyExposed", json!({ "is_pp_exposed": false })),
        definition(
            "PhoneLocation",
            json!({ "allowed_area_codes": ["0", "2", "5", "8"] }),
        ),
    ]
}

#[derive(Default)]
pub(super) struct MemoryAllowlist {
    phones: Mutex<HashMap<String, bool>>,
    pub(super) fail_reads: bool,
    pub(super) fail_writes: bool,
    reads: AtomicUsize,
    writes: Mutex<Vec<String>>,
}

impl MemoryAllowlist {
    pub(super) fn with_phones(phones: &[&str]) -> Self {
        let store = Self::default();
        {
            let mut guard = store.phones.lock().expect("allowlist mutex poisoned");
            for phone in phones {
                guard.insert((*phone).to_string(), true);
            }
        }
        store
    }

    pub(super) fn failing_reads() -> Self {
        Self {
            fail_reads: true,
            ..Self::default()
        }
    }

    pub(super) fn failing_writes() -> Self {
        Self {
            fail_writes: true,
            ..Self::default()
        }
    }

    pub(super) fn reads(&self) -> usize {
        self.reads.load(Ordering::Relaxed)
    }

    pub(super) fn recorded(&self) -> Vec<String> {
        self.writes.lock().expect("allowlist mutex poisoned").clone()
    }
}

#[async_trait]
impl ApprovedPhoneStore for MemoryAllowlist {
    async fn contains(&self, phone_number: &str) -> Result<bool, AllowlistError> {
        self.reads.fetch_add(1, Ordering::Relaxed);
        if self.fail_reads {
            return Err(AllowlistError::Unavailable("store offline".to_string()));
        }
        let guard = self.phones.lock().expect("allowlist mutex poisoned");
        Ok(guard.contains_key(phone_number))
    }

    async fn record_approval(&self, phone_number: &str) -> Result<(), AllowlistError> {
        if self.fail_writes {
            return Err(AllowlistError::Unavailable("store offline".to_string()));
        }
        self.phones
            .lock()
            .expect("allowlist mutex poisoned")
            .insert(phone_number.to_string(), true);
        self.writes
            .lock()
            .expect("allowlist mutex poisoned")
            .push(phone_number.to_string());
        Ok(())
    }
}

/// Scorer double returning a fixed level and counting invocations so tests
/// can observe short-circuit behavior.
pub(super) struct ScriptedScorer {
    level: RiskLevel,
    calls: AtomicUsize,
}

impl ScriptedScorer {
    pub(super) fn low() -> Self {
        Self::returning(RiskLevel::Low)
    }

    pub(super) fn returning(level: RiskLevel) -> Self {
        Self {
            level,
            calls: AtomicUsize::new(0),
        }
    }

    pub(super) fn calls(&self) -> usize {
        self.calls.load(Ordering::Relaxed)
    }
}

impl RiskScorer for ScriptedScorer {
    fn score(&self, _age: u32, _card_count: u32) -> RiskLevel {
        self.calls.fetch_add(1, Ordering::Relaxed);
        self.level
    }
}

pub(super) async fn read_json_body(response: axum::response::Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 4096)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}

pub(super) fn build_engine(
    definitions: &[RuleDefinition],
    store: MemoryAllowlist,
    scorer: ScriptedScorer,
) -> (
    RulesEngine<MemoryAllowlist, ScriptedScorer>,
    Arc<MemoryAllowlist>,
    Arc<ScriptedScorer>,
) {
    let store = Arc::new(store);
    let scorer = Arc::new(scorer);
    let engine = RulesEngine::build(definitions, store.clone(), scorer.clone())
        .expect("engine builds from fixture definitions");
    (engine, store, scorer)
}

pub(super) fn build_service(
    store: MemoryAllowlist,
) -> (
    Arc<ApprovalService<MemoryAllowlist, ScriptedScorer>>,
    Arc<MemoryAllowlist>,
) {
    let store = Arc::new(store);
    let scorer = Arc::new(ScriptedScorer::low());
    let engine = RulesEngine::build(&definitions(), store.clone(), scorer)
        .expect("engine builds from fixture definitions");
    let service = ApprovalService::new(engine, store.clone());
    (Arc::new(service), store)
}
