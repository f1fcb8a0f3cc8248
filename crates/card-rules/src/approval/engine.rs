use std::sync::Arc;

use tracing::{debug, warn};

use super::allowlist::ApprovedPhoneStore;
use super::domain::{Applicant, RuleDefinition, RuleKind, Status, REQUIRED_RULES};
use super::risk::RiskScorer;
use super::rules::{
    AgeRule, CreditCardsRule, IncomeRule, MasterRule, PhoneLocationRule, PoliticallyExposedRule,
};

/// Immutable set of compiled rule evaluators plus their collaborators.
///
/// Built once from a list of [`RuleDefinition`]s and safe to share across
/// concurrent verification calls; nothing is mutated after construction.
/// The five required evaluators are held as named fields so the verification
/// order is structural, never an accident of container iteration.
pub struct RulesEngine<S, R> {
    master: Option<MasterRule>,
    income: IncomeRule,
    age: AgeRule,
    credit_cards: CreditCardsRule,
    politically_exposed: PoliticallyExposedRule,
    phone_location: PhoneLocationRule,
    store: Arc<S>,
    scorer: Arc<R>,
}

/// Error raised when a valid engine cannot be constructed.
#[derive(Debug, thiserror::Error)]
pub enum EngineBuildError {
    #[error("no rule definitions provided, check the rules config")]
    EmptyDefinitions,
    #[error("missing required rules: {}", missing.join(", "))]
    MissingRules { missing: Vec<&'static str> },
}

impl<S, R> RulesEngine<S, R>
where
    S: ApprovedPhoneStore,
    R: RiskScorer,
{
    /// Compile rule definitions into an engine.
    ///
    /// Unknown rule names are skipped with a diagnostic. Duplicate
    /// definitions of the same kind resolve first-wins, including Master.
    /// Construction fails when the definition list is empty or any of the
    /// five required rules is missing; Master itself is optional.
    pub fn build(
        definitions: &[RuleDefinition],
        store: Arc<S>,
        scorer: Arc<R>,
    ) -> Result<Self, EngineBuildError> {
        if definitions.is_empty() {
            return Err(EngineBuildError::EmptyDefinitions);
        }

        let mut master = None;
        let mut income = None;
        let mut age = None;
        let mut credit_cards = None;
        let mut politically_exposed = None;
        let mut phone_location = None;

        for definition in definitions {
            let kind = match RuleKind::from_name(&definition.name) {
                Some(kind) => kind,
                None => {
                    warn!(rule = %definition.name, "unknown rule in config, skipping");
                    continue;
                }
            };

            let constraints = &definition.constraints;
            let duplicate = match kind {
                RuleKind::Master => fill(&mut master, || MasterRule::from_constraints(constraints)),
                RuleKind::Income => fill(&mut income, || IncomeRule::from_constraints(constraints)),
                RuleKind::Age => fill(&mut age, || AgeRule::from_constraints(constraints)),
                RuleKind::CreditCards => {
                    fill(&mut credit_cards, || CreditCardsRule::from_constraints(constraints))
                }
                RuleKind::PoliticallyExposed => fill(&mut politically_exposed, || {
                    PoliticallyExposedRule::from_constraints(constraints)
                }),
                RuleKind::PhoneLocation => fill(&mut phone_location, || {
                    PhoneLocationRule::from_constraints(constraints)
                }),
            };
            if duplicate {
                warn!(rule = kind.as_str(), "duplicate rule definition ignored, first one wins");
            }
        }

        let mut missing = Vec::new();
        for kind in REQUIRED_RULES {
            let present = match kind {
                RuleKind::Income => income.is_some(),
                RuleKind::Age => age.is_some(),
                RuleKind::CreditCards => credit_cards.is_some(),
                RuleKind::PoliticallyExposed => politically_exposed.is_some(),
                RuleKind::PhoneLocation => phone_location.is_some(),
                RuleKind::Master => true,
            };
            if !present {
                missing.push(kind.as_str());
            }
        }
        if let (
            Some(income),
            Some(age),
            Some(credit_cards),
            Some(politically_exposed),
            Some(phone_location),
        ) = (income, age, credit_cards, politically_exposed, phone_location)
        {
            Ok(Self {
                master,
                income,
                age,
                credit_cards,
                politically_exposed,
                phone_location,
                store,
                scorer,
            })
        } else {
            Err(EngineBuildError::MissingRules { missing })
        }
    }

    /// Decide a single application.
    ///
    /// The master rule (when configured) runs first; a bypass approves the
    /// applicant without touching any other rule. Otherwise the required
    /// rules run in the fixed order Income, Age, NoOfCreditCards,
    /// PoliticallyExposed, PhoneLocation, and the first failure declines
    /// without evaluating the rest. A built engine never errors here.
    pub async fn verify(&self, applicant: &Applicant) -> Status {
        if let Some(master) = &self.master {
            if master.bypass(applicant, self.store.as_ref()).await {
                return Status::Approved;
            }
        }

        if !self.income.evaluate(applicant) {
            return self.declined(RuleKind::Income);
        }
        if !self.age.evaluate(applicant) {
            return self.declined(RuleKind::Age);
        }
        if !self.credit_cards.evaluate(applicant, self.scorer.as_ref()) {
            return self.declined(RuleKind::CreditCards);
        }
        if !self.politically_exposed.evaluate(applicant) {
            return self.declined(RuleKind::PoliticallyExposed);
        }
        if !self.phone_location.evaluate(applicant) {
            return self.declined(RuleKind::PhoneLocation);
        }

        Status::Approved
    }

    fn declined(&self, kind: RuleKind) -> Status {
        debug!(rule = kind.as_str(), "applicant failed rule, declining");
        Status::Declined
    }
}

/// Set the slot if empty; report whether the value was a duplicate.
fn fill<T>(slot: &mut Option<T>, make: impl FnOnce() -> T) -> bool {
    if slot.is_some() {
        return true;
    }
    *slot = Some(make());
    false
}
