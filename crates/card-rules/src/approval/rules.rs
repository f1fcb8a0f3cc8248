//! The six rule evaluators, each compiled from its loose constraint mapping
//! into a typed configuration at engine construction time.
//!
//! Every evaluator degrades internal faults to `false` (fail closed). The
//! master rule is the one exception in spirit: a failed allowlist read also
//! yields `false`, but there it means "do not bypass, run every rule" rather
//! than "decline".

use tracing::{info, warn};

use super::allowlist::ApprovedPhoneStore;
use super::constraints::{self, AreaCodes};
use super::domain::{Applicant, Constraints};
use super::risk::{RiskLevel, RiskScorer};

const MINIMUM_SALARY: &str = "minimum_salary";
const MIN_AGE_ALLOWED: &str = "min_age_allowed";
const MAX_CREDIT_CARD_COUNT: &str = "max_credit_card_count";
const IS_PP_EXPOSED: &str = "is_pp_exposed";
const ALLOWED_AREA_CODES: &str = "allowed_area_codes";
const CHECK_APPROVED_PHONES: &str = "check_approved_phones";

const DEFAULT_MINIMUM_SALARY: i64 = 100_000;
const DEFAULT_MIN_AGE: i64 = 18;
const DEFAULT_MAX_CARDS: i64 = 3;
const DEFAULT_EXPECTED_EXPOSURE: bool = true;
const DEFAULT_AREA_CODES: [char; 4] = ['0', '2', '5', '8'];
const DEFAULT_CHECK_APPROVED_PHONES: bool = true;

/// Passes when declared income strictly exceeds the minimum salary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct IncomeRule {
    minimum_salary: i64,
}

impl IncomeRule {
    pub(crate) fn from_constraints(constraints: &Constraints) -> Self {
        Self {
            minimum_salary: constraints::int_or(constraints, MINIMUM_SALARY, DEFAULT_MINIMUM_SALARY),
        }
    }

    pub(crate) fn evaluate(&self, applicant: &Applicant) -> bool {
        applicant.income > self.minimum_salary
    }
}

/// Passes when the applicant meets the minimum age (inclusive).
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct AgeRule {
    min_age: i64,
}

impl AgeRule {
    pub(crate) fn from_constraints(constraints: &Constraints) -> Self {
        Self {
            min_age: constraints::int_or(constraints, MIN_AGE_ALLOWED, DEFAULT_MIN_AGE),
        }
    }

    pub(crate) fn evaluate(&self, applicant: &Applicant) -> bool {
        i64::from(applicant.age) >= self.min_age
    }
}

/// Passes when the card count is within the maximum and the external risk
/// score for (age, card count) is Low.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct CreditCardsRule {
    max_cards: i64,
}

impl CreditCardsRule {
    pub(crate) fn from_constraints(constraints: &Constraints) -> Self {
        Self {
            max_cards: constraints::int_or(constraints, MAX_CREDIT_CARD_COUNT, DEFAULT_MAX_CARDS),
        }
    }

    pub(crate) fn evaluate<R: RiskScorer>(&self, applicant: &Applicant, scorer: &R) -> bool {
        if i64::from(applicant.number_of_credit_cards) > self.max_cards {
            return false;
        }
        scorer.score(applicant.age, applicant.number_of_credit_cards) == RiskLevel::Low
    }
}

/// Passes when the applicant's exposure flag matches the expected value.
///
/// The inherited default expects `politically_exposed == true`, which reads
/// inverted against the evident business intent. Production rule configs are
/// expected to override `is_pp_exposed` to `false`, as every known deployment
/// does; the literal default is preserved rather than second-guessed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct PoliticallyExposedRule {
    expected: bool,
}

impl PoliticallyExposedRule {
    pub(crate) fn from_constraints(constraints: &Constraints) -> Self {
        Self {
            expected: constraints::bool_or(constraints, IS_PP_EXPOSED, DEFAULT_EXPECTED_EXPOSURE),
        }
    }

    pub(crate) fn evaluate(&self, applicant: &Applicant) -> bool {
        // Absence is caught by request validation; fail closed if it slips through.
        applicant.politically_exposed == Some(self.expected)
    }
}

/// Passes when the phone number's first character is an allowed area digit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct PhoneLocationRule {
    allowed: AreaCodes,
}

impl PhoneLocationRule {
    pub(crate) fn from_constraints(constraints: &Constraints) -> Self {
        Self {
            allowed: constraints::area_codes_or(constraints, ALLOWED_AREA_CODES, &DEFAULT_AREA_CODES),
        }
    }

    pub(crate) fn evaluate(&self, applicant: &Applicant) -> bool {
        self.allowed.permits(&applicant.phone_number)
    }
}

/// Privileged bypass rule consulted before the sequential checks.
///
/// Returning `true` short-circuits the whole decision to approved. Disabled
/// bypass and allowlist read failures both return `false`, handing the
/// applicant to the full rule sequence; a transient storage problem must
/// never decide an application on its own.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct MasterRule {
    check_approved_phones: bool,
}

impl MasterRule {
    pub(crate) fn from_constraints(constraints: &Constraints) -> Self {
        Self {
            check_approved_phones: constraints::bool_or(
                constraints,
                CHECK_APPROVED_PHONES,
                DEFAULT_CHECK_APPROVED_PHONES,
            ),
        }
    }

    pub(crate) async fn bypass<S: ApprovedPhoneStore>(
        &self,
        applicant: &Applicant,
        store: &S,
    ) -> bool {
        if !self.check_approved_phones {
            return false;
        }

        match store.contains(&applicant.phone_number).await {
            Ok(true) => {
                info!(
                    phone_number = %applicant.phone_number,
                    "phone number is pre-approved, skipping all other rules"
                );
                true
            }
            Ok(false) => false,
            Err(err) => {
                warn!(error = %err, "approved-phone lookup failed, evaluating all rules");
                false
            }
        }
    }
}
