use crate::infra::{InMemoryApprovedPhoneStore, JsonFileApprovedPhoneStore};
use card_rules::approval::{
    self, Applicant, ApprovalService, ApprovedPhoneStore, RuleDefinition, RulesEngine,
    StandardRiskScorer,
};
use card_rules::config::AppConfig;
use card_rules::error::AppError;
use clap::Args;
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Args, Debug)]
pub(crate) struct DecideArgs {
    /// Path to a JSON applicant record
    #[arg(long)]
    pub(crate) applicant: PathBuf,
    /// Rule definitions file (defaults to the configured rules path)
    #[arg(long)]
    pub(crate) rules: Option<PathBuf>,
    /// Approved-phone allowlist file; omit to decide against an empty allowlist
    #[arg(long)]
    pub(crate) approved_phones: Option<PathBuf>,
}

pub(crate) async fn run_decide(args: DecideArgs) -> Result<(), AppError> {
    let config = AppConfig::load()?;

    let rules_path = args.rules.unwrap_or(config.storage.rules_path);
    let definitions = approval::load_from_path(rules_path)?;

    let raw = std::fs::read(&args.applicant)?;
    let applicant: Applicant = serde_json::from_slice(&raw)
        .map_err(|err| std::io::Error::new(std::io::ErrorKind::InvalidData, err))?;

    match args.approved_phones {
        Some(path) => {
            let store = Arc::new(JsonFileApprovedPhoneStore::new(path));
            decide_and_render(store, &definitions, &applicant).await
        }
        None => {
            let store = Arc::new(InMemoryApprovedPhoneStore::default());
            decide_and_render(store, &definitions, &applicant).await
        }
    }
}

async fn decide_and_render<S>(
    store: Arc<S>,
    definitions: &[RuleDefinition],
    applicant: &Applicant,
) -> Result<(), AppError>
where
    S: ApprovedPhoneStore + 'static,
{
    let engine = RulesEngine::build(definitions, store.clone(), Arc::new(StandardRiskScorer))?;
    let service = ApprovalService::new(engine, store);

    let decision = service.decide(applicant).await;

    println!("Credit-card application decision");
    println!("Phone number: {}", applicant.phone_number);
    println!("Status: {}", decision.status.label());
    println!("Decided at: {}", decision.decided_at);
    Ok(())
}
