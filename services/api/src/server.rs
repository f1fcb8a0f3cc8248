use crate::cli::ServeArgs;
use crate::infra::{AppState, JsonFileApprovedPhoneStore};
use crate::routes::with_approval_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use card_rules::approval::{self, ApprovalService, RulesEngine, StandardRiskScorer};
use card_rules::config::AppConfig;
use card_rules::error::AppError;
use card_rules::telemetry;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use tracing::info;

pub(crate) async fn run(mut args: ServeArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;

    if let Some(host) = args.host.take() {
        config.server.host = host;
    }
    if let Some(port) = args.port.take() {
        config.server.port = port;
    }

    telemetry::init(&config.telemetry)?;

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(std::sync::atomic::AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
    };

    let definitions = approval::load_from_path(&config.storage.rules_path)?;
    let store = Arc::new(JsonFileApprovedPhoneStore::new(
        config.storage.approved_phones_path.clone(),
    ));
    let engine = RulesEngine::build(&definitions, store.clone(), Arc::new(StandardRiskScorer))?;
    let approval_service = Arc::new(ApprovalService::new(engine, store));

    let app = with_approval_routes(approval_service)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, "card approval decisioning service ready");

    axum::serve(listener, app).await?;
    Ok(())
}
