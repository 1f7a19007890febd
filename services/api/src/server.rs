use crate::cli::ServeArgs;
use crate::infra::{build_store, AppState, SavedFilters};
use crate::routes::with_candidate_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use recruit_desk::candidates::RecruitmentService;
use recruit_desk::config::AppConfig;
use recruit_desk::error::AppError;
use recruit_desk::telemetry;
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

    let store = Arc::new(build_store(config.roster.seed_path.as_deref())?);
    let service = Arc::new(RecruitmentService::new(store)?);

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(std::sync::atomic::AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
        filters: Arc::new(SavedFilters::load(config.roster.filters_path.clone())),
    };

    let app = with_candidate_routes(service.clone())
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(
        ?config.environment,
        %addr,
        candidates = service.roster().records().len(),
        "recruitment dashboard ready"
    );

    axum::serve(listener, app).await?;
    Ok(())
}
