use crate::cli::ServeArgs;
use crate::infra::{sample_roster, AppState, InMemoryMatchLog};
use crate::routes::with_allocation_routes;
use axum::{Extension, Router};
use axum_prometheus::PrometheusMetricLayer;
use devpool::config::AppConfig;
use devpool::error::AppError;
use devpool::telemetry;
use devpool::workflows::allocation::{
    AllocationService, CandidateSource, CsvCandidateSource, ProposeMatch, StaticCandidateSource,
};
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

    let proposer = Arc::new(InMemoryMatchLog::default());
    let app = match args.roster.take() {
        Some(path) => {
            let roster = CsvCandidateSource::from_path(&path)?;
            info!(path = %path.display(), developers = roster.len(), "loaded developer roster");
            build_app(&config, Arc::new(roster), proposer)
        }
        None => build_app(
            &config,
            Arc::new(StaticCandidateSource::new(sample_roster())),
            proposer,
        ),
    }
    .layer(Extension(app_state))
    .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, "developer pool service ready");

    axum::serve(listener, app).await?;
    Ok(())
}

fn build_app<S, P>(config: &AppConfig, source: Arc<S>, proposer: Arc<P>) -> Router
where
    S: CandidateSource + 'static,
    P: ProposeMatch + 'static,
{
    let service = AllocationService::new(
        source,
        proposer,
        config.pool.browser_settings(),
        config.pool.schedule.clone(),
    );
    with_allocation_routes(Arc::new(service))
}
