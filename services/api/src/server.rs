use std::sync::atomic::Ordering;
use std::sync::Arc;

use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use migradesk::config::AppConfig;
use migradesk::error::AppError;
use migradesk::telemetry;
use migradesk::workflows::folders::catalog::RequirementCatalog;
use migradesk::workflows::folders::service::FolderService;
use migradesk::workflows::scheduling::service::SchedulingService;
use tracing::info;

use crate::cli::ServeArgs;
use crate::infra::{default_agents, AppState, InMemoryFolderRepository, LoggingNotifier};
use crate::routes::with_case_routes;

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

    let catalog = match &config.catalog.path {
        Some(path) => Arc::new(RequirementCatalog::from_path(path)?),
        None => Arc::new(RequirementCatalog::with_defaults()),
    };

    let notifier = Arc::new(LoggingNotifier);
    let scheduling_service = Arc::new(SchedulingService::new(default_agents(), notifier.clone()));
    let repository = Arc::new(InMemoryFolderRepository::default());
    let folder_service = Arc::new(FolderService::new(catalog, repository, notifier));

    let app = with_case_routes(scheduling_service, folder_service)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, "case management backend ready");

    axum::serve(listener, app).await?;
    Ok(())
}
