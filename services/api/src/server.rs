use crate::cli::ServeArgs;
use crate::infra::AppState;
use crate::routes::with_catalog_routes;
use crate::seed;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use sheaf::catalog::{CatalogService, InMemoryCatalog};
use sheaf::config::AppConfig;
use sheaf::error::AppError;
use sheaf::media::FsMediaStore;
use sheaf::previews::PreviewGenerator;
use sheaf::telemetry;
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

    let repository = Arc::new(InMemoryCatalog::new());
    let media = Arc::new(FsMediaStore::new(config.media.root.clone()));
    let previews = Arc::new(PreviewGenerator::with_pdfium());
    let catalog_service = Arc::new(CatalogService::new(repository, media.clone(), previews));

    if args.demo_data {
        seed::populate(catalog_service.as_ref())?;
        info!("demo catalog loaded");
    }

    let app = with_catalog_routes(catalog_service, media)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, "worksheet catalog api ready");

    axum::serve(listener, app).await?;
    Ok(())
}
