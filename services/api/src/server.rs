use crate::cli::ServeArgs;
use crate::infra::{build_desk, load_calendar, AppState, InMemorySubmissionGateway};
use crate::routes::with_booking_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use tracing::info;
use villa_booking::config::AppConfig;
use villa_booking::error::AppError;
use villa_booking::telemetry;

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

    let calendar = load_calendar(args.calendar_csv.as_deref())?;
    let gateway = Arc::new(InMemorySubmissionGateway::default());
    let desk = Arc::new(build_desk(&config.booking, calendar, gateway));

    let app = with_booking_routes(desk)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(
        ?config.environment,
        %addr,
        villa = %config.booking.villa_id,
        nightly_rate = config.booking.nightly_rate,
        "villa booking service ready"
    );

    axum::serve(listener, app).await?;
    Ok(())
}
