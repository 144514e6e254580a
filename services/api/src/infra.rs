use async_trait::async_trait;
use chrono::NaiveDate;
use metrics_exporter_prometheus::PrometheusHandle;
use std::path::Path;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use tracing::info;
use villa_booking::config::BookingConfig;
use villa_booking::error::AppError;
use villa_booking::workflows::booking::{
    BookingDesk, BookingReference, BookingRequest, CalendarAvailability, CalendarImporter,
    InMemoryPromoCatalog, SubmissionError, SubmissionGateway,
};

pub(crate) type ApiDesk =
    BookingDesk<CalendarAvailability, InMemoryPromoCatalog, InMemorySubmissionGateway>;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Reservation desk that keeps accepted requests in memory and numbers them
/// `VLA-000001`, `VLA-000002`, and so on.
#[derive(Default, Clone)]
pub(crate) struct InMemorySubmissionGateway {
    sequence: Arc<AtomicU64>,
    accepted: Arc<Mutex<Vec<(BookingReference, BookingRequest)>>>,
}

impl InMemorySubmissionGateway {
    pub(crate) fn accepted(&self) -> Vec<(BookingReference, BookingRequest)> {
        self.accepted
            .lock()
            .map(|guard| guard.clone())
            .unwrap_or_default()
    }
}

#[async_trait]
impl SubmissionGateway for InMemorySubmissionGateway {
    async fn submit(&self, request: BookingRequest) -> Result<BookingReference, SubmissionError> {
        let id = self.sequence.fetch_add(1, Ordering::SeqCst) + 1;
        let reference = BookingReference(format!("VLA-{id:06}"));
        let mut guard = self
            .accepted
            .lock()
            .map_err(|_| SubmissionError::Unavailable("reservation store poisoned".to_string()))?;
        guard.push((reference.clone(), request));
        Ok(reference)
    }
}

/// Calendar seeded from an availability export, or an open calendar when none is given.
pub(crate) fn load_calendar(path: Option<&Path>) -> Result<CalendarAvailability, AppError> {
    match path {
        Some(path) => {
            let calendar = CalendarImporter::from_path(path)?;
            info!(path = %path.display(), entries = calendar.len(), "calendar imported");
            Ok(calendar)
        }
        None => Ok(CalendarAvailability::new()),
    }
}

pub(crate) fn build_desk(
    config: &BookingConfig,
    calendar: CalendarAvailability,
    gateway: Arc<InMemorySubmissionGateway>,
) -> ApiDesk {
    BookingDesk::new(
        config.listing(),
        Arc::new(calendar),
        Arc::new(InMemoryPromoCatalog::standard()),
        gateway,
    )
    .with_submission_timeout(config.submission_timeout)
}

pub(crate) fn parse_date(raw: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|err| format!("failed to parse '{raw}' as YYYY-MM-DD ({err})"))
}
