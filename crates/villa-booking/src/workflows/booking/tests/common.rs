use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use axum::response::Response;
use chrono::NaiveDate;
use serde_json::Value;

use crate::workflows::booking::availability::CalendarAvailability;
use crate::workflows::booking::domain::{
    BookingReference, BookingRequest, GuestDraft, PromoCode, VillaListing,
};
use crate::workflows::booking::gateway::{SubmissionError, SubmissionGateway};
use crate::workflows::booking::promo::InMemoryPromoCatalog;
use crate::workflows::booking::service::BookingDesk;
use crate::workflows::booking::workflow::BookingWorkflow;

pub(super) const NIGHTLY_RATE: u64 = 2_000_000;

pub(super) fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).expect("valid date")
}

pub(super) fn june(day: u32) -> NaiveDate {
    date(2025, 6, day)
}

pub(super) fn promo_day() -> NaiveDate {
    june(1)
}

pub(super) fn listing() -> VillaListing {
    VillaListing {
        id: "villa-serenity".to_string(),
        name: "Villa Serenity".to_string(),
        nightly_rate: NIGHTLY_RATE,
        max_guests: 10,
    }
}

/// June 2025 with the 10th booked and the 12th blocked for maintenance.
pub(super) fn calendar() -> CalendarAvailability {
    let mut calendar = CalendarAvailability::new();
    calendar.book(june(10), "BK-0042");
    calendar.block(june(12));
    calendar
}

pub(super) fn catalog() -> InMemoryPromoCatalog {
    let mut catalog = InMemoryPromoCatalog::standard();
    catalog
        .insert(PromoCode {
            code: "retired5".to_string(),
            discount_percentage: 5,
            affiliate_id: None,
            valid_from: date(2024, 1, 1),
            valid_until: date(2026, 12, 31),
            is_active: false,
        })
        .expect("unique code");
    catalog
        .insert(PromoCode {
            code: "EARLYBIRD".to_string(),
            discount_percentage: 15,
            affiliate_id: Some("aff9".to_string()),
            valid_from: date(2025, 7, 1),
            valid_until: date(2025, 7, 31),
            is_active: true,
        })
        .expect("unique code");
    catalog
}

pub(super) fn guest_draft() -> GuestDraft {
    GuestDraft {
        full_name: "Ayu Lestari".to_string(),
        email: "ayu@example.com".to_string(),
        phone: "+62 812 0000 1111".to_string(),
        id_number: "3171234567890001".to_string(),
        number_of_guests: 4,
        special_requests: "Late arrival around 22:00".to_string(),
    }
}

#[derive(Default)]
pub(super) struct MemoryGateway {
    sequence: AtomicU64,
    requests: Mutex<Vec<BookingRequest>>,
}

impl MemoryGateway {
    pub(super) fn requests(&self) -> Vec<BookingRequest> {
        self.requests.lock().expect("gateway mutex poisoned").clone()
    }
}

#[async_trait]
impl SubmissionGateway for MemoryGateway {
    async fn submit(&self, request: BookingRequest) -> Result<BookingReference, SubmissionError> {
        let id = self.sequence.fetch_add(1, Ordering::Relaxed) + 1;
        self.requests
            .lock()
            .expect("gateway mutex poisoned")
            .push(request);
        Ok(BookingReference(format!("VLA-{id:06}")))
    }
}

pub(super) struct RejectingGateway;

#[async_trait]
impl SubmissionGateway for RejectingGateway {
    async fn submit(&self, _request: BookingRequest) -> Result<BookingReference, SubmissionError> {
        Err(SubmissionError::Unavailable("reservation desk offline".to_string()))
    }
}

pub(super) struct StalledGateway;

#[async_trait]
impl SubmissionGateway for StalledGateway {
    async fn submit(&self, _request: BookingRequest) -> Result<BookingReference, SubmissionError> {
        tokio::time::sleep(Duration::from_secs(5)).await;
        Ok(BookingReference("VLA-LATE".to_string()))
    }
}

pub(super) type MemoryWorkflow =
    BookingWorkflow<CalendarAvailability, InMemoryPromoCatalog, MemoryGateway>;

pub(super) fn workflow() -> (MemoryWorkflow, Arc<MemoryGateway>) {
    let gateway = Arc::new(MemoryGateway::default());
    let workflow = BookingWorkflow::new(
        listing(),
        Arc::new(calendar()),
        Arc::new(catalog()),
        gateway.clone(),
    );
    (workflow, gateway)
}

pub(super) fn workflow_with<G>(gateway: Arc<G>) -> BookingWorkflow<CalendarAvailability, InMemoryPromoCatalog, G>
where
    G: SubmissionGateway + 'static,
{
    BookingWorkflow::new(listing(), Arc::new(calendar()), Arc::new(catalog()), gateway)
}

/// Workflow on the guest-info step for June 1 to June 4.
pub(super) fn workflow_at_info() -> (MemoryWorkflow, Arc<MemoryGateway>) {
    let (mut workflow, gateway) = workflow();
    workflow.select_date(june(1)).expect("check-in");
    workflow.select_date(june(4)).expect("check-out");
    workflow.continue_to_promo().expect("dates complete");
    workflow.continue_to_info().expect("promo optional");
    (workflow, gateway)
}

pub(super) fn desk() -> (
    BookingDesk<CalendarAvailability, InMemoryPromoCatalog, MemoryGateway>,
    Arc<MemoryGateway>,
) {
    let gateway = Arc::new(MemoryGateway::default());
    let desk = BookingDesk::new(
        listing(),
        Arc::new(calendar()),
        Arc::new(catalog()),
        gateway.clone(),
    )
    .with_clock(promo_day);
    (desk, gateway)
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 16 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
