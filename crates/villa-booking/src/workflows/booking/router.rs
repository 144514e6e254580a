use std::sync::Arc;

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use chrono::NaiveDate;
use serde::Deserialize;
use serde_json::json;

use super::availability::{AvailabilityError, AvailabilitySource};
use super::dates::DateSelectionError;
use super::domain::GuestDraft;
use super::gateway::{SubmissionError, SubmissionGateway};
use super::promo::{PromoCatalog, PromoError};
use super::service::{BookingDesk, StayRequest};
use super::workflow::WorkflowError;

/// Router builder exposing calendar, quote, and booking endpoints.
///
/// Promo windows are always checked against the desk's clock, never a date
/// supplied by the client.
pub fn booking_router<A, C, G>(desk: Arc<BookingDesk<A, C, G>>) -> Router
where
    A: AvailabilitySource + 'static,
    C: PromoCatalog + 'static,
    G: SubmissionGateway + 'static,
{
    Router::new()
        .route("/api/v1/villa/calendar", get(calendar_handler::<A, C, G>))
        .route("/api/v1/booking/quote", post(quote_handler::<A, C, G>))
        .route("/api/v1/bookings", post(booking_handler::<A, C, G>))
        .with_state(desk)
}

#[derive(Debug, Deserialize)]
pub(crate) struct CalendarQuery {
    pub(crate) from: NaiveDate,
    pub(crate) to: NaiveDate,
}

#[derive(Debug, Deserialize)]
pub(crate) struct QuoteRequest {
    pub(crate) check_in: NaiveDate,
    pub(crate) check_out: NaiveDate,
    #[serde(default)]
    pub(crate) promo_code: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct BookingSubmission {
    pub(crate) check_in: NaiveDate,
    pub(crate) check_out: NaiveDate,
    #[serde(default)]
    pub(crate) promo_code: Option<String>,
    pub(crate) guest: GuestDraft,
}

pub(crate) async fn calendar_handler<A, C, G>(
    State(desk): State<Arc<BookingDesk<A, C, G>>>,
    Query(query): Query<CalendarQuery>,
) -> Response
where
    A: AvailabilitySource + 'static,
    C: PromoCatalog + 'static,
    G: SubmissionGateway + 'static,
{
    match desk.calendar(query.from, query.to) {
        Ok(dates) => (StatusCode::OK, axum::Json(dates)).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn quote_handler<A, C, G>(
    State(desk): State<Arc<BookingDesk<A, C, G>>>,
    axum::Json(request): axum::Json<QuoteRequest>,
) -> Response
where
    A: AvailabilitySource + 'static,
    C: PromoCatalog + 'static,
    G: SubmissionGateway + 'static,
{
    let today = desk.today();
    let stay = StayRequest {
        check_in: request.check_in,
        check_out: request.check_out,
        promo_code: request.promo_code,
    };

    match desk.quote(&stay, today) {
        Ok(quote) => (StatusCode::OK, axum::Json(quote)).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn booking_handler<A, C, G>(
    State(desk): State<Arc<BookingDesk<A, C, G>>>,
    axum::Json(submission): axum::Json<BookingSubmission>,
) -> Response
where
    A: AvailabilitySource + 'static,
    C: PromoCatalog + 'static,
    G: SubmissionGateway + 'static,
{
    let today = desk.today();
    let stay = StayRequest {
        check_in: submission.check_in,
        check_out: submission.check_out,
        promo_code: submission.promo_code,
    };

    match desk.book(&stay, submission.guest, today).await {
        Ok(confirmation) => (StatusCode::CREATED, axum::Json(confirmation)).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) fn status_for(error: &WorkflowError) -> StatusCode {
    match error {
        WorkflowError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
        WorkflowError::Promo(PromoError::InvalidCode { .. }) => StatusCode::UNPROCESSABLE_ENTITY,
        WorkflowError::Promo(PromoError::Catalog(_)) => StatusCode::SERVICE_UNAVAILABLE,
        WorkflowError::DateSelection(DateSelectionError::Unavailable { .. }) => {
            StatusCode::CONFLICT
        }
        WorkflowError::DateSelection(DateSelectionError::Availability(err))
        | WorkflowError::Availability(err) => match err {
            AvailabilityError::InvalidRange { .. } | AvailabilityError::RangeTooLong { .. } => {
                StatusCode::BAD_REQUEST
            }
            AvailabilityError::Unavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
        },
        WorkflowError::Submission(SubmissionError::Timeout { .. }) => StatusCode::GATEWAY_TIMEOUT,
        WorkflowError::Submission(_) => StatusCode::BAD_GATEWAY,
        WorkflowError::InvalidTransition { .. } => StatusCode::CONFLICT,
    }
}

fn error_response(error: WorkflowError) -> Response {
    let status = status_for(&error);
    let payload = json!({
        "error": error.to_string(),
    });
    (status, axum::Json(payload)).into_response()
}
