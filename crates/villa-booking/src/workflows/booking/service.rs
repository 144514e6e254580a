use std::sync::Arc;
use std::time::Duration;

use chrono::{Local, NaiveDate};
use serde::Serialize;

use super::availability::{check_calendar_range, AvailabilitySource};
use super::domain::{BookingReference, CalendarDate, GuestDraft, ValidationError, VillaListing};
use super::gateway::SubmissionGateway;
use super::promo::{PromoCatalog, PromoNotice};
use super::summary::BookingSummary;
use super::workflow::{BookingWorkflow, WorkflowError, DEFAULT_SUBMISSION_TIMEOUT};

/// Source of the current date for promo redemption windows.
pub type Clock = fn() -> NaiveDate;

/// Server-local calendar day.
pub fn local_today() -> NaiveDate {
    Local::now().date_naive()
}

/// Front desk for one villa: shares the collaborators and opens a fresh
/// workflow for every booking session.
pub struct BookingDesk<A, C, G> {
    listing: VillaListing,
    availability: Arc<A>,
    catalog: Arc<C>,
    gateway: Arc<G>,
    submission_timeout: Duration,
    clock: Clock,
}

/// Stay and optional code as entered on the booking form.
#[derive(Debug, Clone)]
pub struct StayRequest {
    pub check_in: NaiveDate,
    pub check_out: NaiveDate,
    pub promo_code: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct BookingQuote {
    pub summary: BookingSummary,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub promo_notice: Option<PromoNotice>,
}

#[derive(Debug, Clone, Serialize)]
pub struct BookingConfirmation {
    pub booking_reference: BookingReference,
    pub summary: BookingSummary,
}

impl<A, C, G> BookingDesk<A, C, G>
where
    A: AvailabilitySource + 'static,
    C: PromoCatalog + 'static,
    G: SubmissionGateway + 'static,
{
    pub fn new(
        listing: VillaListing,
        availability: Arc<A>,
        catalog: Arc<C>,
        gateway: Arc<G>,
    ) -> Self {
        Self {
            listing,
            availability,
            catalog,
            gateway,
            submission_timeout: DEFAULT_SUBMISSION_TIMEOUT,
            clock: local_today,
        }
    }

    pub fn with_submission_timeout(mut self, timeout: Duration) -> Self {
        self.submission_timeout = timeout;
        self
    }

    pub fn with_clock(mut self, clock: Clock) -> Self {
        self.clock = clock;
        self
    }

    /// Date promo windows are checked against on the HTTP routes.
    pub fn today(&self) -> NaiveDate {
        (self.clock)()
    }

    pub fn listing(&self) -> &VillaListing {
        &self.listing
    }

    pub fn start_session(&self) -> BookingWorkflow<A, C, G> {
        BookingWorkflow::new(
            self.listing.clone(),
            self.availability.clone(),
            self.catalog.clone(),
            self.gateway.clone(),
        )
        .with_submission_timeout(self.submission_timeout)
    }

    pub fn calendar(
        &self,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Vec<CalendarDate>, WorkflowError> {
        check_calendar_range(from, to)?;
        Ok(self.availability.list_dates(from, to)?)
    }

    /// Price a stay without submitting it. A rejected code is reported in the
    /// notice and the quote is returned undiscounted.
    pub fn quote(&self, stay: &StayRequest, today: NaiveDate) -> Result<BookingQuote, WorkflowError> {
        let mut workflow = self.start_session();
        let promo_notice = prepare_stay(&mut workflow, stay, today, PromoPolicy::Lenient)?;
        let summary = workflow
            .summary()
            .ok_or(WorkflowError::Validation(ValidationError::MissingDates))?;

        Ok(BookingQuote {
            summary,
            promo_notice,
        })
    }

    /// Run a whole booking in one pass. Unlike [`quote`](Self::quote), an
    /// invalid promo code stops the booking so the guest is never charged a
    /// price they did not expect.
    pub async fn book(
        &self,
        stay: &StayRequest,
        guest: GuestDraft,
        today: NaiveDate,
    ) -> Result<BookingConfirmation, WorkflowError> {
        let mut workflow = self.start_session();
        prepare_stay(&mut workflow, stay, today, PromoPolicy::Strict)?;
        workflow.continue_to_info()?;
        workflow.update_guest(guest)?;
        let booking_reference = workflow.submit().await?;
        let summary = workflow
            .summary()
            .ok_or(WorkflowError::Validation(ValidationError::MissingDates))?;

        Ok(BookingConfirmation {
            booking_reference,
            summary,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PromoPolicy {
    Lenient,
    Strict,
}

fn prepare_stay<A, C, G>(
    workflow: &mut BookingWorkflow<A, C, G>,
    stay: &StayRequest,
    today: NaiveDate,
    policy: PromoPolicy,
) -> Result<Option<PromoNotice>, WorkflowError>
where
    A: AvailabilitySource + 'static,
    C: PromoCatalog + 'static,
    G: SubmissionGateway + 'static,
{
    if stay.check_out <= stay.check_in {
        return Err(ValidationError::InvalidDateOrder {
            check_in: stay.check_in,
            check_out: stay.check_out,
        }
        .into());
    }

    workflow.select_date(stay.check_in)?;
    workflow.select_date(stay.check_out)?;
    workflow.continue_to_promo()?;

    let code = stay
        .promo_code
        .as_deref()
        .map(str::trim)
        .filter(|code| !code.is_empty());
    if let Some(code) = code {
        match workflow.apply_promo(code, today) {
            Ok(_) => {}
            Err(WorkflowError::Promo(_)) if policy == PromoPolicy::Lenient => {}
            Err(err) => return Err(err),
        }
    }

    Ok(workflow.session().promo_notice().cloned())
}
