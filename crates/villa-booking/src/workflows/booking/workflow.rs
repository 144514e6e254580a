use std::sync::Arc;
use std::time::Duration;

use chrono::NaiveDate;
use tracing::{debug, info, warn};

use super::availability::{AvailabilityError, AvailabilitySource};
use super::dates::{DateRangeSelector, DateSelectionError};
use super::domain::{
    BookingReference, BookingRequest, BookingStep, CalendarDate, DateRange, GuestDraft,
    PromoCode, ValidationError, VillaListing,
};
use super::gateway::{SubmissionError, SubmissionGateway};
use super::promo::{normalize_code, PromoCatalog, PromoError, PromoNotice, PromoResolver};
use super::session::BookingSession;
use super::summary::BookingSummary;

pub const DEFAULT_SUBMISSION_TIMEOUT: Duration = Duration::from_secs(5);

/// Error raised by the booking workflow. None of these leave the session inconsistent.
#[derive(Debug, thiserror::Error)]
pub enum WorkflowError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    DateSelection(#[from] DateSelectionError),
    #[error(transparent)]
    Availability(#[from] AvailabilityError),
    #[error(transparent)]
    Promo(#[from] PromoError),
    #[error(transparent)]
    Submission(#[from] SubmissionError),
    #[error("cannot {action} on the {} step", .step.label())]
    InvalidTransition {
        step: BookingStep,
        action: &'static str,
    },
}

/// Three-step booking state machine: dates, promo, guest info, then handoff.
pub struct BookingWorkflow<A, C, G> {
    listing: VillaListing,
    selector: DateRangeSelector<A>,
    promos: PromoResolver<C>,
    gateway: Arc<G>,
    submission_timeout: Duration,
    session: BookingSession,
}

impl<A, C, G> BookingWorkflow<A, C, G>
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
        let session = BookingSession::new(listing.nightly_rate);
        Self {
            listing,
            selector: DateRangeSelector::new(availability),
            promos: PromoResolver::new(catalog),
            gateway,
            submission_timeout: DEFAULT_SUBMISSION_TIMEOUT,
            session,
        }
    }

    pub fn with_submission_timeout(mut self, timeout: Duration) -> Self {
        self.submission_timeout = timeout;
        self
    }

    pub fn listing(&self) -> &VillaListing {
        &self.listing
    }

    pub fn session(&self) -> &BookingSession {
        &self.session
    }

    pub fn step(&self) -> BookingStep {
        self.session.step()
    }

    pub fn summary(&self) -> Option<BookingSummary> {
        BookingSummary::from_session(&self.listing, &self.session)
    }

    pub fn calendar(
        &self,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Vec<CalendarDate>, WorkflowError> {
        Ok(self.selector.calendar(from, to)?)
    }

    pub fn select_date(&mut self, candidate: NaiveDate) -> Result<DateRange, WorkflowError> {
        self.require_step(BookingStep::Dates, "select dates")?;

        let range = self
            .selector
            .select_date(self.session.dates(), candidate)
            .map_err(|err| {
                warn!(%candidate, error = %err, "date selection refused");
                err
            })?;
        self.session.set_dates(range).map_err(|err| {
            warn!(%candidate, error = %err, "date range cannot be priced");
            err
        })?;
        debug!(check_in = ?range.check_in(), check_out = ?range.check_out(), "date range updated");

        Ok(range)
    }

    pub fn continue_to_promo(&mut self) -> Result<BookingStep, WorkflowError> {
        self.require_step(BookingStep::Dates, "continue to promo")?;

        if !self.session.dates().is_complete() {
            return Err(ValidationError::MissingDates.into());
        }
        if self.session.nights() <= 0 {
            return Err(ValidationError::NonPositiveNights.into());
        }

        self.session.refresh_pricing()?;
        Ok(self.move_to(BookingStep::Promo))
    }

    /// Resolve `code` and apply it. A failed attempt clears any promo applied earlier.
    pub fn apply_promo(&mut self, code: &str, today: NaiveDate) -> Result<PromoCode, WorkflowError> {
        self.require_step(BookingStep::Promo, "apply a promo code")?;

        match self.promos.resolve(code, today) {
            Ok(promo) => {
                info!(code = %promo.code, discount = promo.discount_percentage, "promo applied");
                self.session.apply_promo(promo.clone())?;
                Ok(promo)
            }
            Err(err) => {
                warn!(code = %normalize_code(code), error = %err, "promo rejected");
                self.session
                    .reject_promo(normalize_code(code), PromoNotice::rejected(&err))?;
                Err(err.into())
            }
        }
    }

    pub fn remove_promo(&mut self) -> Result<(), WorkflowError> {
        self.require_open("remove a promo code")?;
        self.session.clear_promo()?;
        Ok(())
    }

    pub fn continue_to_info(&mut self) -> Result<BookingStep, WorkflowError> {
        self.require_step(BookingStep::Promo, "continue to guest info")?;
        Ok(self.move_to(BookingStep::Info))
    }

    /// Leave the promo step without entering a code; any promo already applied stays.
    pub fn skip_promo(&mut self) -> Result<BookingStep, WorkflowError> {
        self.require_step(BookingStep::Promo, "skip the promo step")?;
        Ok(self.move_to(BookingStep::Info))
    }

    pub fn back(&mut self) -> Result<BookingStep, WorkflowError> {
        let previous = match self.session.step() {
            BookingStep::Info => BookingStep::Promo,
            BookingStep::Promo => BookingStep::Dates,
            step => {
                return Err(WorkflowError::InvalidTransition {
                    step,
                    action: "go back",
                })
            }
        };
        Ok(self.move_to(previous))
    }

    pub fn update_guest(&mut self, draft: GuestDraft) -> Result<(), WorkflowError> {
        self.require_step(BookingStep::Info, "edit guest details")?;
        self.session.set_guest_draft(draft);
        Ok(())
    }

    /// Validate the guest draft and hand the booking to the gateway.
    ///
    /// The session stays on `Info` until the gateway answers; any failure,
    /// including a timeout, leaves it there with the draft intact for a retry.
    /// The guest is committed only once the gateway returns a reference.
    pub async fn submit(&mut self) -> Result<BookingReference, WorkflowError> {
        self.require_step(BookingStep::Info, "submit the booking")?;

        let guest = self
            .session
            .guest_draft()
            .commit(self.listing.max_guests)
            .map_err(|err| {
                warn!(error = %err, "guest details incomplete");
                err
            })?;
        let (check_in, check_out) = self
            .session
            .dates()
            .bounds()
            .ok_or(ValidationError::MissingDates)?;
        let nights = u32::try_from(self.session.nights())
            .ok()
            .filter(|nights| *nights > 0)
            .ok_or(ValidationError::NonPositiveNights)?;

        self.session.refresh_pricing()?;

        let promo = self.session.applied_promo();
        let request = BookingRequest {
            villa_id: self.listing.id.clone(),
            check_in,
            check_out,
            nights,
            guest: guest.clone(),
            pricing: *self.session.pricing(),
            promo_code: promo.map(|promo| promo.code.clone()),
            affiliate_id: promo.and_then(|promo| promo.affiliate_id.clone()),
        };

        info!(
            villa = %request.villa_id,
            %check_in,
            %check_out,
            nights,
            final_price = request.pricing.final_price,
            "submitting booking request"
        );

        let reference =
            match tokio::time::timeout(self.submission_timeout, self.gateway.submit(request)).await
            {
                Ok(Ok(reference)) => reference,
                Ok(Err(err)) => {
                    warn!(error = %err, "booking submission failed");
                    return Err(err.into());
                }
                Err(_) => {
                    let err = SubmissionError::Timeout {
                        after_ms: self.submission_timeout.as_millis() as u64,
                    };
                    warn!(error = %err, "booking submission timed out");
                    return Err(err.into());
                }
            };

        info!(reference = %reference, "booking handed off");
        self.session.complete(reference.clone(), guest);
        Ok(reference)
    }

    /// Zero every piece of session state and return to date selection.
    pub fn reset_booking(&mut self) {
        self.session.reset();
        info!("booking session reset");
    }

    fn move_to(&mut self, step: BookingStep) -> BookingStep {
        debug!(from = ?self.session.step(), to = ?step, "booking step changed");
        self.session.set_step(step);
        step
    }

    fn require_step(&self, expected: BookingStep, action: &'static str) -> Result<(), WorkflowError> {
        let step = self.session.step();
        if step == expected {
            Ok(())
        } else {
            Err(WorkflowError::InvalidTransition { step, action })
        }
    }

    fn require_open(&self, action: &'static str) -> Result<(), WorkflowError> {
        match self.session.step() {
            BookingStep::Handoff => Err(WorkflowError::InvalidTransition {
                step: BookingStep::Handoff,
                action,
            }),
            _ => Ok(()),
        }
    }
}
