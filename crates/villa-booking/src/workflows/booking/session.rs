use serde::Serialize;

use super::domain::{
    BookingReference, BookingStep, DateRange, GuestDraft, GuestInfo, PromoCode, ValidationError,
};
use super::pricing::{compute_pricing, PricingSnapshot};
use super::promo::PromoNotice;

/// State of one guest's booking, passed explicitly through the workflow.
///
/// Pricing is re-derived inside every setter that touches the range or the
/// applied promo, so readers never observe a stale snapshot for a complete range.
/// The committed guest stays empty until the gateway accepts the booking.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BookingSession {
    nightly_rate: u64,
    step: BookingStep,
    dates: DateRange,
    promo_input: String,
    applied_promo: Option<PromoCode>,
    promo_notice: Option<PromoNotice>,
    guest_draft: GuestDraft,
    guest: Option<GuestInfo>,
    pricing: PricingSnapshot,
    reference: Option<BookingReference>,
}

impl BookingSession {
    pub fn new(nightly_rate: u64) -> Self {
        Self {
            nightly_rate,
            step: BookingStep::Dates,
            dates: DateRange::empty(),
            promo_input: String::new(),
            applied_promo: None,
            promo_notice: None,
            guest_draft: GuestDraft::default(),
            guest: None,
            pricing: PricingSnapshot::zero(),
            reference: None,
        }
    }

    pub fn nightly_rate(&self) -> u64 {
        self.nightly_rate
    }

    pub fn step(&self) -> BookingStep {
        self.step
    }

    pub fn dates(&self) -> &DateRange {
        &self.dates
    }

    pub fn promo_input(&self) -> &str {
        &self.promo_input
    }

    pub fn applied_promo(&self) -> Option<&PromoCode> {
        self.applied_promo.as_ref()
    }

    pub fn promo_notice(&self) -> Option<&PromoNotice> {
        self.promo_notice.as_ref()
    }

    pub fn guest_draft(&self) -> &GuestDraft {
        &self.guest_draft
    }

    pub fn guest(&self) -> Option<&GuestInfo> {
        self.guest.as_ref()
    }

    pub fn pricing(&self) -> &PricingSnapshot {
        &self.pricing
    }

    pub fn reference(&self) -> Option<&BookingReference> {
        self.reference.as_ref()
    }

    pub fn nights(&self) -> i64 {
        self.dates.nights()
    }

    pub(crate) fn set_step(&mut self, step: BookingStep) {
        self.step = step;
    }

    /// Reprices before storing `dates`; an unpriceable range leaves the session untouched.
    pub(crate) fn set_dates(&mut self, dates: DateRange) -> Result<(), ValidationError> {
        let snapshot = compute_pricing(&dates, self.nightly_rate, self.applied_promo.as_ref())?;
        self.dates = dates;
        self.store_pricing(snapshot);
        Ok(())
    }

    pub(crate) fn apply_promo(&mut self, promo: PromoCode) -> Result<(), ValidationError> {
        let snapshot = compute_pricing(&self.dates, self.nightly_rate, Some(&promo))?;
        self.promo_notice = Some(PromoNotice::applied(&promo));
        self.promo_input = promo.code.clone();
        self.applied_promo = Some(promo);
        self.store_pricing(snapshot);
        Ok(())
    }

    pub(crate) fn reject_promo(
        &mut self,
        code: String,
        notice: PromoNotice,
    ) -> Result<(), ValidationError> {
        let snapshot = compute_pricing(&self.dates, self.nightly_rate, None)?;
        self.promo_input = code;
        self.promo_notice = Some(notice);
        self.applied_promo = None;
        self.store_pricing(snapshot);
        Ok(())
    }

    pub(crate) fn clear_promo(&mut self) -> Result<(), ValidationError> {
        let snapshot = compute_pricing(&self.dates, self.nightly_rate, None)?;
        self.promo_input.clear();
        self.promo_notice = None;
        self.applied_promo = None;
        self.store_pricing(snapshot);
        Ok(())
    }

    pub(crate) fn set_guest_draft(&mut self, draft: GuestDraft) {
        self.guest_draft = draft;
    }

    /// Record the accepted handoff. The guest is committed only here.
    pub(crate) fn complete(&mut self, reference: BookingReference, guest: GuestInfo) {
        self.guest = Some(guest);
        self.reference = Some(reference);
        self.step = BookingStep::Handoff;
    }

    /// Back to an untouched session for the same villa.
    pub(crate) fn reset(&mut self) {
        *self = Self::new(self.nightly_rate);
    }

    pub(crate) fn refresh_pricing(&mut self) -> Result<(), ValidationError> {
        let snapshot =
            compute_pricing(&self.dates, self.nightly_rate, self.applied_promo.as_ref())?;
        self.store_pricing(snapshot);
        Ok(())
    }

    // An open or empty range leaves the last snapshot in place.
    fn store_pricing(&mut self, snapshot: Option<PricingSnapshot>) {
        if let Some(snapshot) = snapshot {
            self.pricing = snapshot;
        }
    }
}
