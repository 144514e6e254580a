//! Villa booking workflow: date selection, promo resolution, pricing, and
//! handoff of the finished reservation to a submission gateway.

pub mod availability;
pub mod calendar_import;
pub mod dates;
pub mod domain;
pub mod gateway;
pub mod pricing;
pub mod promo;
pub mod router;
pub mod service;
mod session;
pub mod summary;
mod workflow;

#[cfg(test)]
mod tests;

pub use availability::{
    check_calendar_range, AvailabilityError, AvailabilitySource, CalendarAvailability,
    MAX_CALENDAR_SPAN_DAYS,
};
pub use calendar_import::{CalendarImportError, CalendarImporter};
pub use dates::{advance_range, DateRangeSelector, DateSelectionError};
pub use domain::{
    BookingReference, BookingRequest, BookingStep, CalendarDate, DateRange, DateStatus,
    GuestDraft, GuestInfo, PromoCode, ValidationError, VillaListing,
};
pub use gateway::{SubmissionError, SubmissionGateway};
pub use pricing::{compute_pricing, format_amount, format_currency, PricingSnapshot};
pub use promo::{
    CatalogError, InMemoryPromoCatalog, PromoCatalog, PromoError, PromoNotice, PromoResolver,
};
pub use router::booking_router;
pub use service::{
    local_today, BookingConfirmation, BookingDesk, BookingQuote, Clock, StayRequest,
};
pub use session::BookingSession;
pub use summary::{BookingSummary, PriceLine};
pub use workflow::{BookingWorkflow, WorkflowError, DEFAULT_SUBMISSION_TIMEOUT};
