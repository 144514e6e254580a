use std::sync::Arc;

use chrono::NaiveDate;

use super::availability::{check_calendar_range, AvailabilityError, AvailabilitySource};
use super::domain::{CalendarDate, DateRange, DateStatus};

/// Click-to-select rule for the stay calendar.
///
/// A fresh or already complete range restarts at `candidate`. An open range
/// closes on any later day; an earlier or equal day restarts it instead.
pub fn advance_range(current: &DateRange, candidate: NaiveDate) -> DateRange {
    match (current.check_in(), current.check_out()) {
        (Some(check_in), None) if candidate > check_in => {
            DateRange::stay(check_in, candidate).unwrap_or_else(|_| DateRange::starting(candidate))
        }
        _ => DateRange::starting(candidate),
    }
}

#[derive(Debug, thiserror::Error)]
pub enum DateSelectionError {
    #[error("{date} cannot be selected: already {}", .status.label())]
    Unavailable { date: NaiveDate, status: DateStatus },
    #[error(transparent)]
    Availability(#[from] AvailabilityError),
}

/// Applies [`advance_range`] after checking the day with the availability source.
pub struct DateRangeSelector<A> {
    availability: Arc<A>,
}

impl<A> DateRangeSelector<A>
where
    A: AvailabilitySource + 'static,
{
    pub fn new(availability: Arc<A>) -> Self {
        Self { availability }
    }

    pub fn select_date(
        &self,
        current: &DateRange,
        candidate: NaiveDate,
    ) -> Result<DateRange, DateSelectionError> {
        let status = self.availability.status_on(candidate)?;
        if !status.is_selectable() {
            return Err(DateSelectionError::Unavailable {
                date: candidate,
                status,
            });
        }

        Ok(advance_range(current, candidate))
    }

    pub fn calendar(
        &self,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Vec<CalendarDate>, AvailabilityError> {
        check_calendar_range(from, to)?;
        self.availability.list_dates(from, to)
    }
}
