use std::collections::BTreeMap;

use chrono::NaiveDate;

use super::domain::{CalendarDate, DateStatus};

/// Source of per-day availability for the villa.
pub trait AvailabilitySource: Send + Sync {
    /// Every day in `[from, to]`, inclusive.
    fn list_dates(&self, from: NaiveDate, to: NaiveDate)
        -> Result<Vec<CalendarDate>, AvailabilityError>;

    fn status_on(&self, date: NaiveDate) -> Result<DateStatus, AvailabilityError> {
        let status = self
            .list_dates(date, date)?
            .into_iter()
            .find(|entry| entry.date == date)
            .map(|entry| entry.status)
            .unwrap_or(DateStatus::Available);
        Ok(status)
    }
}

/// Longest inclusive span a single calendar listing may cover.
pub const MAX_CALENDAR_SPAN_DAYS: i64 = 366;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AvailabilityError {
    #[error("calendar range is inverted ({from} after {to})")]
    InvalidRange { from: NaiveDate, to: NaiveDate },
    #[error("calendar range {from} to {to} covers more than {max_days} days")]
    RangeTooLong {
        from: NaiveDate,
        to: NaiveDate,
        max_days: i64,
    },
    #[error("availability source unavailable: {0}")]
    Unavailable(String),
}

/// Check that `[from, to]` is ordered and no longer than [`MAX_CALENDAR_SPAN_DAYS`].
pub fn check_calendar_range(from: NaiveDate, to: NaiveDate) -> Result<(), AvailabilityError> {
    if from > to {
        return Err(AvailabilityError::InvalidRange { from, to });
    }
    if (to - from).num_days() + 1 > MAX_CALENDAR_SPAN_DAYS {
        return Err(AvailabilityError::RangeTooLong {
            from,
            to,
            max_days: MAX_CALENDAR_SPAN_DAYS,
        });
    }
    Ok(())
}

/// In-memory calendar. Days without an entry are open.
#[derive(Debug, Clone, Default)]
pub struct CalendarAvailability {
    entries: BTreeMap<NaiveDate, CalendarDate>,
}

impl CalendarAvailability {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_entries<I>(entries: I) -> Self
    where
        I: IntoIterator<Item = CalendarDate>,
    {
        let mut calendar = Self::new();
        for entry in entries {
            calendar.insert(entry);
        }
        calendar
    }

    /// Later entries for the same day replace earlier ones.
    pub fn insert(&mut self, entry: CalendarDate) {
        self.entries.insert(entry.date, entry);
    }

    pub fn book(&mut self, date: NaiveDate, booking_id: impl Into<String>) {
        let entry = self.entry(date);
        entry.status = DateStatus::Booked;
        entry.booking_id = Some(booking_id.into());
    }

    pub fn block(&mut self, date: NaiveDate) {
        let entry = self.entry(date);
        entry.status = DateStatus::Blocked;
        entry.booking_id = None;
    }

    pub fn set_price(&mut self, date: NaiveDate, price: u64) {
        self.entry(date).price = Some(price);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn entry(&mut self, date: NaiveDate) -> &mut CalendarDate {
        self.entries
            .entry(date)
            .or_insert_with(|| CalendarDate::available(date))
    }
}

impl AvailabilitySource for CalendarAvailability {
    fn list_dates(
        &self,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Vec<CalendarDate>, AvailabilityError> {
        check_calendar_range(from, to)?;

        Ok(from
            .iter_days()
            .take_while(|day| *day <= to)
            .map(|day| {
                self.entries
                    .get(&day)
                    .cloned()
                    .unwrap_or_else(|| CalendarDate::available(day))
            })
            .collect())
    }

    fn status_on(&self, date: NaiveDate) -> Result<DateStatus, AvailabilityError> {
        Ok(self
            .entries
            .get(&date)
            .map(|entry| entry.status)
            .unwrap_or(DateStatus::Available))
    }
}
