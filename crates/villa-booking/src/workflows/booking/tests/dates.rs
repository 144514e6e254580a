use super::common::*;
use std::sync::Arc;

use crate::workflows::booking::availability::AvailabilityError;
use crate::workflows::booking::dates::{advance_range, DateRangeSelector, DateSelectionError};
use crate::workflows::booking::domain::{DateRange, DateStatus};

#[test]
fn first_selection_sets_check_in_only() {
    let range = advance_range(&DateRange::empty(), june(1));
    assert_eq!(range, DateRange::starting(june(1)));
}

#[test]
fn later_candidate_closes_an_open_range() {
    let range = advance_range(&DateRange::starting(june(1)), june(4));
    assert_eq!(range.bounds(), Some((june(1), june(4))));
    assert_eq!(range.nights(), 3);
}

#[test]
fn earlier_or_equal_candidate_restarts_the_range() {
    let open = DateRange::starting(june(5));

    let earlier = advance_range(&open, june(3));
    assert_eq!(earlier, DateRange::starting(june(3)));

    let same_day = advance_range(&open, june(5));
    assert_eq!(same_day, DateRange::starting(june(5)));

    // Repeating the correction changes nothing further.
    assert_eq!(advance_range(&open, june(3)), earlier);
}

#[test]
fn selection_after_complete_range_starts_over() {
    let complete = DateRange::stay(june(1), june(4)).expect("ordered stay");
    let range = advance_range(&complete, june(20));
    assert_eq!(range, DateRange::starting(june(20)));
}

#[test]
fn selector_refuses_booked_and_blocked_days() {
    let selector = DateRangeSelector::new(Arc::new(calendar()));
    let current = DateRange::starting(june(8));

    match selector.select_date(&current, june(10)) {
        Err(DateSelectionError::Unavailable { date, status }) => {
            assert_eq!(date, june(10));
            assert_eq!(status, DateStatus::Booked);
        }
        other => panic!("expected booked date to be refused, got {other:?}"),
    }

    assert!(matches!(
        selector.select_date(&current, june(12)),
        Err(DateSelectionError::Unavailable {
            status: DateStatus::Blocked,
            ..
        })
    ));

    let range = selector
        .select_date(&current, june(11))
        .expect("open day selectable");
    assert_eq!(range.bounds(), Some((june(8), june(11))));
}

#[test]
fn selector_exposes_calendar_window() {
    let selector = DateRangeSelector::new(Arc::new(calendar()));
    let days = selector.calendar(june(9), june(12)).expect("valid window");

    assert_eq!(days.len(), 4);
    assert_eq!(days[1].status, DateStatus::Booked);
    assert_eq!(days[1].booking_id.as_deref(), Some("BK-0042"));
    assert_eq!(days[3].status, DateStatus::Blocked);

    assert!(matches!(
        selector.calendar(june(12), june(9)),
        Err(AvailabilityError::InvalidRange { .. })
    ));
}
