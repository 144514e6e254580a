use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::pricing::PricingSnapshot;

/// Upper bound on party size for a single villa booking.
pub const MAX_GUESTS_PER_BOOKING: u8 = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BookingStep {
    Dates,
    Promo,
    Info,
    Handoff,
}

impl BookingStep {
    pub const fn ordered() -> [Self; 4] {
        [Self::Dates, Self::Promo, Self::Info, Self::Handoff]
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Dates => "Select Dates",
            Self::Promo => "Promo Code",
            Self::Info => "Guest Info",
            Self::Handoff => "Handoff",
        }
    }
}

/// Villa being booked; its nightly rate is the base price for every quote.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VillaListing {
    pub id: String,
    pub name: String,
    pub nightly_rate: u64,
    pub max_guests: u8,
}

/// Check-in/check-out selection. When both ends are set, check-out is strictly after check-in.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct DateRange {
    check_in: Option<NaiveDate>,
    check_out: Option<NaiveDate>,
}

impl DateRange {
    pub const fn empty() -> Self {
        Self {
            check_in: None,
            check_out: None,
        }
    }

    pub const fn starting(check_in: NaiveDate) -> Self {
        Self {
            check_in: Some(check_in),
            check_out: None,
        }
    }

    pub fn stay(check_in: NaiveDate, check_out: NaiveDate) -> Result<Self, ValidationError> {
        if check_out <= check_in {
            return Err(ValidationError::InvalidDateOrder {
                check_in,
                check_out,
            });
        }

        Ok(Self {
            check_in: Some(check_in),
            check_out: Some(check_out),
        })
    }

    pub fn check_in(&self) -> Option<NaiveDate> {
        self.check_in
    }

    pub fn check_out(&self) -> Option<NaiveDate> {
        self.check_out
    }

    pub fn is_complete(&self) -> bool {
        self.check_in.is_some() && self.check_out.is_some()
    }

    pub fn bounds(&self) -> Option<(NaiveDate, NaiveDate)> {
        self.check_in.zip(self.check_out)
    }

    /// Whole days between check-in and check-out, zero while the range is open.
    pub fn nights(&self) -> i64 {
        match self.bounds() {
            Some((check_in, check_out)) => (check_out - check_in).num_days().max(0),
            None => 0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DateStatus {
    Available,
    Booked,
    Blocked,
}

impl DateStatus {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Available => "available",
            Self::Booked => "booked",
            Self::Blocked => "blocked",
        }
    }

    pub const fn is_selectable(self) -> bool {
        matches!(self, Self::Available)
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "available" => Some(Self::Available),
            "booked" => Some(Self::Booked),
            "blocked" => Some(Self::Blocked),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalendarDate {
    pub date: NaiveDate,
    pub status: DateStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub booking_id: Option<String>,
}

impl CalendarDate {
    pub fn available(date: NaiveDate) -> Self {
        Self {
            date,
            status: DateStatus::Available,
            price: None,
            booking_id: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PromoCode {
    pub code: String,
    pub discount_percentage: u8,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub affiliate_id: Option<String>,
    pub valid_from: NaiveDate,
    pub valid_until: NaiveDate,
    pub is_active: bool,
}

impl PromoCode {
    pub fn is_redeemable_on(&self, today: NaiveDate) -> bool {
        self.is_active && self.valid_from <= today && today <= self.valid_until
    }
}

/// Guest form as typed; nothing here is validated until the workflow commits it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GuestDraft {
    #[serde(default)]
    pub full_name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub id_number: String,
    #[serde(default = "default_guest_count")]
    pub number_of_guests: u8,
    #[serde(default)]
    pub special_requests: String,
}

fn default_guest_count() -> u8 {
    1
}

impl Default for GuestDraft {
    fn default() -> Self {
        Self {
            full_name: String::new(),
            email: String::new(),
            phone: String::new(),
            id_number: String::new(),
            number_of_guests: default_guest_count(),
            special_requests: String::new(),
        }
    }
}

impl GuestDraft {
    /// Validate the draft and freeze it into the committed guest record.
    pub fn commit(&self, max_guests: u8) -> Result<GuestInfo, ValidationError> {
        let required = [
            ("full name", self.full_name.trim()),
            ("email", self.email.trim()),
            ("phone", self.phone.trim()),
            ("ID number", self.id_number.trim()),
        ];
        let missing: Vec<&'static str> = required
            .iter()
            .filter(|(_, value)| value.is_empty())
            .map(|(field, _)| *field)
            .collect();
        if !missing.is_empty() {
            return Err(ValidationError::MissingGuestFields(missing));
        }

        let email = self.email.trim();
        if !email.contains('@') {
            return Err(ValidationError::InvalidEmail(email.to_string()));
        }

        let max = max_guests.min(MAX_GUESTS_PER_BOOKING);
        if self.number_of_guests == 0 || self.number_of_guests > max {
            return Err(ValidationError::GuestCount {
                requested: self.number_of_guests,
                max,
            });
        }

        let special_requests = Some(self.special_requests.trim())
            .filter(|value| !value.is_empty())
            .map(str::to_string);

        Ok(GuestInfo {
            full_name: self.full_name.trim().to_string(),
            email: email.to_string(),
            phone: self.phone.trim().to_string(),
            id_number: self.id_number.trim().to_string(),
            number_of_guests: self.number_of_guests,
            special_requests,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GuestInfo {
    pub full_name: String,
    pub email: String,
    pub phone: String,
    pub id_number: String,
    pub number_of_guests: u8,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub special_requests: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BookingReference(pub String);

impl std::fmt::Display for BookingReference {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Finalized payload handed to the submission gateway.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookingRequest {
    pub villa_id: String,
    pub check_in: NaiveDate,
    pub check_out: NaiveDate,
    pub nights: u32,
    pub guest: GuestInfo,
    pub pricing: PricingSnapshot,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub promo_code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub affiliate_id: Option<String>,
}

/// Input problems the guest can correct in place.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("please select check-in and check-out dates")]
    MissingDates,
    #[error("check-out {check_out} must be after check-in {check_in}")]
    InvalidDateOrder {
        check_in: NaiveDate,
        check_out: NaiveDate,
    },
    #[error("stay must cover at least one night")]
    NonPositiveNights,
    #[error("please fill in all required fields: {}", .0.join(", "))]
    MissingGuestFields(Vec<&'static str>),
    #[error("'{0}' is not a valid email address")]
    InvalidEmail(String),
    #[error("number of guests must be between 1 and {max} (requested {requested})")]
    GuestCount { requested: u8, max: u8 },
    #[error("a {nights}-night stay exceeds the largest bookable total")]
    PriceOverflow { nights: i64 },
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 6, day).expect("valid date")
    }

    fn filled_draft() -> GuestDraft {
        GuestDraft {
            full_name: " Ayu Lestari ".to_string(),
            email: "ayu@example.com".to_string(),
            phone: "+62 812 0000 1111".to_string(),
            id_number: "3171234567890001".to_string(),
            number_of_guests: 4,
            special_requests: "   ".to_string(),
        }
    }

    #[test]
    fn stay_rejects_non_increasing_dates() {
        assert_eq!(
            DateRange::stay(date(4), date(4)),
            Err(ValidationError::InvalidDateOrder {
                check_in: date(4),
                check_out: date(4),
            })
        );
        let range = DateRange::stay(date(1), date(4)).expect("ordered stay");
        assert_eq!(range.nights(), 3);
        assert!(range.is_complete());
    }

    #[test]
    fn open_range_has_no_nights() {
        assert_eq!(DateRange::empty().nights(), 0);
        assert_eq!(DateRange::starting(date(2)).nights(), 0);
        assert!(!DateRange::starting(date(2)).is_complete());
    }

    #[test]
    fn commit_trims_fields_and_drops_blank_requests() {
        let info = filled_draft().commit(10).expect("valid draft");
        assert_eq!(info.full_name, "Ayu Lestari");
        assert_eq!(info.special_requests, None);
        assert_eq!(info.number_of_guests, 4);
    }

    #[test]
    fn commit_lists_every_missing_required_field() {
        let mut draft = filled_draft();
        draft.phone.clear();
        draft.id_number = "  ".to_string();

        assert_eq!(
            draft.commit(10),
            Err(ValidationError::MissingGuestFields(vec!["phone", "ID number"]))
        );
    }

    #[test]
    fn commit_bounds_guest_count_by_listing_capacity() {
        let mut draft = filled_draft();
        draft.number_of_guests = 7;
        assert_eq!(
            draft.commit(6),
            Err(ValidationError::GuestCount {
                requested: 7,
                max: 6
            })
        );

        draft.number_of_guests = 0;
        assert!(matches!(
            draft.commit(10),
            Err(ValidationError::GuestCount { requested: 0, .. })
        ));
    }

    #[test]
    fn promo_redeemable_only_inside_window_while_active() {
        let mut promo = PromoCode {
            code: "TRAVEL10".to_string(),
            discount_percentage: 10,
            affiliate_id: None,
            valid_from: date(1),
            valid_until: date(30),
            is_active: true,
        };
        assert!(promo.is_redeemable_on(date(1)));
        assert!(promo.is_redeemable_on(date(30)));
        assert!(!promo.is_redeemable_on(NaiveDate::from_ymd_opt(2025, 7, 1).expect("valid")));

        promo.is_active = false;
        assert!(!promo.is_redeemable_on(date(15)));
    }

    #[test]
    fn step_labels_follow_progress_order() {
        let labels: Vec<&str> = BookingStep::ordered()
            .iter()
            .map(|step| step.label())
            .collect();
        assert_eq!(
            labels,
            vec!["Select Dates", "Promo Code", "Guest Info", "Handoff"]
        );
    }
}
