use chrono::NaiveDate;
use serde::Serialize;

use super::domain::{GuestInfo, VillaListing};
use super::pricing::{format_currency, PricingSnapshot};
use super::session::BookingSession;

/// Review-page view of a session with a complete date range.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BookingSummary {
    pub villa_id: String,
    pub villa_name: String,
    pub check_in: NaiveDate,
    pub check_out: NaiveDate,
    pub nights: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub promo_code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub discount_percentage: Option<u8>,
    pub pricing: PricingSnapshot,
    pub price_lines: Vec<PriceLine>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub guest: Option<GuestInfo>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PriceLine {
    pub label: String,
    pub amount: String,
}

impl BookingSummary {
    pub fn from_session(listing: &VillaListing, session: &BookingSession) -> Option<Self> {
        let (check_in, check_out) = session.dates().bounds()?;
        let nights = u32::try_from(session.nights()).ok().filter(|n| *n > 0)?;
        let pricing = *session.pricing();
        let promo = session.applied_promo();

        let mut price_lines = vec![PriceLine {
            label: format!(
                "Base price ({} night{})",
                nights,
                if nights > 1 { "s" } else { "" }
            ),
            amount: format_currency(pricing.original_price),
        }];
        if let Some(promo) = promo {
            price_lines.push(PriceLine {
                label: format!("Discount ({} - {}%)", promo.code, promo.discount_percentage),
                amount: format!("- {}", format_currency(pricing.discount_amount)),
            });
        }
        price_lines.push(PriceLine {
            label: "Total Amount".to_string(),
            amount: format_currency(pricing.final_price),
        });

        Some(Self {
            villa_id: listing.id.clone(),
            villa_name: listing.name.clone(),
            check_in,
            check_out,
            nights,
            promo_code: promo.map(|promo| promo.code.clone()),
            discount_percentage: promo.map(|promo| promo.discount_percentage),
            pricing,
            price_lines,
            guest: session.guest().cloned(),
        })
    }

    pub fn total_display(&self) -> String {
        format_currency(self.pricing.final_price)
    }
}
