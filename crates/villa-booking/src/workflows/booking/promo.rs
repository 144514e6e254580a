use std::collections::HashMap;
use std::sync::Arc;

use chrono::NaiveDate;
use serde::Serialize;

use super::domain::PromoCode;

/// Read-only lookup of discount codes. Keys are uppercase.
pub trait PromoCatalog: Send + Sync {
    fn lookup(&self, code: &str) -> Result<Option<PromoCode>, CatalogError>;
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CatalogError {
    #[error("promo code {0} is already registered")]
    DuplicateCode(String),
    #[error("promo code {code} discount must be 0-100% (found {percentage}%)")]
    DiscountOutOfRange { code: String, percentage: u8 },
    #[error("promo catalog unavailable: {0}")]
    Unavailable(String),
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PromoError {
    #[error("invalid promo code")]
    InvalidCode { code: String },
    #[error(transparent)]
    Catalog(#[from] CatalogError),
}

pub fn normalize_code(raw: &str) -> String {
    raw.trim().to_uppercase()
}

#[derive(Debug, Clone, Default)]
pub struct InMemoryPromoCatalog {
    codes: HashMap<String, PromoCode>,
}

impl InMemoryPromoCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Launch codes offered through affiliate partners.
    pub fn standard() -> Self {
        let valid_from = NaiveDate::from_ymd_opt(2025, 1, 1);
        let valid_until = NaiveDate::from_ymd_opt(2026, 12, 31);
        let mut catalog = Self::new();

        if let (Some(valid_from), Some(valid_until)) = (valid_from, valid_until) {
            for (code, discount_percentage, affiliate) in
                [("TRAVEL10", 10, "aff1"), ("SUMMER25", 25, "aff2")]
            {
                let seeded = catalog.insert(PromoCode {
                    code: code.to_string(),
                    discount_percentage,
                    affiliate_id: Some(affiliate.to_string()),
                    valid_from,
                    valid_until,
                    is_active: true,
                });
                debug_assert!(seeded.is_ok(), "seed codes are distinct and within range");
            }
        }

        catalog
    }

    pub fn insert(&mut self, mut promo: PromoCode) -> Result<(), CatalogError> {
        promo.code = normalize_code(&promo.code);
        if promo.discount_percentage > 100 {
            return Err(CatalogError::DiscountOutOfRange {
                code: promo.code,
                percentage: promo.discount_percentage,
            });
        }
        if self.codes.contains_key(&promo.code) {
            return Err(CatalogError::DuplicateCode(promo.code));
        }

        self.codes.insert(promo.code.clone(), promo);
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.codes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.codes.is_empty()
    }
}

impl PromoCatalog for InMemoryPromoCatalog {
    fn lookup(&self, code: &str) -> Result<Option<PromoCode>, CatalogError> {
        Ok(self.codes.get(&normalize_code(code)).cloned())
    }
}

/// Validates guest-entered codes against the catalog and redemption window.
pub struct PromoResolver<C> {
    catalog: Arc<C>,
}

impl<C> PromoResolver<C>
where
    C: PromoCatalog + 'static,
{
    pub fn new(catalog: Arc<C>) -> Self {
        Self { catalog }
    }

    pub fn resolve(&self, raw: &str, today: NaiveDate) -> Result<PromoCode, PromoError> {
        let code = normalize_code(raw);
        if code.is_empty() {
            return Err(PromoError::InvalidCode { code });
        }

        match self.catalog.lookup(&code)? {
            Some(promo) if promo.is_redeemable_on(today) => Ok(promo),
            _ => Err(PromoError::InvalidCode { code }),
        }
    }
}

/// Message shown under the promo field after an apply attempt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PromoNotice {
    Applied { code: String, discount_percentage: u8 },
    Rejected { message: String },
}

impl PromoNotice {
    pub fn applied(promo: &PromoCode) -> Self {
        Self::Applied {
            code: promo.code.clone(),
            discount_percentage: promo.discount_percentage,
        }
    }

    pub fn rejected(error: &PromoError) -> Self {
        Self::Rejected {
            message: match error {
                PromoError::InvalidCode { .. } => "Invalid promo code".to_string(),
                PromoError::Catalog(err) => err.to_string(),
            },
        }
    }

    pub fn message(&self) -> String {
        match self {
            Self::Applied {
                discount_percentage,
                ..
            } => format!("{discount_percentage}% discount applied!"),
            Self::Rejected { message } => message.clone(),
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self, Self::Rejected { .. })
    }
}
