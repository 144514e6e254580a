use super::common::*;
use std::sync::Arc;

use crate::workflows::booking::domain::PromoCode;
use crate::workflows::booking::promo::{
    CatalogError, InMemoryPromoCatalog, PromoCatalog, PromoError, PromoNotice, PromoResolver,
};

struct OfflineCatalog;

impl PromoCatalog for OfflineCatalog {
    fn lookup(&self, _code: &str) -> Result<Option<PromoCode>, CatalogError> {
        Err(CatalogError::Unavailable("promo service timeout".to_string()))
    }
}

#[test]
fn standard_catalog_seeds_affiliate_codes() {
    let catalog = InMemoryPromoCatalog::standard();
    assert_eq!(catalog.len(), 2);

    let summer = catalog
        .lookup("SUMMER25")
        .expect("lookup succeeds")
        .expect("seeded code");
    assert_eq!(summer.discount_percentage, 25);
    assert_eq!(summer.affiliate_id.as_deref(), Some("aff2"));

    let travel = catalog
        .lookup("TRAVEL10")
        .expect("lookup succeeds")
        .expect("seeded code");
    assert_eq!(travel.discount_percentage, 10);
    assert_eq!(travel.affiliate_id.as_deref(), Some("aff1"));
}

#[test]
fn standard_catalog_refuses_a_second_copy_of_a_seed() {
    let mut catalog = InMemoryPromoCatalog::standard();
    let travel = catalog
        .lookup("TRAVEL10")
        .expect("lookup succeeds")
        .expect("seeded code");

    assert_eq!(
        catalog.insert(travel),
        Err(CatalogError::DuplicateCode("TRAVEL10".to_string()))
    );
    assert_eq!(catalog.len(), 2);
}

#[test]
fn resolve_is_case_insensitive_and_trims_input() {
    let resolver = PromoResolver::new(Arc::new(catalog()));
    let promo = resolver
        .resolve("  travel10 ", promo_day())
        .expect("valid code");
    assert_eq!(promo.code, "TRAVEL10");
    assert_eq!(promo.discount_percentage, 10);
}

#[test]
fn resolve_rejects_unknown_inactive_and_out_of_window_codes() {
    let resolver = PromoResolver::new(Arc::new(catalog()));

    assert_eq!(
        resolver.resolve("foo", promo_day()),
        Err(PromoError::InvalidCode {
            code: "FOO".to_string()
        })
    );
    assert!(matches!(
        resolver.resolve("RETIRED5", promo_day()),
        Err(PromoError::InvalidCode { .. })
    ));
    assert!(matches!(
        resolver.resolve("EARLYBIRD", promo_day()),
        Err(PromoError::InvalidCode { .. })
    ));
    assert!(resolver.resolve("EARLYBIRD", date(2025, 7, 15)).is_ok());
    assert!(matches!(
        resolver.resolve("   ", promo_day()),
        Err(PromoError::InvalidCode { .. })
    ));
}

#[test]
fn resolve_surfaces_catalog_outages() {
    let resolver = PromoResolver::new(Arc::new(OfflineCatalog));
    assert!(matches!(
        resolver.resolve("SUMMER25", promo_day()),
        Err(PromoError::Catalog(CatalogError::Unavailable(_)))
    ));
}

#[test]
fn catalog_enforces_unique_codes_and_percent_bounds() {
    let mut catalog = InMemoryPromoCatalog::standard();
    let mut duplicate = catalog
        .lookup("TRAVEL10")
        .expect("lookup succeeds")
        .expect("seeded code");
    duplicate.code = "travel10".to_string();
    assert_eq!(
        catalog.insert(duplicate.clone()),
        Err(CatalogError::DuplicateCode("TRAVEL10".to_string()))
    );

    duplicate.code = "DOUBLE".to_string();
    duplicate.discount_percentage = 120;
    assert!(matches!(
        catalog.insert(duplicate),
        Err(CatalogError::DiscountOutOfRange {
            percentage: 120,
            ..
        })
    ));
}

#[test]
fn notices_render_guest_messages() {
    let promo = InMemoryPromoCatalog::standard()
        .lookup("SUMMER25")
        .expect("lookup succeeds")
        .expect("seeded code");
    let applied = PromoNotice::applied(&promo);
    assert_eq!(applied.message(), "25% discount applied!");
    assert!(!applied.is_error());

    let rejected = PromoNotice::rejected(&PromoError::InvalidCode {
        code: "FOO".to_string(),
    });
    assert_eq!(rejected.message(), "Invalid promo code");
    assert!(rejected.is_error());
}
