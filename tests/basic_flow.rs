use std::io::Write;
use storefront_pricing::error::Error;
use storefront_pricing::ops::{load_operations, replay, Operation};
use storefront_pricing::pricing::compute_total;
use storefront_pricing::state::{
    CartLine, Coupon, CouponKind, CouponStatus, Store, MEMBERSHIP_TERM_SECS,
};
use storefront_pricing::tier::MembershipTier;
use storefront_pricing::{yuan, FixedClock};
use tempfile::NamedTempFile;

const NOW: i64 = 1_767_225_600;

fn create_test_store() -> Store<FixedClock> {
    Store::with_default_catalog_and_clock(FixedClock(NOW))
}

fn cash_coupon(id: &str, value: i64, minimum_spend: i64) -> Coupon {
    Coupon {
        id: id.to_string(),
        title: id.to_string(),
        description: String::new(),
        kind: CouponKind::FixedAmountOff,
        value,
        minimum_spend,
        eligible_tiers: None,
        eligible_categories: None,
        status: CouponStatus::Active,
    }
}

/// Resident shops, gets promoted, climbs tiers, then loses them at rollover.
#[test]
fn test_membership_lifecycle_end_to_end() {
    let mut store = create_test_store();

    // 1. Resident with a ¥3599 table and the welcome coupon.
    store.add_to_cart("p2").unwrap();
    let welcome: Vec<_> = store
        .list_eligible_coupons()
        .iter()
        .map(|c| c.id.clone())
        .collect();
    assert_eq!(welcome, vec!["cp1", "cp3"]);
    store.select_coupon(Some("cp1")).unwrap();
    let summary = store.cart_summary().unwrap();
    assert_eq!(summary.member_discount_rate, 10_000);
    assert_eq!(summary.final_price, yuan(3579));

    // 2. Ops records spend crossing the lifetime gate.
    store.record_spend(yuan(3599), yuan(3599)).unwrap();
    assert_eq!(store.tier(), MembershipTier::God);
    let expiry = store.ledger().expiry_date();
    assert_eq!(expiry, Some(NOW + MEMBERSHIP_TERM_SECS));

    // Welcome coupon no longer applies; god rate does.
    let summary = store.cart_summary().unwrap();
    assert_eq!(summary.applied_coupon_id, None);
    assert_eq!(summary.price_after_member, 287_920);
    assert_eq!(summary.final_price, 287_920);

    // 3. Switch to the manager coupon.
    store.select_coupon(Some("cp2")).unwrap();
    let summary = store.cart_summary().unwrap();
    assert_eq!(summary.savings.coupon, 28_792);
    assert_eq!(summary.final_price, 259_128);

    // 4. More spend does not move the expiry.
    store.record_spend(yuan(8000), yuan(4400)).unwrap();
    assert_eq!(store.ledger().expiry_date(), expiry);

    // 5. Rollover drops to manager_l1 and clears annual spend.
    store.advance_one_year();
    assert_eq!(store.tier(), MembershipTier::ManagerL1);
    assert_eq!(store.ledger().annual_spend(), 0);
    assert_eq!(store.ledger().lifetime_spend(), yuan(8000));
    assert_eq!(store.ledger().expiry_date(), expiry);
    store.ledger().check_invariants().unwrap();

    let summary = store.cart_summary().unwrap();
    assert_eq!(summary.member_discount_rate, 9_500);
    assert_eq!(summary.applied_coupon_id.as_deref(), Some("cp2"));
}

#[test]
fn test_manager_l2_cash_coupon_scenario() {
    let lines = vec![CartLine::new("sofa", yuan(3000), 1)];
    let coupon = cash_coupon("cash50", yuan(50), yuan(500));
    let b = compute_total(&lines, MembershipTier::ManagerL2, Some(&coupon)).unwrap();
    assert_eq!(b.price_after_member, yuan(2700));
    assert_eq!(b.savings.member, yuan(300));
    assert_eq!(b.savings.coupon, yuan(50));
    assert_eq!(b.final_price, yuan(2650));
}

#[test]
fn test_resident_percentage_coupon_scenario() {
    let lines = vec![CartLine::new("towels", yuan(100), 1)];
    let coupon = Coupon {
        kind: CouponKind::PercentageOff,
        value: 9_000,
        ..cash_coupon("pct90", 0, 0)
    };
    let b = compute_total(&lines, MembershipTier::Resident, Some(&coupon)).unwrap();
    assert_eq!(b.price_after_member, yuan(100));
    assert_eq!(b.savings.coupon, yuan(10));
    assert_eq!(b.final_price, yuan(90));
}

#[test]
fn test_fixed_coupon_larger_than_price_equals_clamped_outcome() {
    let lines = vec![CartLine::new("rack", yuan(40), 1)];
    let big = cash_coupon("big", yuan(100), 0);
    let clamped = cash_coupon("clamped", yuan(40), 0);

    let unclamped = compute_total(&lines, MembershipTier::Resident, Some(&big)).unwrap();
    let reference = compute_total(&lines, MembershipTier::Resident, Some(&clamped)).unwrap();
    assert_eq!(unclamped.final_price, 0);
    assert_eq!(unclamped.final_price, reference.final_price);
    // Reported savings stay nominal.
    assert_eq!(unclamped.savings.coupon, yuan(100));
}

#[test]
fn test_add_coupon_validation_through_store() {
    let mut store = create_test_store();
    let bad = Coupon {
        kind: CouponKind::PercentageOff,
        value: 0,
        ..cash_coupon("zero", 0, 0)
    };
    assert!(matches!(
        store.add_coupon(bad),
        Err(Error::InvalidCouponDefinition(_))
    ));
    assert!(matches!(
        store.add_coupon(cash_coupon("cp1", yuan(5), 0)),
        Err(Error::DuplicateCoupon(_))
    ));

    store.add_coupon(cash_coupon("vip", yuan(5), 0)).unwrap();
    assert!(store
        .list_eligible_coupons()
        .iter()
        .any(|c| c.id == "vip"));
}

#[test]
fn test_replay_from_file() {
    let ops = vec![
        Operation::RecordSpend {
            lifetime: yuan(500),
            annual: yuan(1000),
        },
        Operation::AddToCart {
            product_id: "p4".to_string(),
        },
        Operation::AddToCart {
            product_id: "p3".to_string(),
        },
        Operation::SelectCoupon {
            coupon_id: Some("cp3".to_string()),
        },
    ];
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(serde_json::to_string(&ops).unwrap().as_bytes())
        .unwrap();

    let loaded = load_operations(file.path().to_str().unwrap()).unwrap();
    assert_eq!(loaded, ops);

    let mut store = create_test_store();
    replay(&mut store, &loaded).unwrap();
    assert_eq!(store.tier(), MembershipTier::ManagerL2);

    // (2100 + 899) × 0.9 = 2699.1, minus ¥50
    let summary = store.cart_summary().unwrap();
    assert_eq!(summary.subtotal, yuan(2999));
    assert_eq!(summary.price_after_member, 269_910);
    assert_eq!(summary.final_price, 264_910);
}

#[test]
fn test_load_operations_missing_file() {
    let dir = tempfile::TempDir::new().unwrap();
    let path = dir.path().join("absent.json");
    assert!(matches!(
        load_operations(path.to_str().unwrap()),
        Err(Error::Io(_))
    ));
}
