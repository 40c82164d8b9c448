use crate::error::{Error, Result};
use crate::pricing::validation::validate_coupon_definition;
use crate::state::MembershipLedger;
use crate::tier::MembershipTier;
use crate::{yuan, Money};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CouponKind {
    /// `value` is a flat amount in minor units.
    FixedAmountOff,
    /// `value` is the fraction of the price retained, in bps (9_000 = 10% off).
    PercentageOff,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CouponStatus {
    Active,
    Used,
    Expired,
}

/// Redeemable discount template.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Coupon {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub kind: CouponKind,
    pub value: Money,
    #[serde(default)]
    pub minimum_spend: Money,
    /// `None` means every tier may use it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub eligible_tiers: Option<Vec<MembershipTier>>,
    /// `None` means any cart qualifies.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub eligible_categories: Option<Vec<String>>,
    pub status: CouponStatus,
}

impl Coupon {
    pub fn is_active(&self) -> bool {
        self.status == CouponStatus::Active
    }

    pub fn allows_tier(&self, tier: MembershipTier) -> bool {
        match &self.eligible_tiers {
            Some(tiers) => tiers.contains(&tier),
            None => true,
        }
    }

    /// True when the coupon has no category restriction or one of
    /// `categories` matches it.
    pub fn allows_categories<'a, I>(&self, categories: I) -> bool
    where
        I: IntoIterator<Item = &'a str>,
    {
        match &self.eligible_categories {
            Some(allowed) => categories
                .into_iter()
                .any(|c| allowed.iter().any(|a| a == c)),
            None => true,
        }
    }

    /// Selectable for a ledger: active and tier-eligible.
    pub fn is_selectable_for(&self, ledger: &MembershipLedger) -> bool {
        self.is_active() && self.allows_tier(ledger.tier())
    }
}

/// Append-only collection of coupon definitions.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct CouponCatalog {
    coupons: Vec<Coupon>,
}

impl CouponCatalog {
    pub fn new() -> Self {
        CouponCatalog { coupons: Vec::new() }
    }

    /// The storefront's launch coupons.
    pub fn with_defaults() -> Self {
        CouponCatalog {
            coupons: vec![
                Coupon {
                    id: "cp1".to_string(),
                    title: "New member welcome".to_string(),
                    description: "¥20 off orders over ¥100".to_string(),
                    kind: CouponKind::FixedAmountOff,
                    value: yuan(20),
                    minimum_spend: yuan(100),
                    eligible_tiers: Some(vec![MembershipTier::Resident]),
                    eligible_categories: None,
                    status: CouponStatus::Active,
                },
                Coupon {
                    id: "cp2".to_string(),
                    title: "Manager exclusive".to_string(),
                    description: "10% off everything".to_string(),
                    kind: CouponKind::PercentageOff,
                    value: 9_000,
                    minimum_spend: 0,
                    eligible_tiers: Some(vec![
                        MembershipTier::ManagerL1,
                        MembershipTier::ManagerL2,
                        MembershipTier::God,
                    ]),
                    eligible_categories: None,
                    status: CouponStatus::Active,
                },
                Coupon {
                    id: "cp3".to_string(),
                    title: "Sitewide".to_string(),
                    description: "¥50 off orders over ¥500".to_string(),
                    kind: CouponKind::FixedAmountOff,
                    value: yuan(50),
                    minimum_spend: yuan(500),
                    eligible_tiers: None,
                    eligible_categories: None,
                    status: CouponStatus::Active,
                },
            ],
        }
    }

    /// Validate and append a coupon definition. Ids are unique.
    pub fn add(&mut self, coupon: Coupon) -> Result<()> {
        validate_coupon_definition(&coupon)?;
        if self.get(&coupon.id).is_some() {
            return Err(Error::DuplicateCoupon(coupon.id));
        }
        tracing::info!(coupon = %coupon.id, kind = ?coupon.kind, "coupon added");
        self.coupons.push(coupon);
        Ok(())
    }

    pub fn get(&self, id: &str) -> Option<&Coupon> {
        self.coupons.iter().find(|c| c.id == id)
    }

    /// Update a coupon's status.
    pub fn set_status(&mut self, id: &str, status: CouponStatus) -> Result<()> {
        let coupon = self
            .coupons
            .iter_mut()
            .find(|c| c.id == id)
            .ok_or_else(|| Error::UnknownCoupon(id.to_string()))?;
        coupon.status = status;
        Ok(())
    }

    /// Active coupons whose tier restriction admits the ledger's tier,
    /// in catalog order.
    pub fn list_eligible(&self, ledger: &MembershipLedger) -> Vec<&Coupon> {
        self.coupons
            .iter()
            .filter(|c| c.is_selectable_for(ledger))
            .collect()
    }

    pub fn all(&self) -> &[Coupon] {
        &self.coupons
    }

    pub fn len(&self) -> usize {
        self.coupons.len()
    }

    pub fn is_empty(&self) -> bool {
        self.coupons.is_empty()
    }
}
