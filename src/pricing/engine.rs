use crate::error::{Error, Result};
use crate::pricing::validation::{validate_coupon_definition, validate_line};
use crate::state::{CartLine, Coupon, CouponKind};
use crate::tier::{MembershipTier, BPS_MAX};
use crate::Money;
use serde::{Deserialize, Serialize};

/// Savings split by stage.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Savings {
    pub member: Money,
    pub coupon: Money,
}

/// Result of pricing a cart. Computed on demand, never stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceBreakdown {
    pub subtotal: Money,
    /// Retained fraction in bps actually applied for the tier
    pub member_discount_rate: i64,
    pub price_after_member: Money,
    pub savings: Savings,
    pub final_price: Money,
    /// Set only when the coupon cleared its threshold and saved something.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub applied_coupon_id: Option<String>,
}

/// Σ unit_price × quantity. Empty cart is zero.
pub fn compute_subtotal(lines: &[CartLine]) -> Result<Money> {
    lines.iter().try_fold(0 as Money, |acc, line| {
        validate_line(line)?;
        let line_total = line
            .unit_price
            .checked_mul(Money::from(line.quantity))
            .ok_or_else(|| {
                Error::AmountOverflow(format!(
                    "{} × {} for {}",
                    line.unit_price, line.quantity, line.product_id
                ))
            })?;
        acc.checked_add(line_total)
            .ok_or_else(|| Error::AmountOverflow("cart subtotal".to_string()))
    })
}

/// Apply a bps rate with integer division (rounds toward zero).
fn apply_rate(amount: Money, rate_bps: i64) -> Result<Money> {
    amount
        .checked_mul(rate_bps)
        .map(|v| v / BPS_MAX)
        .ok_or_else(|| Error::AmountOverflow(format!("{} at {} bps", amount, rate_bps)))
}

/// Savings a coupon yields on `price_after_member`, or zero when the
/// threshold is not met.
fn coupon_savings(coupon: &Coupon, price_after_member: Money) -> Result<Money> {
    // Threshold is compared to the post-member-discount price, not the raw subtotal.
    let threshold_base = price_after_member;
    if threshold_base < coupon.minimum_spend {
        return Ok(0);
    }
    match coupon.kind {
        // Not clamped here; the final floor keeps the price non-negative.
        CouponKind::FixedAmountOff => Ok(coupon.value),
        CouponKind::PercentageOff => {
            let retained = apply_rate(price_after_member, coupon.value)?;
            Ok(price_after_member - retained)
        }
    }
}

/// Price a cart: subtotal, then the member rate, then the coupon, each stage
/// working on the previous stage's output.
///
/// Tier eligibility of `coupon` is the caller's concern; only its minimum
/// spend is checked here.
pub fn compute_total(
    lines: &[CartLine],
    tier: MembershipTier,
    coupon: Option<&Coupon>,
) -> Result<PriceBreakdown> {
    let subtotal = compute_subtotal(lines)?;

    let member_rate = tier.discount_rate_bps();
    let price_after_member = apply_rate(subtotal, member_rate)?;
    let member_savings = subtotal - price_after_member;

    let mut savings_from_coupon = 0;
    let mut applied_coupon_id = None;
    if let Some(coupon) = coupon {
        validate_coupon_definition(coupon)?;
        savings_from_coupon = coupon_savings(coupon, price_after_member)?;
        if savings_from_coupon > 0 {
            applied_coupon_id = Some(coupon.id.clone());
        } else {
            tracing::debug!(coupon = %coupon.id, price_after_member, "coupon contributed no savings");
        }
    }

    let final_price = price_after_member.saturating_sub(savings_from_coupon).max(0);

    Ok(PriceBreakdown {
        subtotal,
        member_discount_rate: member_rate,
        price_after_member,
        savings: Savings {
            member: member_savings,
            coupon: savings_from_coupon,
        },
        final_price,
        applied_coupon_id,
    })
}
