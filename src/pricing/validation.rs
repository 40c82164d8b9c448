use crate::error::{Error, Result};
use crate::state::{CartLine, Coupon, CouponKind};
use crate::tier::BPS_MAX;
use crate::Money;

/// Reject negative monetary input.
pub fn validate_amount(field: &str, amount: Money) -> Result<()> {
    if amount < 0 {
        return Err(Error::InvalidAmount(format!(
            "{} must be non-negative, got {}",
            field, amount
        )));
    }
    Ok(())
}

pub fn validate_line(line: &CartLine) -> Result<()> {
    validate_amount(&format!("unit_price of {}", line.product_id), line.unit_price)?;
    if line.quantity == 0 {
        return Err(Error::InvalidAmount(format!(
            "quantity of {} must be at least 1",
            line.product_id
        )));
    }
    Ok(())
}

/// Check a coupon definition before it enters the catalog.
///
/// `percentage_off` values are retained fractions in bps and must lie in
/// `1..=10_000`; 10_000 is accepted and means no discount.
pub fn validate_coupon_definition(coupon: &Coupon) -> Result<()> {
    if coupon.id.trim().is_empty() {
        return Err(Error::InvalidCouponDefinition(
            "coupon id must not be empty".to_string(),
        ));
    }
    validate_amount(&format!("minimum_spend of {}", coupon.id), coupon.minimum_spend)?;

    match coupon.kind {
        CouponKind::FixedAmountOff => {
            validate_amount(&format!("value of {}", coupon.id), coupon.value)?;
        }
        CouponKind::PercentageOff => {
            if coupon.value <= 0 || coupon.value > BPS_MAX {
                return Err(Error::InvalidCouponDefinition(format!(
                    "percentage_off value of {} must be in (0, {}] bps, got {}",
                    coupon.id, BPS_MAX, coupon.value
                )));
            }
        }
    }

    if let Some(tiers) = &coupon.eligible_tiers {
        if tiers.is_empty() {
            return Err(Error::InvalidCouponDefinition(format!(
                "coupon {} restricts to an empty tier set",
                coupon.id
            )));
        }
    }

    Ok(())
}
