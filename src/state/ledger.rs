use crate::error::{Error, Result};
use crate::pricing::validation::validate_amount;
use crate::tier::{compute_tier, MembershipTier};
use crate::Money;
use serde::{Deserialize, Serialize};

/// Membership validity granted on first promotion out of `resident`.
pub const MEMBERSHIP_TERM_SECS: i64 = 365 * 24 * 60 * 60;

/// One user's membership ledger.
///
/// Invariants:
/// - `tier == compute_tier(lifetime_spend, annual_spend)` after every mutation
/// - `expiry_date` is set once, on the transition out of `resident`
/// - `lifetime_spend` is never reduced by [`advance_one_year`](Self::advance_one_year)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct MembershipLedger {
    lifetime_spend: Money,
    annual_spend: Money,
    tier: MembershipTier,
    /// Unix seconds
    expiry_date: Option<i64>,
}

impl MembershipLedger {
    /// Session-start ledger: zero spend, `resident`, no expiry.
    pub fn new() -> Self {
        MembershipLedger {
            lifetime_spend: 0,
            annual_spend: 0,
            tier: MembershipTier::Resident,
            expiry_date: None,
        }
    }

    /// Replace both spend totals with new absolute values and recompute the tier.
    ///
    /// Returns the new tier. Nothing changes if either amount is negative.
    pub fn record_spend(&mut self, lifetime: Money, annual: Money, now: i64) -> Result<MembershipTier> {
        validate_amount("lifetime_spend", lifetime)?;
        validate_amount("annual_spend", annual)?;

        let previous = self.tier;
        let new_tier = compute_tier(lifetime, annual);
        if new_tier.is_paid() && !previous.is_paid() {
            let expiry = now.saturating_add(MEMBERSHIP_TERM_SECS);
            self.expiry_date = Some(expiry);
            tracing::info!(tier = %new_tier, expiry, "member promoted out of resident");
        } else if new_tier != previous {
            tracing::info!(from = %previous, to = %new_tier, "tier recomputed");
        }

        self.lifetime_spend = lifetime;
        self.annual_spend = annual;
        self.tier = new_tier;
        Ok(new_tier)
    }

    /// Annual rollover. Paid members drop to `manager_l1` and lose their
    /// annual spend; residents are left as they are.
    pub fn advance_one_year(&mut self) -> MembershipTier {
        if !self.tier.is_paid() {
            tracing::debug!("year rollover on resident ledger is a no-op");
            return self.tier;
        }
        let previous = self.tier;
        self.annual_spend = 0;
        self.tier = MembershipTier::ManagerL1;
        tracing::info!(from = %previous, to = %self.tier, "annual tier reset");
        self.tier
    }

    /// Confirm the cached tier still matches its inputs.
    ///
    /// The two mutation paths above keep this true; a failure here means the
    /// ledger was built from inconsistent serialized data.
    pub fn check_invariants(&self) -> Result<()> {
        let expected = compute_tier(self.lifetime_spend, self.annual_spend);
        if expected != self.tier {
            tracing::error!(cached = %self.tier, %expected, "ledger tier diverged from spend");
            return Err(Error::InvariantViolation(format!(
                "cached tier {} but spend ({}, {}) derives {}",
                self.tier, self.lifetime_spend, self.annual_spend, expected
            )));
        }
        if self.tier.is_paid() && self.expiry_date.is_none() {
            return Err(Error::InvariantViolation(format!(
                "tier {} has no expiry date",
                self.tier
            )));
        }
        Ok(())
    }

    pub fn lifetime_spend(&self) -> Money {
        self.lifetime_spend
    }

    pub fn annual_spend(&self) -> Money {
        self.annual_spend
    }

    pub fn tier(&self) -> MembershipTier {
        self.tier
    }

    pub fn expiry_date(&self) -> Option<i64> {
        self.expiry_date
    }
}

impl Default for MembershipLedger {
    fn default() -> Self {
        MembershipLedger::new()
    }
}
