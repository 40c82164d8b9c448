//! Membership tiers and the spend thresholds that derive them.

use crate::error::Error;
use crate::Money;
use serde::{Deserialize, Serialize};

/// 10_000 basis points = 100% of the price retained.
pub const BPS_MAX: i64 = 10_000;

/// Lifetime spend a user must reach before any paid tier applies (¥500).
pub const LIFETIME_GATE: Money = 50_000;

/// Annual spend for `manager_l2` (¥1000).
pub const MANAGER_L2_ANNUAL: Money = 100_000;

/// Annual spend for `god` (¥2000).
pub const GOD_ANNUAL: Money = 200_000;

/// Membership tier, ordered by discount generosity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MembershipTier {
    Resident,
    ManagerL1,
    ManagerL2,
    God,
}

impl MembershipTier {
    pub const ALL: [MembershipTier; 4] = [
        MembershipTier::Resident,
        MembershipTier::ManagerL1,
        MembershipTier::ManagerL2,
        MembershipTier::God,
    ];

    /// Fraction of the price retained after the member discount, in bps.
    pub const fn discount_rate_bps(&self) -> i64 {
        match self {
            Self::Resident => 10_000,
            Self::ManagerL1 => 9_500,
            Self::ManagerL2 => 9_000,
            Self::God => 8_000,
        }
    }

    pub fn is_paid(&self) -> bool {
        *self != Self::Resident
    }

    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Resident => "resident",
            Self::ManagerL1 => "manager_l1",
            Self::ManagerL2 => "manager_l2",
            Self::God => "god",
        }
    }
}

impl std::fmt::Display for MembershipTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for MembershipTier {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "resident" => Ok(Self::Resident),
            "manager_l1" => Ok(Self::ManagerL1),
            "manager_l2" => Ok(Self::ManagerL2),
            "god" => Ok(Self::God),
            _ => Err(Error::InvalidTier(s.to_string())),
        }
    }
}

/// Derive the tier from lifetime and annual spend. First matching rule wins.
///
/// The lifetime gate is absolute: no annual spend promotes a user whose
/// lifetime spend is below [`LIFETIME_GATE`]. Past the gate the floor is
/// `manager_l1` even with zero annual spend.
pub fn compute_tier(lifetime_spend: Money, annual_spend: Money) -> MembershipTier {
    if lifetime_spend < LIFETIME_GATE {
        return MembershipTier::Resident;
    }
    if annual_spend >= GOD_ANNUAL {
        return MembershipTier::God;
    }
    if annual_spend >= MANAGER_L2_ANNUAL {
        return MembershipTier::ManagerL2;
    }
    MembershipTier::ManagerL1
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::yuan;

    #[test]
    fn test_lifetime_gate_blocks_promotion() {
        assert_eq!(compute_tier(yuan(499), yuan(999_999)), MembershipTier::Resident);
        assert_eq!(compute_tier(0, 0), MembershipTier::Resident);
    }

    #[test]
    fn test_thresholds() {
        assert_eq!(compute_tier(yuan(500), 0), MembershipTier::ManagerL1);
        assert_eq!(compute_tier(yuan(500), yuan(999)), MembershipTier::ManagerL1);
        assert_eq!(compute_tier(yuan(500), yuan(1000)), MembershipTier::ManagerL2);
        assert_eq!(compute_tier(yuan(500), yuan(1999)), MembershipTier::ManagerL2);
        assert_eq!(compute_tier(yuan(500), yuan(2000)), MembershipTier::God);
    }

    #[test]
    fn test_one_fen_below_gate() {
        assert_eq!(compute_tier(LIFETIME_GATE - 1, GOD_ANNUAL), MembershipTier::Resident);
    }

    #[test]
    fn test_rate_table() {
        assert_eq!(MembershipTier::Resident.discount_rate_bps(), 10_000);
        assert_eq!(MembershipTier::ManagerL1.discount_rate_bps(), 9_500);
        assert_eq!(MembershipTier::ManagerL2.discount_rate_bps(), 9_000);
        assert_eq!(MembershipTier::God.discount_rate_bps(), 8_000);
    }

    #[test]
    fn test_ordering_matches_generosity() {
        for pair in MembershipTier::ALL.windows(2) {
            assert!(pair[0] < pair[1]);
            assert!(pair[0].discount_rate_bps() > pair[1].discount_rate_bps());
        }
    }

    #[test]
    fn test_parse_and_display() {
        for tier in MembershipTier::ALL {
            let parsed: MembershipTier = tier.to_string().parse().unwrap();
            assert_eq!(parsed, tier);
        }
        assert!(matches!(
            "platinum".parse::<MembershipTier>(),
            Err(Error::InvalidTier(_))
        ));
    }

    #[test]
    fn test_serde_names() {
        let json = serde_json::to_string(&MembershipTier::ManagerL2).unwrap();
        assert_eq!(json, "\"manager_l2\"");
    }
}
