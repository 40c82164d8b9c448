use clap::{Parser, Subcommand, ValueEnum};
use storefront_pricing::config::Config;
use storefront_pricing::error::{Error, Result};
use storefront_pricing::ops::{load_operations, replay};
use storefront_pricing::pricing::{compute_total, validate_amount, PriceBreakdown};
use storefront_pricing::state::{CartLine, Coupon, CouponKind, CouponStatus, Store};
use storefront_pricing::tier::{compute_tier, MembershipTier};
use storefront_pricing::Money;

#[derive(Parser)]
#[command(name = "storefront-pricing")]
#[command(about = "Membership tier and cart pricing engine for the storefront ops console")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Output format: "human" or "json"
    #[arg(short, long)]
    pub format: Option<String>,

    /// Log filter, e.g. "info" or "storefront_pricing=debug"
    #[arg(long)]
    pub log_level: Option<String>,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum CouponKindArg {
    Fixed,
    Percent,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Derive the membership tier for a spend history (amounts in fen)
    Tier {
        lifetime: Money,
        annual: Money,
    },

    /// Price a cart for a tier and optional coupon (amounts in fen)
    Quote {
        /// Membership tier
        #[arg(short, long, default_value = "resident")]
        tier: MembershipTier,

        /// Cart line as PRICExQTY, e.g. 129900x2; repeatable
        #[arg(short, long = "line", value_parser = parse_line)]
        lines: Vec<CartLine>,

        /// Coupon kind
        #[arg(long, requires = "coupon_value")]
        coupon_kind: Option<CouponKindArg>,

        /// Fen off for fixed coupons; retained bps for percent coupons
        #[arg(long, requires = "coupon_kind")]
        coupon_value: Option<Money>,

        /// Minimum post-member-discount price for the coupon to apply
        #[arg(long, default_value_t = 0)]
        coupon_min: Money,
    },

    /// Apply an operation log (JSON array) to a fresh store and print the result
    Replay {
        /// Path to the log, or "-" for stdin
        #[arg(default_value = "-")]
        file: String,
    },
}

/// Parse "PRICExQTY" (quantity defaults to 1).
fn parse_line(raw: &str) -> std::result::Result<CartLine, String> {
    let (price, qty) = match raw.split_once(['x', 'X']) {
        Some((p, q)) => (p, q),
        None => (raw, "1"),
    };
    let price: Money = price
        .trim()
        .parse()
        .map_err(|e| format!("bad price in {:?}: {}", raw, e))?;
    let quantity: u32 = qty
        .trim()
        .parse()
        .map_err(|e| format!("bad quantity in {:?}: {}", raw, e))?;
    Ok(CartLine::new("cli", price, quantity))
}

fn format_output<T: serde::Serialize + std::fmt::Debug>(data: &T, config: &Config) -> Result<String> {
    if config.is_json() {
        serde_json::to_string_pretty(data)
            .map_err(|e| Error::Parse(format!("Failed to serialize JSON: {}", e)))
    } else {
        Ok(format!("{:#?}", data))
    }
}

pub fn run(cli: Cli) -> Result<()> {
    let mut config = Config::from_env();
    if let Some(format) = cli.format {
        config.set_output_format(format);
    }
    if let Some(level) = cli.log_level {
        config.set_log_level(level);
    }
    storefront_pricing::logger::init(config.get_log_level());

    match cli.command {
        Commands::Tier { lifetime, annual } => {
            validate_amount("lifetime_spend", lifetime)?;
            validate_amount("annual_spend", annual)?;
            let tier = compute_tier(lifetime, annual);
            let output = TierOutput {
                lifetime_spend: lifetime,
                annual_spend: annual,
                tier,
                discount_rate_bps: tier.discount_rate_bps(),
            };
            println!("{}", format_output(&output, &config)?);
            Ok(())
        }

        Commands::Quote {
            tier,
            lines,
            coupon_kind,
            coupon_value,
            coupon_min,
        } => {
            let coupon = match (coupon_kind, coupon_value) {
                (Some(kind), Some(value)) => Some(Coupon {
                    id: "cli".to_string(),
                    title: "command line coupon".to_string(),
                    description: String::new(),
                    kind: match kind {
                        CouponKindArg::Fixed => CouponKind::FixedAmountOff,
                        CouponKindArg::Percent => CouponKind::PercentageOff,
                    },
                    value,
                    minimum_spend: coupon_min,
                    eligible_tiers: None,
                    eligible_categories: None,
                    status: CouponStatus::Active,
                }),
                _ => None,
            };
            let breakdown = compute_total(&lines, tier, coupon.as_ref())?;
            println!("{}", format_output(&breakdown, &config)?);
            Ok(())
        }

        Commands::Replay { file } => {
            let ops = load_operations(&file)?;
            let mut store = if config.seed_default_catalog {
                Store::with_default_catalog()
            } else {
                Store::new()
            };
            replay(&mut store, &ops)?;

            let output = ReplayOutput {
                operations: ops.len(),
                tier: store.tier(),
                lifetime_spend: store.ledger().lifetime_spend(),
                annual_spend: store.ledger().annual_spend(),
                expiry_date: store.ledger().expiry_date(),
                eligible_coupons: store
                    .list_eligible_coupons()
                    .iter()
                    .map(|c| c.id.clone())
                    .collect(),
                cart: store.cart_summary()?,
            };
            println!("{}", format_output(&output, &config)?);
            Ok(())
        }
    }
}

#[derive(Debug, serde::Serialize)]
struct TierOutput {
    lifetime_spend: Money,
    annual_spend: Money,
    tier: MembershipTier,
    discount_rate_bps: i64,
}

#[derive(Debug, serde::Serialize)]
struct ReplayOutput {
    operations: usize,
    tier: MembershipTier,
    lifetime_spend: Money,
    annual_spend: Money,
    #[serde(skip_serializing_if = "Option::is_none")]
    expiry_date: Option<i64>,
    eligible_coupons: Vec<String>,
    cart: PriceBreakdown,
}
