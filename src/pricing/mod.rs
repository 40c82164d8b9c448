pub mod engine;
pub mod validation;

pub use engine::{compute_subtotal, compute_total, PriceBreakdown, Savings};
pub use validation::{validate_amount, validate_coupon_definition, validate_line};
