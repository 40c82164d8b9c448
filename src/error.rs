use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Invalid amount: {0}")]
    InvalidAmount(String),

    #[error("Invalid coupon definition: {0}")]
    InvalidCouponDefinition(String),

    #[error("Invariant violation: {0}")]
    InvariantViolation(String),

    #[error("Amount overflow: {0}")]
    AmountOverflow(String),

    #[error("Invalid tier: {0}")]
    InvalidTier(String),

    #[error("Unknown coupon: {0}")]
    UnknownCoupon(String),

    #[error("Coupon {0} already exists")]
    DuplicateCoupon(String),

    #[error("Coupon {0} is not selectable for the current ledger and cart")]
    CouponNotSelectable(String),

    #[error("Unknown product: {0}")]
    UnknownProduct(String),

    #[error("Product {0} is off shelf")]
    ProductUnavailable(String),

    #[error("Operation {index} failed: {source}")]
    Operation {
        index: usize,
        #[source]
        source: Box<Error>,
    },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(String),
}

pub type Result<T> = std::result::Result<T, Error>;
