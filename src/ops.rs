//! Operation log: the actions the storefront and operations console issue,
//! as serializable values that can be applied to a [`Store`] in order.

use crate::error::{Error, Result};
use crate::state::{Coupon, CouponStatus, Product, Store};
use crate::{Clock, Money};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Operation {
    RecordSpend { lifetime: Money, annual: Money },
    AdvanceOneYear,
    AddCoupon { coupon: Coupon },
    SetCouponStatus { coupon_id: String, status: CouponStatus },
    AddProduct { product: Product },
    SetOnShelf { product_id: String, on_shelf: bool },
    AddToCart { product_id: String },
    RemoveFromCart { product_id: String },
    UpdateCartQuantity { product_id: String, delta: i64 },
    ClearCart,
    SelectCoupon { coupon_id: Option<String> },
}

/// Apply a single operation to the store.
pub fn apply<C: Clock>(store: &mut Store<C>, op: &Operation) -> Result<()> {
    match op {
        Operation::RecordSpend { lifetime, annual } => {
            store.record_spend(*lifetime, *annual)?;
        }
        Operation::AdvanceOneYear => {
            store.advance_one_year();
        }
        Operation::AddCoupon { coupon } => {
            store.add_coupon(coupon.clone())?;
        }
        Operation::SetCouponStatus { coupon_id, status } => {
            store.set_coupon_status(coupon_id, *status)?;
        }
        Operation::AddProduct { product } => {
            store.add_product(product.clone())?;
        }
        Operation::SetOnShelf {
            product_id,
            on_shelf,
        } => {
            store.set_on_shelf(product_id, *on_shelf)?;
        }
        Operation::AddToCart { product_id } => {
            store.add_to_cart(product_id)?;
        }
        Operation::RemoveFromCart { product_id } => {
            if !store.remove_from_cart(product_id) {
                tracing::debug!(product = %product_id, "remove_from_cart: product not in cart");
            }
        }
        Operation::UpdateCartQuantity { product_id, delta } => {
            if store.update_cart_quantity(product_id, *delta).is_none() {
                tracing::debug!(product = %product_id, delta, "update_cart_quantity: product not in cart");
            }
        }
        Operation::ClearCart => store.clear_cart(),
        Operation::SelectCoupon { coupon_id } => {
            store.select_coupon(coupon_id.as_deref())?;
        }
    }
    Ok(())
}

/// Apply operations in order, stopping at the first failure.
///
/// Operations before the failing one stay applied; the error carries the
/// zero-based index of the operation that failed.
pub fn replay<C: Clock>(store: &mut Store<C>, ops: &[Operation]) -> Result<()> {
    for (index, op) in ops.iter().enumerate() {
        apply(store, op).map_err(|source| {
            tracing::warn!(index, error = %source, "operation rejected");
            Error::Operation {
                index,
                source: Box::new(source),
            }
        })?;
    }
    tracing::debug!(count = ops.len(), "operations replayed");
    Ok(())
}

/// Parse a JSON array of operations.
pub fn parse_operations(json: &str) -> Result<Vec<Operation>> {
    serde_json::from_str(json)
        .map_err(|e| Error::Parse(format!("Failed to parse operations JSON: {}", e)))
}

/// Read an operation log from a file path, or stdin when `path` is `-`.
pub fn load_operations(path: &str) -> Result<Vec<Operation>> {
    let json = if path == "-" {
        let mut buffer = String::new();
        std::io::Read::read_to_string(&mut std::io::stdin(), &mut buffer)?;
        buffer
    } else {
        std::fs::read_to_string(path)?
    };
    parse_operations(&json)
}
