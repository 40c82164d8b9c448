use crate::Money;
use serde::{Deserialize, Serialize};

/// Catalog entry. Only the fields pricing and coupon filtering need.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Product {
    pub id: String,
    pub name: String,
    pub price: Money,
    pub category_id: String,
    #[serde(default = "default_on_shelf")]
    pub on_shelf: bool,
}

fn default_on_shelf() -> bool {
    true
}

impl Product {
    pub fn new(id: &str, name: &str, price: Money, category_id: &str) -> Self {
        Product {
            id: id.to_string(),
            name: name.to_string(),
            price,
            category_id: category_id.to_string(),
            on_shelf: true,
        }
    }
}

/// One cart line. `unit_price` is captured when the product is added.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CartLine {
    pub product_id: String,
    pub category_id: String,
    pub unit_price: Money,
    pub quantity: u32,
}

impl CartLine {
    pub fn new(product_id: &str, unit_price: Money, quantity: u32) -> Self {
        CartLine {
            product_id: product_id.to_string(),
            category_id: String::new(),
            unit_price,
            quantity,
        }
    }

    pub fn from_product(product: &Product, quantity: u32) -> Self {
        CartLine {
            product_id: product.id.clone(),
            category_id: product.category_id.clone(),
            unit_price: product.price,
            quantity,
        }
    }
}

/// Shopping cart. Lines are unique per product; order is insertion order.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Cart {
    lines: Vec<CartLine>,
}

impl Cart {
    pub fn new() -> Self {
        Cart { lines: Vec::new() }
    }

    /// Add one unit, creating the line if needed. Returns the line's quantity.
    pub fn add(&mut self, product: &Product) -> u32 {
        if let Some(line) = self.line_mut(&product.id) {
            line.quantity = line.quantity.saturating_add(1);
            return line.quantity;
        }
        self.lines.push(CartLine::from_product(product, 1));
        1
    }

    /// Remove a product's line. Returns whether a line was removed.
    pub fn remove(&mut self, product_id: &str) -> bool {
        let before = self.lines.len();
        self.lines.retain(|l| l.product_id != product_id);
        self.lines.len() != before
    }

    /// Shift a line's quantity by `delta`, flooring at zero; lines that reach
    /// zero are dropped. Returns the new quantity, or `None` if the product
    /// is not in the cart.
    pub fn update_quantity(&mut self, product_id: &str, delta: i64) -> Option<u32> {
        let line = self.line_mut(product_id)?;
        let updated = i64::from(line.quantity)
            .saturating_add(delta)
            .clamp(0, i64::from(u32::MAX)) as u32;
        line.quantity = updated;
        if updated == 0 {
            self.remove(product_id);
        }
        Some(updated)
    }

    pub fn clear(&mut self) {
        self.lines.clear();
    }

    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    pub fn quantity_of(&self, product_id: &str) -> u32 {
        self.lines
            .iter()
            .find(|l| l.product_id == product_id)
            .map(|l| l.quantity)
            .unwrap_or(0)
    }

    /// Category ids present in the cart.
    pub fn categories(&self) -> impl Iterator<Item = &str> {
        self.lines.iter().map(|l| l.category_id.as_str())
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    fn line_mut(&mut self, product_id: &str) -> Option<&mut CartLine> {
        self.lines.iter_mut().find(|l| l.product_id == product_id)
    }
}
