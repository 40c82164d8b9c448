pub mod cart;
pub mod coupon;
pub mod ledger;

pub use cart::{Cart, CartLine, Product};
pub use coupon::{Coupon, CouponCatalog, CouponKind, CouponStatus};
pub use ledger::{MembershipLedger, MEMBERSHIP_TERM_SECS};

use crate::error::{Error, Result};
use crate::pricing::{compute_total, validate_amount, PriceBreakdown};
use crate::tier::MembershipTier;
use crate::{yuan, Clock, Money, SystemClock};

/// Session state for one shopper: membership ledger, coupon catalog,
/// product list, cart and the coupon selected at checkout.
///
/// Callers hold the store by `&mut` and go through its methods; the cart
/// summary is recomputed from current state on every call.
#[derive(Debug, Clone)]
pub struct Store<C: Clock = SystemClock> {
    ledger: MembershipLedger,
    coupons: CouponCatalog,
    products: Vec<Product>,
    cart: Cart,
    selected_coupon_id: Option<String>,
    clock: C,
}

impl Store<SystemClock> {
    /// Empty store on the wall clock.
    pub fn new() -> Self {
        Store::with_clock(SystemClock)
    }

    /// Store seeded with the launch coupons and sample products.
    pub fn with_default_catalog() -> Self {
        Store::with_default_catalog_and_clock(SystemClock)
    }
}

impl Default for Store<SystemClock> {
    fn default() -> Self {
        Store::new()
    }
}

impl<C: Clock> Store<C> {
    pub fn with_clock(clock: C) -> Self {
        Store {
            ledger: MembershipLedger::new(),
            coupons: CouponCatalog::new(),
            products: Vec::new(),
            cart: Cart::new(),
            selected_coupon_id: None,
            clock,
        }
    }

    pub fn with_default_catalog_and_clock(clock: C) -> Self {
        Store {
            coupons: CouponCatalog::with_defaults(),
            products: default_products(),
            ..Store::with_clock(clock)
        }
    }

    // Membership

    /// Set absolute lifetime and annual spend; stamps expiry on first promotion.
    pub fn record_spend(&mut self, lifetime: Money, annual: Money) -> Result<&MembershipLedger> {
        let now = self.clock.now();
        self.ledger.record_spend(lifetime, annual, now)?;
        Ok(&self.ledger)
    }

    pub fn advance_one_year(&mut self) -> &MembershipLedger {
        self.ledger.advance_one_year();
        &self.ledger
    }

    pub fn ledger(&self) -> &MembershipLedger {
        &self.ledger
    }

    pub fn tier(&self) -> MembershipTier {
        self.ledger.tier()
    }

    // Coupons

    pub fn add_coupon(&mut self, coupon: Coupon) -> Result<()> {
        self.coupons.add(coupon)
    }

    /// Change a coupon's status, e.g. mark it used once an order is placed.
    /// A selected coupon that is no longer active stops applying to the cart.
    pub fn set_coupon_status(&mut self, coupon_id: &str, status: CouponStatus) -> Result<()> {
        self.coupons.set_status(coupon_id, status)?;
        tracing::info!(coupon = %coupon_id, ?status, "coupon status changed");
        Ok(())
    }

    pub fn coupons(&self) -> &CouponCatalog {
        &self.coupons
    }

    pub fn list_eligible_coupons(&self) -> Vec<&Coupon> {
        self.coupons.list_eligible(&self.ledger)
    }

    /// Select a coupon for checkout, or clear the selection with `None`.
    pub fn select_coupon(&mut self, coupon_id: Option<&str>) -> Result<()> {
        let Some(id) = coupon_id else {
            self.selected_coupon_id = None;
            return Ok(());
        };
        let coupon = self
            .coupons
            .get(id)
            .ok_or_else(|| Error::UnknownCoupon(id.to_string()))?;
        if !self.is_usable(coupon) {
            return Err(Error::CouponNotSelectable(id.to_string()));
        }
        tracing::info!(coupon = %id, "coupon selected");
        self.selected_coupon_id = Some(id.to_string());
        Ok(())
    }

    pub fn selected_coupon_id(&self) -> Option<&str> {
        self.selected_coupon_id.as_deref()
    }

    /// The selected coupon if it is still usable with the current tier and cart.
    pub fn active_coupon(&self) -> Option<&Coupon> {
        let id = self.selected_coupon_id.as_deref()?;
        let coupon = self.coupons.get(id)?;
        if self.is_usable(coupon) {
            Some(coupon)
        } else {
            tracing::debug!(coupon = %id, "selected coupon no longer usable; ignoring");
            None
        }
    }

    fn is_usable(&self, coupon: &Coupon) -> bool {
        coupon.is_selectable_for(&self.ledger) && coupon.allows_categories(self.cart.categories())
    }

    // Products and cart

    pub fn add_product(&mut self, product: Product) -> Result<()> {
        validate_amount(&format!("price of {}", product.id), product.price)?;
        match self.products.iter_mut().find(|p| p.id == product.id) {
            Some(existing) => *existing = product,
            None => self.products.push(product),
        }
        Ok(())
    }

    pub fn set_on_shelf(&mut self, product_id: &str, on_shelf: bool) -> Result<()> {
        let product = self
            .products
            .iter_mut()
            .find(|p| p.id == product_id)
            .ok_or_else(|| Error::UnknownProduct(product_id.to_string()))?;
        product.on_shelf = on_shelf;
        Ok(())
    }

    pub fn product(&self, product_id: &str) -> Option<&Product> {
        self.products.iter().find(|p| p.id == product_id)
    }

    pub fn products(&self) -> &[Product] {
        &self.products
    }

    pub fn add_to_cart(&mut self, product_id: &str) -> Result<u32> {
        let product = self
            .product(product_id)
            .ok_or_else(|| Error::UnknownProduct(product_id.to_string()))?;
        if !product.on_shelf {
            return Err(Error::ProductUnavailable(product_id.to_string()));
        }
        let product = product.clone();
        Ok(self.cart.add(&product))
    }

    pub fn remove_from_cart(&mut self, product_id: &str) -> bool {
        self.cart.remove(product_id)
    }

    pub fn update_cart_quantity(&mut self, product_id: &str, delta: i64) -> Option<u32> {
        self.cart.update_quantity(product_id, delta)
    }

    pub fn clear_cart(&mut self) {
        self.cart.clear();
    }

    pub fn cart(&self) -> &Cart {
        &self.cart
    }

    /// Price the current cart for the current tier and selected coupon.
    pub fn cart_summary(&self) -> Result<PriceBreakdown> {
        compute_total(self.cart.lines(), self.ledger.tier(), self.active_coupon())
    }
}

fn default_products() -> Vec<Product> {
    vec![
        Product::new("p1", "Ergonomic gaming chair", yuan(1299), "desk"),
        Product::new("p2", "Family dining table (6 seats)", yuan(3599), "dining_table"),
        Product::new("p3", "Minimal coffee table", yuan(899), "coffee_table"),
        Product::new("p4", "Ergonomic office desk", yuan(2100), "desk"),
        Product::new("p6", "Italian leather sofa", yuan(8999), "leather_sofa"),
        Product::new("p8", "Modular bookshelf", yuan(1500), "bookshelf"),
        Product::new("p13", "Kitchen storage rack", yuan(499), "kitchen_storage"),
        Product::new("p15", "Cotton towel set", yuan(299), "bath_storage"),
    ]
}
