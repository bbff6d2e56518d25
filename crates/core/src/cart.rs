//! Shopping cart state and arithmetic.
//!
//! The cart lives in the visitor's session and, for signed-in customers, is
//! mirrored row-by-row to the `cart_item` table. This module only holds the
//! in-memory half: merging, totals and the login-time reconciliation rule.

use std::collections::HashMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::catalog::Product;
use crate::types::{ProductId, round_money};

/// Largest quantity a single cart line can hold.
pub const MAX_LINE_QUANTITY: i32 = 9_999;

/// A product snapshot plus the quantity in the cart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "postgres", derive(sqlx::FromRow))]
pub struct CartItem {
    pub product_id: ProductId,
    pub name: String,
    pub category: String,
    pub price: Decimal,
    pub image_url: String,
    pub quantity: i32,
    /// Tax rate in percent. `None` until looked up from the product table.
    #[serde(default)]
    pub taxes: Option<Decimal>,
}

impl CartItem {
    /// Snapshot a product with the given quantity.
    #[must_use]
    pub fn from_product(product: &Product, quantity: i32) -> Self {
        Self {
            product_id: product.id,
            name: product.name.clone(),
            category: product.category.clone(),
            price: product.price,
            image_url: product.image_url.clone(),
            quantity,
            taxes: Some(product.taxes),
        }
    }

    /// Price times quantity.
    #[must_use]
    pub fn line_total(&self) -> Decimal {
        self.price * Decimal::from(self.quantity)
    }

    /// Tax owed on this line; zero when the rate is unknown or not positive.
    #[must_use]
    pub fn line_tax(&self) -> Decimal {
        match self.taxes {
            Some(rate) if rate > Decimal::ZERO => self.line_total() * rate / Decimal::ONE_HUNDRED,
            _ => Decimal::ZERO,
        }
    }
}

/// An ordered list of cart lines, one per product.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Cart {
    items: Vec<CartItem>,
}

impl Cart {
    #[must_use]
    pub const fn new(items: Vec<CartItem>) -> Self {
        Self { items }
    }

    #[must_use]
    pub fn items(&self) -> &[CartItem] {
        &self.items
    }

    #[must_use]
    pub fn into_items(self) -> Vec<CartItem> {
        self.items
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    #[must_use]
    pub fn get(&self, product_id: ProductId) -> Option<&CartItem> {
        self.items.iter().find(|i| i.product_id == product_id)
    }

    /// Add a line, merging quantities when the product is already present.
    /// Quantities stop at [`MAX_LINE_QUANTITY`].
    ///
    /// Returns the resulting quantity for that product.
    pub fn add(&mut self, mut item: CartItem) -> i32 {
        if let Some(existing) = self
            .items
            .iter_mut()
            .find(|i| i.product_id == item.product_id)
        {
            existing.quantity = existing
                .quantity
                .saturating_add(item.quantity)
                .min(MAX_LINE_QUANTITY);
            if existing.taxes.is_none() {
                existing.taxes = item.taxes;
            }
            return existing.quantity;
        }
        item.quantity = item.quantity.min(MAX_LINE_QUANTITY);
        let quantity = item.quantity;
        self.items.push(item);
        quantity
    }

    /// Remove a product. Returns whether it was present.
    pub fn remove(&mut self, product_id: ProductId) -> bool {
        let before = self.items.len();
        self.items.retain(|i| i.product_id != product_id);
        self.items.len() != before
    }

    /// Set a product's quantity; zero or less removes the line. Values above
    /// [`MAX_LINE_QUANTITY`] are capped.
    ///
    /// Returns `false` when the product is not in the cart.
    pub fn update_quantity(&mut self, product_id: ProductId, quantity: i32) -> bool {
        if quantity <= 0 {
            return self.remove(product_id);
        }
        match self.items.iter_mut().find(|i| i.product_id == product_id) {
            Some(item) => {
                item.quantity = quantity.min(MAX_LINE_QUANTITY);
                true
            }
            None => false,
        }
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }

    /// Sum of price times quantity.
    #[must_use]
    pub fn subtotal(&self) -> Decimal {
        self.items.iter().map(CartItem::line_total).sum()
    }

    /// Sum of quantities.
    #[must_use]
    pub fn item_count(&self) -> i32 {
        self.items
            .iter()
            .fold(0, |count, i| count.saturating_add(i.quantity))
    }

    /// Tax over lines with a positive rate, rounded to cents.
    #[must_use]
    pub fn tax(&self) -> Decimal {
        round_money(self.items.iter().map(CartItem::line_tax).sum())
    }

    /// Products whose tax rate has not been looked up yet.
    #[must_use]
    pub fn missing_taxes(&self) -> Vec<ProductId> {
        self.items
            .iter()
            .filter(|i| i.taxes.is_none())
            .map(|i| i.product_id)
            .collect()
    }

    /// Fill unknown tax rates from `rates`. Products absent from the map
    /// get a zero rate so they are not looked up again. Returns whether
    /// anything changed.
    pub fn fill_taxes(&mut self, rates: &HashMap<ProductId, Decimal>) -> bool {
        let mut changed = false;
        for item in self.items.iter_mut().filter(|i| i.taxes.is_none()) {
            item.taxes = Some(rates.get(&item.product_id).copied().unwrap_or_default());
            changed = true;
        }
        changed
    }

    /// Totals for checkout with the given shipping charge.
    #[must_use]
    pub fn totals(&self, shipping: Decimal) -> CartTotals {
        let subtotal = self.subtotal();
        let tax = self.tax();
        CartTotals {
            subtotal,
            tax,
            shipping,
            grand_total: subtotal + tax + shipping,
            item_count: self.item_count(),
        }
    }
}

/// Login-time reconciliation: a non-empty server cart replaces the session
/// cart; otherwise the session cart is kept. Nothing is merged.
#[must_use]
pub fn reconcile(local: Cart, server: Cart) -> Cart {
    if server.is_empty() { local } else { server }
}

/// Money summary of a cart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CartTotals {
    pub subtotal: Decimal,
    pub tax: Decimal,
    pub shipping: Decimal,
    pub grand_total: Decimal,
    pub item_count: i32,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::catalog::fixtures::product;

    fn line(id: i32, cents: i64, quantity: i32, taxes: Option<i64>) -> CartItem {
        let mut item = CartItem::from_product(&product(id, "Item", "bag", cents, 45), quantity);
        item.taxes = taxes.map(Decimal::from);
        item
    }

    #[test]
    fn test_add_merges_quantity() {
        let mut cart = Cart::default();
        assert_eq!(cart.add(line(1, 10_000, 2, Some(0))), 2);
        assert_eq!(cart.add(line(1, 10_000, 3, Some(0))), 5);
        assert_eq!(cart.add(line(2, 5_000, 1, Some(0))), 1);
        assert_eq!(cart.items().len(), 2);
        assert_eq!(cart.item_count(), 6);
    }

    #[test]
    fn test_update_quantity() {
        let mut cart = Cart::new(vec![line(1, 10_000, 2, None)]);
        assert!(cart.update_quantity(ProductId::new(1), 7));
        assert_eq!(cart.get(ProductId::new(1)).unwrap().quantity, 7);
        assert!(!cart.update_quantity(ProductId::new(9), 7));
        assert!(cart.update_quantity(ProductId::new(1), 0));
        assert!(cart.is_empty());
    }

    #[test]
    fn test_quantities_stop_at_line_maximum() {
        let mut cart = Cart::new(vec![line(1, 100, 1, Some(0))]);
        assert!(cart.update_quantity(ProductId::new(1), i32::MAX));
        assert_eq!(cart.get(ProductId::new(1)).unwrap().quantity, MAX_LINE_QUANTITY);

        assert_eq!(cart.add(line(1, 100, 1, Some(0))), MAX_LINE_QUANTITY);
        assert_eq!(cart.add(line(2, 100, i32::MAX, Some(0))), MAX_LINE_QUANTITY);
        assert_eq!(cart.item_count(), 2 * MAX_LINE_QUANTITY);
    }

    #[test]
    fn test_item_count_saturates() {
        let json = r#"[
            {"product_id":1,"name":"A","category":"bag","price":"1.00","image_url":"","quantity":2147483647},
            {"product_id":2,"name":"B","category":"bag","price":"1.00","image_url":"","quantity":2147483647}
        ]"#;
        let cart: Cart = serde_json::from_str(json).unwrap();
        assert_eq!(cart.item_count(), i32::MAX);
    }

    #[test]
    fn test_remove_and_clear() {
        let mut cart = Cart::new(vec![line(1, 100, 1, None), line(2, 100, 1, None)]);
        assert!(cart.remove(ProductId::new(1)));
        assert!(!cart.remove(ProductId::new(1)));
        cart.clear();
        assert!(cart.is_empty());
    }

    #[test]
    fn test_subtotal_and_tax() {
        let cart = Cart::new(vec![
            line(1, 129_999, 2, Some(13)),
            line(2, 44_999, 1, Some(0)),
            line(3, 10_000, 1, None),
        ]);
        // 2599.98 + 449.99 + 100.00
        assert_eq!(cart.subtotal(), Decimal::new(314_997, 2));
        // 2599.98 * 13% = 337.9974
        assert_eq!(cart.tax(), Decimal::new(33_800, 2));
    }

    #[test]
    fn test_totals() {
        let cart = Cart::new(vec![line(1, 10_000, 2, Some(10))]);
        let totals = cart.totals(Decimal::new(1_500, 2));
        assert_eq!(totals.subtotal, Decimal::new(20_000, 2));
        assert_eq!(totals.tax, Decimal::new(2_000, 2));
        assert_eq!(totals.grand_total, Decimal::new(23_500, 2));
        assert_eq!(totals.item_count, 2);
    }

    #[test]
    fn test_fill_taxes() {
        let mut cart = Cart::new(vec![line(1, 100, 1, None), line(2, 100, 1, Some(5))]);
        assert_eq!(cart.missing_taxes(), vec![ProductId::new(1)]);

        let rates = HashMap::from([(ProductId::new(1), Decimal::from(8))]);
        assert!(cart.fill_taxes(&rates));
        assert!(cart.missing_taxes().is_empty());
        assert!(!cart.fill_taxes(&rates));
    }

    #[test]
    fn test_fill_taxes_defaults_unknown_products_to_zero() {
        let mut cart = Cart::new(vec![line(3, 100, 1, None)]);
        assert!(cart.fill_taxes(&HashMap::new()));
        assert_eq!(cart.get(ProductId::new(3)).unwrap().taxes, Some(Decimal::ZERO));
        assert!(cart.missing_taxes().is_empty());
    }

    #[test]
    fn test_reconcile_prefers_non_empty_server_cart() {
        let local = Cart::new(vec![line(1, 100, 1, None)]);
        let server = Cart::new(vec![line(2, 100, 4, None)]);
        let merged = reconcile(local.clone(), server.clone());
        assert_eq!(merged, server);

        let kept = reconcile(local.clone(), Cart::default());
        assert_eq!(kept, local);
    }

    #[test]
    fn test_session_serialization_tolerates_missing_taxes() {
        let json = r#"[{"product_id":1,"name":"Tote","category":"bag","price":"10.00","image_url":"","quantity":2}]"#;
        let cart: Cart = serde_json::from_str(json).unwrap();
        assert_eq!(cart.missing_taxes(), vec![ProductId::new(1)]);
    }
}
