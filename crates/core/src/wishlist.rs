//! Saved-for-later list. Session only; never persisted to a table.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::catalog::Product;
use crate::types::ProductId;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WishlistItem {
    pub product_id: ProductId,
    pub name: String,
    pub category: String,
    pub price: Decimal,
    pub image_url: String,
    pub in_stock: bool,
}

impl From<&Product> for WishlistItem {
    fn from(product: &Product) -> Self {
        Self {
            product_id: product.id,
            name: product.name.clone(),
            category: product.category.clone(),
            price: product.price,
            image_url: product.image_url.clone(),
            in_stock: product.in_stock,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Wishlist {
    items: Vec<WishlistItem>,
}

impl Wishlist {
    #[must_use]
    pub fn items(&self) -> &[WishlistItem] {
        &self.items
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    #[must_use]
    pub fn contains(&self, product_id: ProductId) -> bool {
        self.items.iter().any(|i| i.product_id == product_id)
    }

    /// Add an item unless the product is already saved. Returns whether it
    /// was added.
    pub fn add(&mut self, item: WishlistItem) -> bool {
        if self.contains(item.product_id) {
            return false;
        }
        self.items.push(item);
        true
    }

    /// Returns whether the product was present.
    pub fn remove(&mut self, product_id: ProductId) -> bool {
        let before = self.items.len();
        self.items.retain(|i| i.product_id != product_id);
        self.items.len() != before
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::fixtures::product;

    #[test]
    fn test_add_is_idempotent() {
        let mut wishlist = Wishlist::default();
        let scarf = product(2, "Silk Luxury Scarf", "scarf", 44_999, 47);
        assert!(wishlist.add(WishlistItem::from(&scarf)));
        assert!(!wishlist.add(WishlistItem::from(&scarf)));
        assert_eq!(wishlist.len(), 1);
        assert!(wishlist.contains(ProductId::new(2)));
    }

    #[test]
    fn test_remove() {
        let mut wishlist = Wishlist::default();
        wishlist.add(WishlistItem::from(&product(3, "Watch", "watch", 100, 40)));
        assert!(wishlist.remove(ProductId::new(3)));
        assert!(!wishlist.remove(ProductId::new(3)));
        assert!(wishlist.is_empty());
    }
}
