//! Cart state and its stock reconciliation rules.
//!
//! Quantities are clamped to the stock of the product snapshot at the time of
//! the change. Nothing is reserved: two carts may both hold the last unit.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::catalog::dto::ProductView;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CartItem {
    pub product: ProductView,
    pub quantity: u32,
}

impl CartItem {
    pub fn line_total(&self) -> Decimal {
        self.product.price * Decimal::from(self.quantity)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NoticeKind {
    Added,
    Updated,
    StockLimited,
    Removed,
    Cleared,
}

/// What happened to the cart, for display to the shopper.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CartNotice {
    pub kind: NoticeKind,
    pub title: String,
    pub description: String,
}

impl CartNotice {
    fn new(kind: NoticeKind, title: &str, description: String) -> Self {
        Self {
            kind,
            title: title.to_string(),
            description,
        }
    }

    fn removed(name: &str) -> Self {
        Self::new(
            NoticeKind::Removed,
            "Item removed",
            format!("{name} has been removed from your cart."),
        )
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CartError {
    #[error("Quantity must be at least 1.")]
    InvalidQuantity,
    #[error("{0} is out of stock.")]
    OutOfStock(String),
}

fn available(product: &ProductView) -> u32 {
    u32::try_from(product.stock).unwrap_or(0)
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(transparent)]
pub struct Cart {
    items: Vec<CartItem>,
}

impl Cart {
    /// Drops lines without a valid product id and bumps zero quantities to 1.
    pub fn sanitized(items: Vec<CartItem>) -> Self {
        let items = items
            .into_iter()
            .filter(|i| i.product.id > 0)
            .map(|mut i| {
                if i.quantity == 0 {
                    i.quantity = 1;
                }
                i
            })
            .collect();
        Self { items }
    }

    pub fn items(&self) -> &[CartItem] {
        &self.items
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn quantity_of(&self, product_id: i32) -> Option<u32> {
        self.items
            .iter()
            .find(|i| i.product.id == product_id)
            .map(|i| i.quantity)
    }

    pub fn total(&self) -> Decimal {
        self.items.iter().map(CartItem::line_total).sum()
    }

    pub fn item_count(&self) -> u32 {
        self.items.iter().map(|i| i.quantity).sum()
    }

    fn position(&self, product_id: i32) -> Option<usize> {
        self.items.iter().position(|i| i.product.id == product_id)
    }

    /// Adds `quantity` units, never storing more than the product's stock.
    pub fn add(&mut self, product: ProductView, quantity: u32) -> Result<CartNotice, CartError> {
        if quantity == 0 {
            return Err(CartError::InvalidQuantity);
        }
        let stock = available(&product);
        if stock == 0 {
            return Err(CartError::OutOfStock(product.name));
        }
        let name = product.name.clone();

        if let Some(idx) = self.position(product.id) {
            let item = &mut self.items[idx];
            let current = item.quantity;
            let wanted = current.saturating_add(quantity);
            item.product = product;
            if wanted > stock {
                item.quantity = stock;
                return Ok(CartNotice::new(
                    NoticeKind::StockLimited,
                    "Stock limit reached",
                    format!(
                        "Cannot add more {name}. Max stock is {stock}. Current in cart: {current}, trying to add: {quantity}."
                    ),
                ));
            }
            item.quantity = wanted;
            return Ok(CartNotice::new(
                NoticeKind::Updated,
                "Item updated in cart",
                format!("{name} quantity increased to {wanted}."),
            ));
        }

        if quantity > stock {
            self.items.push(CartItem {
                product,
                quantity: stock,
            });
            return Ok(CartNotice::new(
                NoticeKind::StockLimited,
                "Stock limit reached",
                format!("Cannot add {name}. Max stock is {stock}, trying to add {quantity}."),
            ));
        }
        self.items.push(CartItem { product, quantity });
        Ok(CartNotice::new(
            NoticeKind::Added,
            "Item added to cart",
            format!("{quantity} {name}(s) has been added to your cart."),
        ))
    }

    /// Sets a line's quantity. `None` when the product is not in the cart.
    ///
    /// `fresh` replaces the stored snapshot before the stock check.
    pub fn update_quantity(
        &mut self,
        product_id: i32,
        quantity: i64,
        fresh: Option<ProductView>,
    ) -> Option<CartNotice> {
        let idx = self.position(product_id)?;
        if let Some(product) = fresh {
            self.items[idx].product = product;
        }
        if quantity <= 0 {
            let item = self.items.remove(idx);
            return Some(CartNotice::removed(&item.product.name));
        }

        let stock = available(&self.items[idx].product);
        if quantity > i64::from(stock) {
            if stock == 0 {
                let item = self.items.remove(idx);
                return Some(CartNotice::new(
                    NoticeKind::StockLimited,
                    "Out of stock",
                    format!("{} is out of stock and was removed from your cart.", item.product.name),
                ));
            }
            let item = &mut self.items[idx];
            item.quantity = stock;
            return Some(CartNotice::new(
                NoticeKind::StockLimited,
                "Stock limit reached",
                format!(
                    "Max stock for {} is {stock}. Quantity set to max.",
                    item.product.name
                ),
            ));
        }

        let item = &mut self.items[idx];
        // quantity is within 1..=stock here
        item.quantity = quantity as u32;
        Some(CartNotice::new(
            NoticeKind::Updated,
            "Item updated in cart",
            format!("{} quantity set to {quantity}.", item.product.name),
        ))
    }

    pub fn remove(&mut self, product_id: i32) -> Option<CartNotice> {
        let idx = self.position(product_id)?;
        let item = self.items.remove(idx);
        Some(CartNotice::removed(&item.product.name))
    }

    /// Removes a line whose product was deleted or archived.
    pub fn drop_unavailable(&mut self, product_id: i32) -> Option<CartNotice> {
        let idx = self.position(product_id)?;
        let item = self.items.remove(idx);
        Some(CartNotice::new(
            NoticeKind::Removed,
            "Item unavailable",
            format!(
                "{} is no longer available and was removed from your cart.",
                item.product.name
            ),
        ))
    }

    pub fn clear(&mut self) -> CartNotice {
        self.items.clear();
        CartNotice::new(
            NoticeKind::Cleared,
            "Cart cleared",
            "Your shopping cart is now empty.".into(),
        )
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::catalog::repo_types::ProductStatus;

    pub(crate) fn product(id: i32, name: &str, cents: i64, stock: i32) -> ProductView {
        ProductView {
            id,
            name: name.into(),
            description: None,
            price: Decimal::new(cents, 2),
            image_url: "https://placehold.co/600x400.png".into(),
            category: "Fresh Veggies".into(),
            category_id: 1,
            stock,
            status: ProductStatus::Active,
            data_ai_hint: "vegetable".into(),
        }
    }

    #[test]
    fn add_new_item_within_stock() {
        let mut cart = Cart::default();
        let notice = cart.add(product(1, "Kale", 250, 10), 3).unwrap();
        assert_eq!(notice.kind, NoticeKind::Added);
        assert_eq!(cart.quantity_of(1), Some(3));
    }

    #[test]
    fn add_never_exceeds_stock() {
        let mut cart = Cart::default();
        let kale = product(1, "Kale", 250, 4);

        let notice = cart.add(kale.clone(), 9).unwrap();
        assert_eq!(notice.kind, NoticeKind::StockLimited);
        assert_eq!(cart.quantity_of(1), Some(4));

        let notice = cart.add(kale.clone(), 1).unwrap();
        assert_eq!(notice.kind, NoticeKind::StockLimited);
        assert_eq!(cart.quantity_of(1), Some(4));

        for q in [1u32, 2, 3, 7, 100] {
            let mut cart = Cart::default();
            cart.add(kale.clone(), q).unwrap();
            cart.add(kale.clone(), q).unwrap();
            assert!(cart.quantity_of(1).unwrap() <= 4);
        }
    }

    #[test]
    fn add_merges_existing_line_and_refreshes_snapshot() {
        let mut cart = Cart::default();
        cart.add(product(1, "Kale", 250, 10), 2).unwrap();
        let notice = cart.add(product(1, "Kale", 300, 10), 3).unwrap();
        assert_eq!(notice.kind, NoticeKind::Updated);
        assert_eq!(cart.items().len(), 1);
        assert_eq!(cart.quantity_of(1), Some(5));
        assert_eq!(cart.items()[0].product.price, Decimal::new(300, 2));
    }

    #[test]
    fn add_rejects_zero_quantity_and_empty_stock() {
        let mut cart = Cart::default();
        assert_eq!(
            cart.add(product(1, "Kale", 250, 10), 0),
            Err(CartError::InvalidQuantity)
        );
        assert_eq!(
            cart.add(product(2, "Broccoli", 279, 0), 1),
            Err(CartError::OutOfStock("Broccoli".into()))
        );
        assert!(cart.is_empty());
    }

    #[test]
    fn removing_last_unit_removes_the_line() {
        let mut cart = Cart::default();
        cart.add(product(1, "Kale", 250, 10), 1).unwrap();
        let notice = cart.update_quantity(1, 0, None).unwrap();
        assert_eq!(notice.kind, NoticeKind::Removed);
        assert!(cart.is_empty());
        assert_eq!(cart.quantity_of(1), None);
    }

    #[test]
    fn update_clamps_to_stock() {
        let mut cart = Cart::default();
        cart.add(product(1, "Kale", 250, 5), 1).unwrap();
        let notice = cart.update_quantity(1, 12, None).unwrap();
        assert_eq!(notice.kind, NoticeKind::StockLimited);
        assert_eq!(cart.quantity_of(1), Some(5));
    }

    #[test]
    fn update_with_sold_out_snapshot_removes_line() {
        let mut cart = Cart::default();
        cart.add(product(1, "Kale", 250, 5), 2).unwrap();
        let notice = cart
            .update_quantity(1, 3, Some(product(1, "Kale", 250, 0)))
            .unwrap();
        assert_eq!(notice.kind, NoticeKind::StockLimited);
        assert!(cart.is_empty());
    }

    #[test]
    fn unavailable_product_is_dropped() {
        let mut cart = Cart::default();
        cart.add(product(1, "Kale", 250, 5), 2).unwrap();
        cart.add(product(2, "Leek", 199, 5), 1).unwrap();
        let notice = cart.drop_unavailable(1).unwrap();
        assert_eq!(notice.kind, NoticeKind::Removed);
        assert!(notice.description.contains("no longer available"));
        assert_eq!(cart.quantity_of(1), None);
        assert_eq!(cart.quantity_of(2), Some(1));
        assert_eq!(cart.drop_unavailable(1), None);
    }

    #[test]
    fn update_unknown_product_is_noop() {
        let mut cart = Cart::default();
        cart.add(product(1, "Kale", 250, 5), 2).unwrap();
        assert_eq!(cart.update_quantity(2, 3, None), None);
        assert_eq!(cart.quantity_of(1), Some(2));
    }

    #[test]
    fn totals_sum_price_times_quantity() {
        let mut cart = Cart::default();
        cart.add(product(1, "Kale", 250, 10), 2).unwrap();
        cart.add(product(2, "Leek", 199, 10), 3).unwrap();
        assert_eq!(cart.total(), Decimal::new(1097, 2));
        assert_eq!(cart.item_count(), 5);
        cart.remove(1).unwrap();
        assert_eq!(cart.total(), Decimal::new(597, 2));
        assert_eq!(cart.clear().kind, NoticeKind::Cleared);
        assert_eq!(cart.total(), Decimal::ZERO);
    }

    #[test]
    fn sanitize_drops_bad_ids_and_fixes_zero_quantities() {
        let cart = Cart::sanitized(vec![
            CartItem {
                product: product(0, "Ghost", 100, 1),
                quantity: 1,
            },
            CartItem {
                product: product(3, "Leek", 100, 5),
                quantity: 0,
            },
        ]);
        assert_eq!(cart.items().len(), 1);
        assert_eq!(cart.quantity_of(3), Some(1));
    }
}
