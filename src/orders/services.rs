use time::OffsetDateTime;
use tracing::{info, warn};
use uuid::Uuid;

use super::model::{DeliveryDetails, Order, PENDING};
use super::repo::append_order;
use crate::{
    cart::repo::{load_cart, save_cart},
    error::AppError,
    storage::KvStore,
};

/// Turns the shopper's cart into an order and empties the cart.
pub async fn place_order(
    store: &dyn KvStore,
    user_id: Uuid,
    details: DeliveryDetails,
) -> Result<Order, AppError> {
    let details = details.validate().map_err(AppError::invalid)?;

    let mut cart = load_cart(store, user_id).await?;
    if cart.is_empty() {
        return Err(AppError::BadRequest("Your cart is empty.".into()));
    }

    let now = OffsetDateTime::now_utc();
    let total_amount = cart.total();
    let order = Order {
        id: Order::id_for(now),
        timestamp: now,
        delivery_details: details,
        items: cart.items().to_vec(),
        total_amount,
        status: PENDING.into(),
    };
    append_order(store, user_id, &order).await?;

    // the order is recorded from here on; a failed clear is only logged
    cart.clear();
    if let Err(e) = save_cart(store, user_id, &cart).await {
        warn!(error = %e, %user_id, order_id = %order.id, "cart not cleared after order");
    }

    info!(%user_id, order_id = %order.id, total = %order.total_amount, "order placed");
    Ok(order)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cart::{model::tests::product, model::Cart};
    use crate::orders::{model::tests::details, repo::find_order};
    use crate::storage::{MemoryStore, StoreError};
    use rust_decimal::Decimal;

    #[tokio::test]
    async fn placing_an_order_clears_the_cart_and_records_totals() {
        let store = MemoryStore::new();
        let user = Uuid::new_v4();
        let mut cart = Cart::default();
        cart.add(product(1, "Kale", 250, 10), 2).unwrap();
        cart.add(product(2, "Leek", 199, 10), 1).unwrap();
        save_cart(&store, user, &cart).await.unwrap();

        let order = place_order(&store, user, details()).await.unwrap();
        assert_eq!(order.total_amount, Decimal::new(699, 2));
        assert_eq!(order.items.len(), 2);
        assert_eq!(order.status, "Pending");

        assert!(load_cart(&store, user).await.unwrap().is_empty());
        let stored = find_order(&store, user, &order.id).await.unwrap().unwrap();
        assert_eq!(stored.total_amount, cart.total());
        assert_eq!(stored, order);
    }

    /// Memory store whose deletes always fail.
    struct StuckDeletes(MemoryStore);

    #[async_trait::async_trait]
    impl KvStore for StuckDeletes {
        async fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
            self.0.get(key).await
        }
        async fn put(&self, key: &str, value: String) -> Result<(), StoreError> {
            self.0.put(key, value).await
        }
        async fn delete(&self, _key: &str) -> Result<(), StoreError> {
            Err(std::io::Error::new(std::io::ErrorKind::Other, "disk gone").into())
        }
    }

    #[tokio::test]
    async fn failed_cart_clear_still_returns_the_recorded_order() {
        let store = StuckDeletes(MemoryStore::new());
        let user = Uuid::new_v4();
        let mut cart = Cart::default();
        cart.add(product(1, "Kale", 250, 10), 2).unwrap();
        save_cart(&store, user, &cart).await.unwrap();

        let order = place_order(&store, user, details()).await.unwrap();
        let stored = crate::orders::repo::load_orders(&store, user).await.unwrap();
        assert_eq!(stored, vec![order]);
    }

    #[tokio::test]
    async fn empty_cart_cannot_check_out() {
        let store = MemoryStore::new();
        let err = place_order(&store, Uuid::new_v4(), details()).await.unwrap_err();
        assert!(matches!(err, AppError::BadRequest(_)));
    }

    #[tokio::test]
    async fn invalid_details_leave_cart_untouched() {
        let store = MemoryStore::new();
        let user = Uuid::new_v4();
        let mut cart = Cart::default();
        cart.add(product(1, "Kale", 250, 10), 2).unwrap();
        save_cart(&store, user, &cart).await.unwrap();

        let mut bad = details();
        bad.email = "not-an-email".into();
        let err = place_order(&store, user, bad).await.unwrap_err();
        assert!(matches!(err, AppError::Validation { .. }));
        assert_eq!(load_cart(&store, user).await.unwrap(), cart);
    }
}
