use tracing::warn;
use uuid::Uuid;

use super::model::{Cart, CartItem};
use crate::storage::{load_json, save_json, KvStore, StoreError};

pub const CART_STORAGE_KEY: &str = "veggieDashCart";

pub fn cart_key(user_id: Uuid) -> String {
    format!("{CART_STORAGE_KEY}:{user_id}")
}

/// Loads the shopper's cart. A document that no longer parses is discarded.
pub async fn load_cart(store: &dyn KvStore, user_id: Uuid) -> Result<Cart, StoreError> {
    let key = cart_key(user_id);
    match load_json::<Vec<CartItem>>(store, &key).await {
        Ok(Some(items)) => Ok(Cart::sanitized(items)),
        Ok(None) => Ok(Cart::default()),
        Err(StoreError::Json(e)) => {
            warn!(error = %e, %user_id, "stored cart unreadable; discarding");
            store.delete(&key).await?;
            Ok(Cart::default())
        }
        Err(e) => Err(e),
    }
}

/// Persists the cart; an empty cart removes the key.
pub async fn save_cart(store: &dyn KvStore, user_id: Uuid, cart: &Cart) -> Result<(), StoreError> {
    let key = cart_key(user_id);
    if cart.is_empty() {
        store.delete(&key).await
    } else {
        save_json(store, &key, cart).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cart::model::tests::product;
    use crate::storage::MemoryStore;

    #[tokio::test]
    async fn cart_survives_save_and_load() {
        let store = MemoryStore::new();
        let user = Uuid::new_v4();
        let mut cart = Cart::default();
        cart.add(product(1, "Kale", 250, 10), 2).unwrap();
        save_cart(&store, user, &cart).await.unwrap();

        let loaded = load_cart(&store, user).await.unwrap();
        assert_eq!(loaded, cart);
        // carts are per shopper
        assert!(load_cart(&store, Uuid::new_v4()).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn empty_cart_deletes_key() {
        let store = MemoryStore::new();
        let user = Uuid::new_v4();
        let mut cart = Cart::default();
        cart.add(product(1, "Kale", 250, 10), 2).unwrap();
        save_cart(&store, user, &cart).await.unwrap();
        cart.clear();
        save_cart(&store, user, &cart).await.unwrap();
        assert_eq!(store.get(&cart_key(user)).await.unwrap(), None);
    }

    #[tokio::test]
    async fn corrupt_cart_is_discarded() {
        let store = MemoryStore::new();
        let user = Uuid::new_v4();
        store.put(&cart_key(user), "[{\"oops\"".into()).await.unwrap();
        assert!(load_cart(&store, user).await.unwrap().is_empty());
        assert_eq!(store.get(&cart_key(user)).await.unwrap(), None);
    }
}
