use uuid::Uuid;

use super::model::Order;
use crate::storage::{load_json, save_json, KvStore, StoreError};

pub const ORDERS_STORAGE_KEY: &str = "veggieDashOrders";

pub fn orders_key(user_id: Uuid) -> String {
    format!("{ORDERS_STORAGE_KEY}:{user_id}")
}

/// Orders in placement order.
pub async fn load_orders(store: &dyn KvStore, user_id: Uuid) -> Result<Vec<Order>, StoreError> {
    Ok(load_json(store, &orders_key(user_id)).await?.unwrap_or_default())
}

pub async fn append_order(
    store: &dyn KvStore,
    user_id: Uuid,
    order: &Order,
) -> Result<(), StoreError> {
    let mut orders = load_orders(store, user_id).await?;
    orders.push(order.clone());
    save_json(store, &orders_key(user_id), &orders).await
}

pub async fn find_order(
    store: &dyn KvStore,
    user_id: Uuid,
    order_id: &str,
) -> Result<Option<Order>, StoreError> {
    Ok(load_orders(store, user_id)
        .await?
        .into_iter()
        .find(|o| o.id == order_id))
}
