use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::model::{Cart, CartItem, CartNotice};

#[derive(Debug, Deserialize)]
pub struct AddToCartRequest {
    pub product_id: i32,
    pub quantity: Option<u32>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateQuantityRequest {
    pub quantity: i64,
}

#[derive(Debug, Serialize)]
pub struct CartResponse {
    pub items: Vec<CartItem>,
    pub total: Decimal,
    pub item_count: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notice: Option<CartNotice>,
}

impl CartResponse {
    pub fn new(cart: &Cart, notice: Option<CartNotice>) -> Self {
        Self {
            items: cart.items().to_vec(),
            total: cart.total(),
            item_count: cart.item_count(),
            notice,
        }
    }
}
