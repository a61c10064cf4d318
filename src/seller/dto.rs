use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::catalog::{dto::ProductView, repo_types::ProductStatus};

/// Product form as submitted. Values stay raw JSON so that a wrong type
/// becomes a field error: `"3.49"` and `3.49` are the same price, `"ten"`
/// is an invalid stock.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ProductForm {
    pub name: Option<Value>,
    pub description: Option<Value>,
    pub price: Option<Value>,
    pub stock: Option<Value>,
    pub image_url: Option<Value>,
    pub category_id: Option<Value>,
    pub data_ai_hint: Option<Value>,
}

#[derive(Debug, Default, Deserialize)]
pub struct StatusRequest {
    /// Absent means toggle.
    pub status: Option<ProductStatus>,
}

#[derive(Debug, Serialize)]
pub struct StockAlert {
    pub id: i32,
    pub name: String,
    pub stock: i32,
}

impl From<&ProductView> for StockAlert {
    fn from(p: &ProductView) -> Self {
        Self {
            id: p.id,
            name: p.name.clone(),
            stock: p.stock,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct DashboardResponse {
    pub total_products: usize,
    pub active_products: usize,
    pub archived_products: usize,
    pub inventory_units: i64,
    pub inventory_value: Decimal,
    pub low_stock: Vec<StockAlert>,
    pub out_of_stock: Vec<StockAlert>,
    pub recent_orders: Placeholder,
}

/// Back-office section that has no data behind it yet.
#[derive(Debug, Serialize)]
pub struct Placeholder {
    pub title: &'static str,
    pub message: &'static str,
}
