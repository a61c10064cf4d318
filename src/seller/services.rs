//! Catalog mutations of the seller area.
//!
//! Every entry point checks the caller against the configured admin identity
//! before validating or touching the catalog.

use std::str::FromStr;

use rust_decimal::Decimal;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{info, warn};

use super::dto::{DashboardResponse, Placeholder, ProductForm, StatusRequest, StockAlert};
use crate::{
    auth::extractors::Identity,
    catalog::{
        dto::{default_ai_hint, ProductFilter, ProductView},
        repo::{Catalog, CatalogError},
        repo_types::{ProductInput, ProductStatus},
    },
    config::AdminConfig,
    error::{ActionResult, AppError, FieldErrors},
    validation::{is_valid_url, non_blank, push},
};

pub const LOW_STOCK_THRESHOLD: i32 = 10;

// numeric(10,2)
fn max_price() -> Decimal {
    Decimal::new(9_999_999_999, 2)
}

fn ensure_admin(admin: &AdminConfig, identity: &Identity, action: &str) -> Result<(), AppError> {
    if admin.is_admin(identity) {
        return Ok(());
    }
    warn!(user_id = %identity.user_id, action, "unauthorized catalog mutation");
    Err(AppError::Unauthorized(format!(
        "Unauthorized: Only admins can {action} products."
    )))
}

/// Decodes a request body after the admin check. An empty body decodes to
/// the default value.
fn parse_body<T: DeserializeOwned + Default>(body: &[u8]) -> Result<T, AppError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(T::default());
    }
    serde_json::from_slice(body).map_err(|e| {
        warn!(error = %e, "seller request body rejected");
        AppError::BadRequest(format!("Invalid request body: {e}"))
    })
}

/// A form value that was present but could not be coerced.
struct Invalid;

fn text(value: Option<Value>) -> Result<Option<String>, Invalid> {
    match value {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => Ok(Some(s)),
        Some(Value::Number(n)) => Ok(Some(n.to_string())),
        Some(_) => Err(Invalid),
    }
}

fn decimal(value: Option<Value>) -> Result<Option<Decimal>, Invalid> {
    let raw = match value {
        None | Some(Value::Null) => return Ok(None),
        Some(Value::Number(n)) => n.to_string(),
        Some(Value::String(s)) if s.trim().is_empty() => return Ok(None),
        Some(Value::String(s)) => s.trim().to_string(),
        Some(_) => return Err(Invalid),
    };
    Decimal::from_str(&raw)
        .or_else(|_| Decimal::from_scientific(&raw))
        .map(Some)
        .map_err(|_| Invalid)
}

fn integer(value: Option<Value>) -> Result<Option<i64>, Invalid> {
    match value {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Number(n)) => n.as_i64().map(Some).ok_or(Invalid),
        Some(Value::String(s)) if s.trim().is_empty() => Ok(None),
        Some(Value::String(s)) => s.trim().parse().map(Some).map_err(|_| Invalid),
        Some(_) => Err(Invalid),
    }
}

fn optional_text(
    errors: &mut FieldErrors,
    field: &'static str,
    value: Option<Value>,
) -> Option<String> {
    text(value).map(non_blank).unwrap_or_else(|Invalid| {
        push(errors, field, "Must be text");
        None
    })
}

pub fn validate_product_form(form: ProductForm) -> Result<ProductInput, FieldErrors> {
    let mut errors = FieldErrors::new();

    let name = optional_text(&mut errors, "name", form.name).unwrap_or_default();
    if name.is_empty() && !errors.contains_key("name") {
        push(&mut errors, "name", "Name is required");
    }

    let price = match decimal(form.price) {
        Ok(Some(p)) if p >= Decimal::new(1, 2) && p <= max_price() => p.round_dp(2),
        Ok(Some(p)) if p > max_price() => {
            push(&mut errors, "price", "Price is too large");
            Decimal::ZERO
        }
        Ok(_) => {
            push(&mut errors, "price", "Price must be positive");
            Decimal::ZERO
        }
        Err(Invalid) => {
            push(&mut errors, "price", "Price must be a number");
            Decimal::ZERO
        }
    };

    let stock = match integer(form.stock) {
        Ok(Some(s)) if s < 0 => {
            push(&mut errors, "stock", "Stock cannot be negative");
            0
        }
        Ok(Some(s)) => i32::try_from(s).unwrap_or_else(|_| {
            push(&mut errors, "stock", "Stock is too large");
            0
        }),
        Ok(None) => {
            push(&mut errors, "stock", "Stock is required");
            0
        }
        Err(Invalid) => {
            push(&mut errors, "stock", "Stock must be a whole number");
            0
        }
    };

    let image_url = optional_text(&mut errors, "image_url", form.image_url);
    if let Some(url) = &image_url {
        if !is_valid_url(url) {
            push(&mut errors, "image_url", "Invalid URL format");
        }
    }

    let category_id = match integer(form.category_id) {
        Ok(Some(id)) => match i32::try_from(id) {
            Ok(id) if id > 0 => id,
            _ => {
                push(&mut errors, "category_id", "Invalid category");
                0
            }
        },
        Ok(None) => {
            push(&mut errors, "category_id", "Category is required");
            0
        }
        Err(Invalid) => {
            push(&mut errors, "category_id", "Invalid category");
            0
        }
    };

    let description = optional_text(&mut errors, "description", form.description);
    let data_ai_hint = optional_text(&mut errors, "data_ai_hint", form.data_ai_hint);

    if !errors.is_empty() {
        return Err(errors);
    }

    Ok(ProductInput {
        data_ai_hint: data_ai_hint.or_else(|| default_ai_hint(&name)),
        name,
        description,
        price,
        stock,
        image_url,
        category_id,
    })
}

/// Admin check, then decode and validate the form.
fn checked_form(
    admin: &AdminConfig,
    identity: &Identity,
    action: &str,
    body: &[u8],
) -> Result<ProductInput, AppError> {
    ensure_admin(admin, identity, action)?;
    let form: ProductForm = parse_body(body)?;
    validate_product_form(form).map_err(|errors| {
        warn!(fields = ?errors.keys().collect::<Vec<_>>(), "invalid product form");
        AppError::invalid(errors)
    })
}

pub async fn add_product(
    catalog: &dyn Catalog,
    admin: &AdminConfig,
    identity: &Identity,
    body: &[u8],
) -> Result<ActionResult<ProductView>, AppError> {
    let input = checked_form(admin, identity, "add", body)?;
    let product = catalog
        .create_product(input, Some(identity.user_id))
        .await?;
    info!(product_id = product.id, name = %product.name, "product added");
    Ok(ActionResult::ok_with("Product added successfully.", product))
}

pub async fn update_product(
    catalog: &dyn Catalog,
    admin: &AdminConfig,
    identity: &Identity,
    product_id: i32,
    body: &[u8],
) -> Result<ActionResult<ProductView>, AppError> {
    let input = checked_form(admin, identity, "update", body)?;
    let product = catalog
        .update_product(product_id, input)
        .await
        .map_err(|e| match e {
            CatalogError::NotFound(_) => AppError::NotFound("Product not found for update.".into()),
            other => other.into(),
        })?;
    info!(product_id, name = %product.name, "product updated");
    Ok(ActionResult::ok_with("Product updated successfully.", product))
}

pub async fn delete_product(
    catalog: &dyn Catalog,
    admin: &AdminConfig,
    identity: &Identity,
    product_id: i32,
) -> Result<ActionResult, AppError> {
    ensure_admin(admin, identity, "delete")?;
    let product = catalog
        .delete_product(product_id)
        .await
        .map_err(|e| match e {
            CatalogError::NotFound(_) => AppError::NotFound("Product not found.".into()),
            other => other.into(),
        })?;
    info!(product_id, name = %product.name, "product deleted");
    Ok(ActionResult::ok(format!(
        "Product {} deleted successfully.",
        product.name
    )))
}

/// Sets the requested status, or flips it when the body names none.
pub async fn set_product_status(
    catalog: &dyn Catalog,
    admin: &AdminConfig,
    identity: &Identity,
    product_id: i32,
    body: &[u8],
) -> Result<ActionResult<ProductView>, AppError> {
    ensure_admin(admin, identity, "update")?;
    let StatusRequest { status } = parse_body(body)?;
    let current = catalog
        .get_product(product_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Product not found.".into()))?;
    let next = status.unwrap_or_else(|| current.status.toggled());
    let product = catalog.set_status(product_id, next).await?;
    let verb = match next {
        ProductStatus::Active => "activated",
        ProductStatus::Archived => "archived",
    };
    info!(product_id, status = ?next, "product status changed");
    Ok(ActionResult::ok_with(
        format!("Product {} {verb}.", product.name),
        product,
    ))
}

pub fn dashboard(products: &[ProductView]) -> DashboardResponse {
    let active: Vec<&ProductView> = products
        .iter()
        .filter(|p| p.status == ProductStatus::Active)
        .collect();
    DashboardResponse {
        total_products: products.len(),
        active_products: active.len(),
        archived_products: products.len() - active.len(),
        inventory_units: active.iter().map(|p| i64::from(p.stock.max(0))).sum(),
        inventory_value: active
            .iter()
            .map(|p| p.price * Decimal::from(p.stock.max(0)))
            .sum(),
        low_stock: active
            .iter()
            .filter(|p| p.stock > 0 && p.stock < LOW_STOCK_THRESHOLD)
            .map(|p| StockAlert::from(*p))
            .collect(),
        out_of_stock: active
            .iter()
            .filter(|p| p.stock <= 0)
            .map(|p| StockAlert::from(*p))
            .collect(),
        recent_orders: Placeholder {
            title: "Recent Orders",
            message: "Order management functionality coming soon.",
        },
    }
}

pub async fn inventory(catalog: &dyn Catalog) -> Result<Vec<ProductView>, AppError> {
    Ok(catalog.list_products(&ProductFilter::inventory()).await?)
}
