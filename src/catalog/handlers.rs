use axum::{
    extract::{Path, Query, State},
    routing::get,
    Json, Router,
};
use tracing::{info, instrument};

use super::dto::{ProductFilter, ProductQuery, ProductView, ALL_CATEGORIES};
use super::repo_types::{Category, ProductStatus};
use crate::{error::AppError, state::AppState};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/products", get(list_products))
        .route("/products/:id", get(get_product))
        .route("/categories", get(list_categories))
        .route("/categories/names", get(list_category_names))
}

#[instrument(skip(state))]
pub async fn list_products(
    State(state): State<AppState>,
    Query(q): Query<ProductQuery>,
) -> Result<Json<Vec<ProductView>>, AppError> {
    let filter = ProductFilter::from_query(q);
    let products = state.catalog.list_products(&filter).await?;
    info!(count = products.len(), search = ?filter.search, category = ?filter.category, "products listed");
    Ok(Json(products))
}

#[instrument(skip(state))]
pub async fn get_product(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<ProductView>, AppError> {
    match state.catalog.get_product(id).await? {
        Some(p) if p.status == ProductStatus::Active => Ok(Json(p)),
        _ => Err(AppError::NotFound("Product not found.".into())),
    }
}

#[instrument(skip(state))]
pub async fn list_categories(
    State(state): State<AppState>,
) -> Result<Json<Vec<Category>>, AppError> {
    Ok(Json(state.catalog.list_categories().await?))
}

/// Category names for the filter bar, led by `All`.
#[instrument(skip(state))]
pub async fn list_category_names(
    State(state): State<AppState>,
) -> Result<Json<Vec<String>>, AppError> {
    let names = std::iter::once(ALL_CATEGORIES.to_string())
        .chain(
            state
                .catalog
                .list_categories()
                .await?
                .into_iter()
                .map(|c| c.name),
        )
        .collect();
    Ok(Json(names))
}
