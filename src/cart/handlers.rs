use axum::{
    extract::{Path, State},
    routing::{delete, get, post},
    Json, Router,
};
use tracing::{info, instrument, warn};

use super::dto::{AddToCartRequest, CartResponse, UpdateQuantityRequest};
use super::model::CartError;
use super::repo::{load_cart, save_cart};
use crate::{
    auth::extractors::AuthUser, catalog::repo_types::ProductStatus, error::AppError,
    extract::AppJson, state::AppState,
};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/cart", get(get_cart).delete(clear_cart))
        .route("/cart/items", post(add_item))
        .route(
            "/cart/items/:product_id",
            delete(remove_item).patch(update_item),
        )
}

impl From<CartError> for AppError {
    fn from(e: CartError) -> Self {
        AppError::BadRequest(e.to_string())
    }
}

#[instrument(skip(state, identity), fields(user_id = %identity.user_id))]
pub async fn get_cart(
    State(state): State<AppState>,
    AuthUser(identity): AuthUser,
) -> Result<Json<CartResponse>, AppError> {
    let cart = load_cart(state.store.as_ref(), identity.user_id).await?;
    Ok(Json(CartResponse::new(&cart, None)))
}

#[instrument(skip(state, identity, payload), fields(user_id = %identity.user_id))]
pub async fn add_item(
    State(state): State<AppState>,
    AuthUser(identity): AuthUser,
    AppJson(payload): AppJson<AddToCartRequest>,
) -> Result<Json<CartResponse>, AppError> {
    let product = state
        .catalog
        .get_product(payload.product_id)
        .await?
        .filter(|p| p.status == ProductStatus::Active)
        .ok_or_else(|| AppError::NotFound("Product not found.".into()))?;

    let mut cart = load_cart(state.store.as_ref(), identity.user_id).await?;
    let notice = cart.add(product, payload.quantity.unwrap_or(1)).map_err(|e| {
        warn!(error = %e, "add to cart rejected");
        e
    })?;
    save_cart(state.store.as_ref(), identity.user_id, &cart).await?;

    info!(product_id = payload.product_id, kind = ?notice.kind, item_count = cart.item_count(), "cart item added");
    Ok(Json(CartResponse::new(&cart, Some(notice))))
}

#[instrument(skip(state, identity, payload), fields(user_id = %identity.user_id))]
pub async fn update_item(
    State(state): State<AppState>,
    AuthUser(identity): AuthUser,
    Path(product_id): Path<i32>,
    AppJson(payload): AppJson<UpdateQuantityRequest>,
) -> Result<Json<CartResponse>, AppError> {
    let mut cart = load_cart(state.store.as_ref(), identity.user_id).await?;
    if cart.quantity_of(product_id).is_none() {
        return Err(AppError::NotFound("Item is not in the cart.".into()));
    }
    let fresh = state
        .catalog
        .get_product(product_id)
        .await?
        .filter(|p| p.status == ProductStatus::Active);
    let notice = match fresh {
        Some(product) => cart.update_quantity(product_id, payload.quantity, Some(product)),
        None => {
            info!(product_id, "product no longer sold; dropping cart line");
            cart.drop_unavailable(product_id)
        }
    };
    save_cart(state.store.as_ref(), identity.user_id, &cart).await?;
    Ok(Json(CartResponse::new(&cart, notice)))
}

#[instrument(skip(state, identity), fields(user_id = %identity.user_id))]
pub async fn remove_item(
    State(state): State<AppState>,
    AuthUser(identity): AuthUser,
    Path(product_id): Path<i32>,
) -> Result<Json<CartResponse>, AppError> {
    let mut cart = load_cart(state.store.as_ref(), identity.user_id).await?;
    let notice = cart
        .remove(product_id)
        .ok_or_else(|| AppError::NotFound("Item is not in the cart.".into()))?;
    save_cart(state.store.as_ref(), identity.user_id, &cart).await?;
    Ok(Json(CartResponse::new(&cart, Some(notice))))
}

#[instrument(skip(state, identity), fields(user_id = %identity.user_id))]
pub async fn clear_cart(
    State(state): State<AppState>,
    AuthUser(identity): AuthUser,
) -> Result<Json<CartResponse>, AppError> {
    let mut cart = load_cart(state.store.as_ref(), identity.user_id).await?;
    let notice = cart.clear();
    save_cart(state.store.as_ref(), identity.user_id, &cart).await?;
    Ok(Json(CartResponse::new(&cart, Some(notice))))
}
