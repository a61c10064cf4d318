use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use tracing::instrument;

use super::model::{DeliveryDetails, Order};
use super::repo::{find_order, load_orders};
use super::services::place_order;
use crate::{
    auth::extractors::AuthUser, error::AppError, extract::AppJson, state::AppState,
};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/checkout", post(checkout))
        .route("/orders", get(list_orders))
        .route("/orders/:id", get(get_order))
}

#[instrument(skip(state, identity, details), fields(user_id = %identity.user_id))]
pub async fn checkout(
    State(state): State<AppState>,
    AuthUser(identity): AuthUser,
    AppJson(details): AppJson<DeliveryDetails>,
) -> Result<(StatusCode, Json<Order>), AppError> {
    let order = place_order(state.store.as_ref(), identity.user_id, details).await?;
    Ok((StatusCode::CREATED, Json(order)))
}

#[instrument(skip(state, identity), fields(user_id = %identity.user_id))]
pub async fn list_orders(
    State(state): State<AppState>,
    AuthUser(identity): AuthUser,
) -> Result<Json<Vec<Order>>, AppError> {
    let mut orders = load_orders(state.store.as_ref(), identity.user_id).await?;
    orders.reverse();
    Ok(Json(orders))
}

#[instrument(skip(state, identity), fields(user_id = %identity.user_id))]
pub async fn get_order(
    State(state): State<AppState>,
    AuthUser(identity): AuthUser,
    Path(id): Path<String>,
) -> Result<Json<Order>, AppError> {
    find_order(state.store.as_ref(), identity.user_id, &id)
        .await?
        .map(Json)
        .ok_or_else(|| AppError::NotFound("Order not found.".into()))
}
