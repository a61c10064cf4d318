use axum::{
    body::Bytes,
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use tracing::{info, instrument};

use super::dto::{DashboardResponse, Placeholder};
use super::services;
use crate::{
    auth::extractors::{AdminUser, AuthUser, Identity},
    catalog::dto::ProductView,
    error::{ActionResult, AppError},
    state::AppState,
};

/// Reads sit behind [`AdminUser`]. Mutations take any signed-in caller and
/// the raw body; the service checks the admin before decoding anything, so
/// the rejection names the action whatever the payload.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/seller/dashboard", get(dashboard))
        .route(
            "/seller/inventory",
            get(list_inventory).post(create_product),
        )
        .route(
            "/seller/inventory/:id",
            get(get_inventory_product)
                .put(update_product)
                .delete(delete_product),
        )
        .route("/seller/inventory/:id/status", post(set_status))
        .route("/seller/orders", get(orders))
        .route("/seller/analytics", get(analytics))
        .route("/seller/profile", get(profile))
}

#[instrument(skip(state, identity), fields(user_id = %identity.user_id))]
pub async fn dashboard(
    State(state): State<AppState>,
    AdminUser(identity): AdminUser,
) -> Result<Json<DashboardResponse>, AppError> {
    let products = services::inventory(state.catalog.as_ref()).await?;
    Ok(Json(services::dashboard(&products)))
}

#[instrument(skip(state, _admin))]
pub async fn list_inventory(
    State(state): State<AppState>,
    _admin: AdminUser,
) -> Result<Json<Vec<ProductView>>, AppError> {
    let products = services::inventory(state.catalog.as_ref()).await?;
    info!(count = products.len(), "inventory listed");
    Ok(Json(products))
}

#[instrument(skip(state, _admin))]
pub async fn get_inventory_product(
    State(state): State<AppState>,
    _admin: AdminUser,
    Path(id): Path<i32>,
) -> Result<Json<ProductView>, AppError> {
    state
        .catalog
        .get_product(id)
        .await?
        .map(Json)
        .ok_or_else(|| AppError::NotFound("Product not found.".into()))
}

#[instrument(skip(state, identity, body), fields(user_id = %identity.user_id))]
pub async fn create_product(
    State(state): State<AppState>,
    AuthUser(identity): AuthUser,
    body: Bytes,
) -> Result<(StatusCode, Json<ActionResult<ProductView>>), AppError> {
    let result = services::add_product(
        state.catalog.as_ref(),
        &state.config.admin,
        &identity,
        &body,
    )
    .await?;
    Ok((StatusCode::CREATED, Json(result)))
}

#[instrument(skip(state, identity, body), fields(user_id = %identity.user_id))]
pub async fn update_product(
    State(state): State<AppState>,
    AuthUser(identity): AuthUser,
    Path(id): Path<i32>,
    body: Bytes,
) -> Result<Json<ActionResult<ProductView>>, AppError> {
    let result = services::update_product(
        state.catalog.as_ref(),
        &state.config.admin,
        &identity,
        id,
        &body,
    )
    .await?;
    Ok(Json(result))
}

#[instrument(skip(state, identity), fields(user_id = %identity.user_id))]
pub async fn delete_product(
    State(state): State<AppState>,
    AuthUser(identity): AuthUser,
    Path(id): Path<i32>,
) -> Result<Json<ActionResult>, AppError> {
    let result =
        services::delete_product(state.catalog.as_ref(), &state.config.admin, &identity, id)
            .await?;
    Ok(Json(result))
}

#[instrument(skip(state, identity, body), fields(user_id = %identity.user_id))]
pub async fn set_status(
    State(state): State<AppState>,
    AuthUser(identity): AuthUser,
    Path(id): Path<i32>,
    body: Bytes,
) -> Result<Json<ActionResult<ProductView>>, AppError> {
    let result = services::set_product_status(
        state.catalog.as_ref(),
        &state.config.admin,
        &identity,
        id,
        &body,
    )
    .await?;
    Ok(Json(result))
}

pub async fn orders(_admin: AdminUser) -> Json<Placeholder> {
    Json(Placeholder {
        title: "Order Management",
        message: "Order management functionality coming soon.",
    })
}

pub async fn analytics(_admin: AdminUser) -> Json<Placeholder> {
    Json(Placeholder {
        title: "Sales Analytics",
        message: "Sales analytics and reporting coming soon.",
    })
}

/// Session view of the signed-in admin.
pub async fn profile(AdminUser(identity): AdminUser) -> Json<Identity> {
    Json(identity)
}
