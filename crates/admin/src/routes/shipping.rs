//! Shipping method management.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use rust_decimal::Decimal;
use serde::Deserialize;
use tracing::instrument;

use luxe_core::ShippingMethodId;
use luxe_core::order::ShippingMethod;

use crate::db::shipping::{self, NewShippingMethod, ShippingMethodUpdate};
use crate::error::Result;
use crate::services::validation::{
    validate_delivery_days, validate_new_shipping_method, validate_price_update,
};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct CreateShippingMethod {
    pub description: Option<String>,
    pub price: Option<Decimal>,
    #[serde(default)]
    pub delivery_days: i32,
}

#[derive(Debug, Default, Deserialize)]
pub struct UpdateShippingMethod {
    pub description: Option<String>,
    pub price: Option<Decimal>,
    pub delivery_days: Option<i32>,
    pub active: Option<bool>,
}

/// GET /api/shipping-methods
#[instrument(skip(state))]
pub async fn list(State(state): State<AppState>) -> Result<Json<Vec<ShippingMethod>>> {
    Ok(Json(
        shipping::list_methods(state.pool(), state.business_id()).await?,
    ))
}

/// POST /api/shipping-methods
#[instrument(skip(state, form))]
pub async fn create(
    State(state): State<AppState>,
    Json(form): Json<CreateShippingMethod>,
) -> Result<(StatusCode, Json<ShippingMethod>)> {
    validate_new_shipping_method(form.description.as_deref(), form.price, form.delivery_days)?;

    let method = NewShippingMethod {
        description: form.description.unwrap_or_default().trim().to_owned(),
        price: form.price.unwrap_or_default(),
        delivery_days: form.delivery_days,
    };
    let created = shipping::create_method(state.pool(), state.business_id(), &method).await?;
    tracing::info!(shipping_method_id = %created.id, "Shipping method created");
    Ok((StatusCode::CREATED, Json(created)))
}

/// PATCH /api/shipping-methods/{id}
#[instrument(skip(state, form))]
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<ShippingMethodId>,
    Json(form): Json<UpdateShippingMethod>,
) -> Result<Json<ShippingMethod>> {
    validate_price_update(form.price)?;
    validate_delivery_days(form.delivery_days)?;
    let update = ShippingMethodUpdate {
        description: form.description.map(|d| d.trim().to_owned()),
        price: form.price,
        delivery_days: form.delivery_days.map(|d| d.max(0)),
        active: form.active,
    };
    Ok(Json(
        shipping::update_method(state.pool(), state.business_id(), id, &update).await?,
    ))
}

/// DELETE /api/shipping-methods/{id}
#[instrument(skip(state))]
pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<ShippingMethodId>,
) -> Result<StatusCode> {
    shipping::delete_method(state.pool(), state.business_id(), id).await?;
    tracing::info!(shipping_method_id = %id, "Shipping method deleted");
    Ok(StatusCode::NO_CONTENT)
}
