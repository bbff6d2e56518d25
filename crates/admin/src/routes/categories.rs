//! Category management.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use serde::Deserialize;
use tracing::instrument;

use luxe_core::CategoryId;
use luxe_core::catalog::Category;

use crate::db::categories::{self, CategoryUpdate, NewCategory};
use crate::error::Result;
use crate::services::validation::validate_new_category;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct CreateCategory {
    pub name: Option<String>,
    pub display_name: Option<String>,
    #[serde(default)]
    pub category_code: i32,
}

#[derive(Debug, Default, Deserialize)]
pub struct UpdateCategory {
    pub name: Option<String>,
    pub display_name: Option<String>,
    pub category_code: Option<i32>,
    pub active: Option<bool>,
}

/// GET /api/categories
#[instrument(skip(state))]
pub async fn list(State(state): State<AppState>) -> Result<Json<Vec<Category>>> {
    Ok(Json(
        categories::list_categories(state.pool(), state.business_id()).await?,
    ))
}

/// POST /api/categories
#[instrument(skip(state, form))]
pub async fn create(
    State(state): State<AppState>,
    Json(form): Json<CreateCategory>,
) -> Result<(StatusCode, Json<Category>)> {
    validate_new_category(form.name.as_deref(), form.display_name.as_deref())?;
    let business = state.settings().await?;

    let category = NewCategory {
        name: form.name.unwrap_or_default().trim().to_owned(),
        display_name: form.display_name.unwrap_or_default().trim().to_owned(),
        category_code: form.category_code,
        business_email: business.email,
    };
    let created = categories::create_category(state.pool(), state.business_id(), &category).await?;
    tracing::info!(category_id = %created.id, name = %created.name, "Category created");
    Ok((StatusCode::CREATED, Json(created)))
}

/// PATCH /api/categories/{id}
#[instrument(skip(state, form))]
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<CategoryId>,
    Json(form): Json<UpdateCategory>,
) -> Result<Json<Category>> {
    let update = CategoryUpdate {
        name: form.name.map(|n| n.trim().to_owned()),
        display_name: form.display_name.map(|n| n.trim().to_owned()),
        category_code: form.category_code,
        active: form.active,
    };
    Ok(Json(
        categories::update_category(state.pool(), state.business_id(), id, &update).await?,
    ))
}

/// DELETE /api/categories/{id}
#[instrument(skip(state))]
pub async fn delete(State(state): State<AppState>, Path(id): Path<CategoryId>) -> Result<StatusCode> {
    categories::delete_category(state.pool(), state.business_id(), id).await?;
    tracing::info!(category_id = %id, "Category deleted");
    Ok(StatusCode::NO_CONTENT)
}
