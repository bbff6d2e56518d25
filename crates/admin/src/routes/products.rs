//! Product management and product images.

use axum::{
    Json,
    extract::{Multipart, Path, State},
    http::StatusCode,
};
use rust_decimal::Decimal;
use serde::Deserialize;
use tracing::instrument;

use luxe_core::ProductId;
use luxe_core::catalog::Product;

use crate::db::products::{self, NewProduct, ProductUpdate};
use crate::error::{AppError, Result};
use crate::services::media::StoredImage;
use crate::services::validation::{validate_new_product, validate_price_update};
use crate::state::AppState;

/// Multipart field carrying the image.
const FILE_FIELD: &str = "file";

#[derive(Debug, Deserialize)]
pub struct CreateProduct {
    pub name: Option<String>,
    pub category: Option<String>,
    pub price: Option<Decimal>,
    #[serde(default)]
    pub image_url: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub material: String,
    pub dimensions: Option<String>,
    #[serde(default)]
    pub stock_quantity: i32,
}

#[derive(Debug, Default, Deserialize)]
pub struct UpdateProduct {
    pub name: Option<String>,
    pub category: Option<String>,
    pub price: Option<Decimal>,
    pub image_url: Option<String>,
    pub description: Option<String>,
    pub material: Option<String>,
    pub dimensions: Option<String>,
    pub stock_quantity: Option<i32>,
    pub taxes: Option<Decimal>,
    pub active: Option<bool>,
}

/// GET /api/products
#[instrument(skip(state))]
pub async fn list(State(state): State<AppState>) -> Result<Json<Vec<Product>>> {
    Ok(Json(
        products::list_products(state.pool(), state.business_id()).await?,
    ))
}

/// GET /api/products/{id}
#[instrument(skip(state))]
pub async fn show(State(state): State<AppState>, Path(id): Path<ProductId>) -> Result<Json<Product>> {
    Ok(Json(existing(&state, id).await?))
}

/// POST /api/products
#[instrument(skip(state, form))]
pub async fn create(
    State(state): State<AppState>,
    Json(form): Json<CreateProduct>,
) -> Result<(StatusCode, Json<Product>)> {
    validate_new_product(form.name.as_deref(), form.price, form.category.as_deref())?;
    let business = state.settings().await?;

    let product = NewProduct {
        name: form.name.unwrap_or_default().trim().to_owned(),
        category: form.category.unwrap_or_default().trim().to_owned(),
        price: form.price.unwrap_or_default(),
        image_url: form.image_url,
        description: form.description,
        material: form.material,
        dimensions: form.dimensions.filter(|d| !d.trim().is_empty()),
        stock_quantity: form.stock_quantity.max(0),
        business_email: business.email,
    };
    let created = products::create_product(state.pool(), state.business_id(), &product).await?;
    tracing::info!(product_id = %created.id, name = %created.name, "Product created");
    Ok((StatusCode::CREATED, Json(created)))
}

/// PATCH /api/products/{id}
#[instrument(skip(state, form))]
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<ProductId>,
    Json(form): Json<UpdateProduct>,
) -> Result<Json<Product>> {
    validate_price_update(form.price)?;
    let update = ProductUpdate {
        name: form.name.map(|n| n.trim().to_owned()),
        category: form.category.map(|c| c.trim().to_owned()),
        price: form.price,
        image_url: form.image_url,
        description: form.description,
        material: form.material,
        dimensions: form.dimensions,
        stock_quantity: form.stock_quantity.map(|q| q.max(0)),
        taxes: form.taxes,
        active: form.active,
    };
    Ok(Json(
        products::update_product(state.pool(), state.business_id(), id, &update).await?,
    ))
}

/// DELETE /api/products/{id}
#[instrument(skip(state))]
pub async fn delete(State(state): State<AppState>, Path(id): Path<ProductId>) -> Result<StatusCode> {
    products::delete_product(state.pool(), state.business_id(), id).await?;
    tracing::info!(product_id = %id, "Product deleted");
    Ok(StatusCode::NO_CONTENT)
}

// =============================================================================
// Images
// =============================================================================

/// GET /api/products/{id}/images
#[instrument(skip(state))]
pub async fn list_images(
    State(state): State<AppState>,
    Path(id): Path<ProductId>,
) -> Result<Json<Vec<StoredImage>>> {
    existing(&state, id).await?;
    let folder = state.settings().await?.storage_folder();
    Ok(Json(state.media().list(&folder, Some(id)).await?))
}

/// POST /api/products/{id}/images (multipart, field `file`)
#[instrument(skip(state, multipart))]
pub async fn upload_image(
    State(state): State<AppState>,
    Path(id): Path<ProductId>,
    multipart: Multipart,
) -> Result<(StatusCode, Json<StoredImage>)> {
    existing(&state, id).await?;
    let (file_name, bytes) = read_file(multipart).await?;
    let folder = state.settings().await?.storage_folder();
    let image = state
        .media()
        .save(&folder, Some(id), &file_name, &bytes)
        .await?;
    Ok((StatusCode::CREATED, Json(image)))
}

/// DELETE /api/products/{id}/images/{name}
#[instrument(skip(state))]
pub async fn delete_image(
    State(state): State<AppState>,
    Path((id, name)): Path<(ProductId, String)>,
) -> Result<StatusCode> {
    existing(&state, id).await?;
    let folder = state.settings().await?.storage_folder();
    state.media().delete(&folder, Some(id), &name).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Upload an image not tied to a product, e.g. before the product exists.
///
/// POST /api/uploads (multipart, field `file`)
#[instrument(skip(state, multipart))]
pub async fn upload(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<(StatusCode, Json<StoredImage>)> {
    let (file_name, bytes) = read_file(multipart).await?;
    let folder = state.settings().await?.storage_folder();
    let image = state.media().save(&folder, None, &file_name, &bytes).await?;
    Ok((StatusCode::CREATED, Json(image)))
}

async fn existing(state: &AppState, id: ProductId) -> Result<Product> {
    products::get_product(state.pool(), state.business_id(), id)
        .await?
        .ok_or_else(|| AppError::NotFound("Product not found".to_owned()))
}

/// File name and body of the `file` field. Other fields are ignored.
async fn read_file(mut multipart: Multipart) -> Result<(String, Vec<u8>)> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(e.body_text()))?
    {
        if field.name() != Some(FILE_FIELD) {
            continue;
        }
        let file_name = field
            .file_name()
            .map(ToOwned::to_owned)
            .ok_or_else(|| AppError::BadRequest("The upload has no file name".to_owned()))?;
        let bytes = field
            .bytes()
            .await
            .map_err(|e| AppError::BadRequest(e.body_text()))?;
        return Ok((file_name, bytes.to_vec()));
    }
    Err(AppError::BadRequest("No file was uploaded".to_owned()))
}
