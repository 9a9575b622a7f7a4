use axum::{
    extract::{Path, Query, State},
    http::{HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::Deserialize;
use std::sync::Arc;

use catalog_common::models::page::{PagedResult, PageParams};
use catalog_common::validation::{validate_category, validate_page_params, FieldError};
use catalog_db::{Category, Product, UnitOfWork};

use crate::error::ApiError;
use crate::state::AppState;
use crate::web::api::middleware::AuthUser;

/// Attach the page metadata to the body as the `x-pagination` header.
pub(crate) fn paged_response<T: serde::Serialize>(
    page: PagedResult<T>,
) -> Result<Response, ApiError> {
    let metadata = serde_json::to_string(&page.metadata)
        .map_err(|e| ApiError::Persistence(e.into()))?;
    let mut response = Json(page.items).into_response();
    response.headers_mut().insert(
        "x-pagination",
        HeaderValue::from_str(&metadata).map_err(|e| ApiError::Persistence(e.into()))?,
    );
    Ok(response)
}

#[derive(Debug, Deserialize)]
pub struct CategoryPayload {
    #[serde(default)]
    pub category_id: i32,
    pub name: String,
    pub image_url: String,
}

/// GET /api/categories
#[tracing::instrument(skip(state, _auth))]
pub async fn list_categories(
    State(state): State<Arc<AppState>>,
    _auth: AuthUser,
    Query(params): Query<PageParams>,
) -> Result<Response, ApiError> {
    validate_page_params(&params).map_err(ApiError::validation)?;

    let mut uow = UnitOfWork::begin(&state.pool).await?;
    let page = uow.categories().paged(params).await?;
    paged_response(page)
}

/// GET /api/categories/products
#[tracing::instrument(skip(state, _auth))]
pub async fn list_with_products(
    State(state): State<Arc<AppState>>,
    _auth: AuthUser,
) -> Result<Response, ApiError> {
    let mut uow = UnitOfWork::begin(&state.pool).await?;
    let categories = uow.categories().with_products().await?;
    Ok(Json(categories).into_response())
}

/// GET /api/categories/{id}
#[tracing::instrument(skip(state, _auth))]
pub async fn get_category(
    State(state): State<Arc<AppState>>,
    _auth: AuthUser,
    Path(id): Path<i32>,
) -> Result<Json<Category>, ApiError> {
    let mut uow = UnitOfWork::begin(&state.pool).await?;
    let category = uow
        .categories()
        .by_id(id)
        .await?
        .ok_or_else(|| ApiError::not_found("Category", id))?;
    Ok(Json(category))
}

/// GET /api/categories/{id}/products
#[tracing::instrument(skip(state, _auth))]
pub async fn list_category_products(
    State(state): State<Arc<AppState>>,
    _auth: AuthUser,
    Path(id): Path<i32>,
) -> Result<Json<Vec<Product>>, ApiError> {
    let mut uow = UnitOfWork::begin(&state.pool).await?;
    if uow.categories().by_id(id).await?.is_none() {
        return Err(ApiError::not_found("Category", id));
    }
    let products = uow.products().by_category(id).await?;
    Ok(Json(products))
}

/// POST /api/categories
#[tracing::instrument(skip(state, _auth, payload))]
pub async fn create_category(
    State(state): State<Arc<AppState>>,
    _auth: AuthUser,
    Json(payload): Json<CategoryPayload>,
) -> Result<Response, ApiError> {
    validate_category(&payload.name, &payload.image_url).map_err(ApiError::validation)?;

    let mut uow = UnitOfWork::begin(&state.pool).await?;
    let created = uow
        .categories()
        .add(&Category::new(payload.name, payload.image_url))
        .await?;
    uow.commit().await?;

    Ok((StatusCode::CREATED, Json(created)).into_response())
}

/// PUT /api/categories/{id}
#[tracing::instrument(skip(state, _auth, payload))]
pub async fn update_category(
    State(state): State<Arc<AppState>>,
    _auth: AuthUser,
    Path(id): Path<i32>,
    Json(payload): Json<CategoryPayload>,
) -> Result<Json<Category>, ApiError> {
    if payload.category_id != id {
        return Err(ApiError::validation(vec![FieldError::new(
            "category_id",
            "body id must match the path id",
        )]));
    }
    validate_category(&payload.name, &payload.image_url).map_err(ApiError::validation)?;

    let category = Category {
        category_id: id,
        name: payload.name,
        image_url: payload.image_url,
    };

    let mut uow = UnitOfWork::begin(&state.pool).await?;
    uow.categories().update(&category).await?;
    uow.commit().await?;

    Ok(Json(category))
}

/// DELETE /api/categories/{id}
///
/// A category that still owns products is not deletable; the store's
/// referential policy rejects the delete and it surfaces as a
/// persistence error.
#[tracing::instrument(skip(state, _auth))]
pub async fn delete_category(
    State(state): State<Arc<AppState>>,
    _auth: AuthUser,
    Path(id): Path<i32>,
) -> Result<Json<Category>, ApiError> {
    let mut uow = UnitOfWork::begin(&state.pool).await?;
    let category = uow
        .categories()
        .by_id(id)
        .await?
        .ok_or_else(|| ApiError::not_found("Category", id))?;

    uow.categories().delete(&category).await?;
    uow.commit().await?;

    Ok(Json(category))
}
