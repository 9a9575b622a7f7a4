use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Deserialize;
use std::sync::Arc;

use catalog_common::models::page::PageParams;
use catalog_common::validation::{validate_page_params, validate_product, FieldError};
use catalog_db::{Product, UnitOfWork};

use crate::error::ApiError;
use crate::state::AppState;
use crate::web::api::categories::paged_response;
use crate::web::api::middleware::AuthUser;

#[derive(Debug, Deserialize)]
pub struct ProductPayload {
    #[serde(default)]
    pub product_id: i32,
    pub name: String,
    pub description: String,
    pub price: Decimal,
    pub image_url: String,
    #[serde(default)]
    pub stock: f32,
    pub registered_at: Option<DateTime<Utc>>,
    pub category_id: i32,
}

/// GET /api/products
#[tracing::instrument(skip(state, _auth))]
pub async fn list_products(
    State(state): State<Arc<AppState>>,
    _auth: AuthUser,
    Query(params): Query<PageParams>,
) -> Result<Response, ApiError> {
    validate_page_params(&params).map_err(ApiError::validation)?;

    let mut uow = UnitOfWork::begin(&state.pool).await?;
    let page = uow.products().paged(params).await?;
    paged_response(page)
}

/// GET /api/products/lowest-price
#[tracing::instrument(skip(state, _auth))]
pub async fn list_by_price(
    State(state): State<Arc<AppState>>,
    _auth: AuthUser,
) -> Result<Json<Vec<Product>>, ApiError> {
    let mut uow = UnitOfWork::begin(&state.pool).await?;
    let products = uow.products().by_price().await?;
    Ok(Json(products))
}

/// GET /api/products/{id}
#[tracing::instrument(skip(state, _auth))]
pub async fn get_product(
    State(state): State<Arc<AppState>>,
    _auth: AuthUser,
    Path(id): Path<i32>,
) -> Result<Json<Product>, ApiError> {
    let mut uow = UnitOfWork::begin(&state.pool).await?;
    let product = uow
        .products()
        .by_id(id)
        .await?
        .ok_or_else(|| ApiError::not_found("Product", id))?;
    Ok(Json(product))
}

/// POST /api/products
#[tracing::instrument(skip(state, _auth, payload))]
pub async fn create_product(
    State(state): State<Arc<AppState>>,
    _auth: AuthUser,
    Json(payload): Json<ProductPayload>,
) -> Result<Response, ApiError> {
    validate_product(&payload.name, &payload.description, &payload.image_url)
        .map_err(ApiError::validation)?;

    let mut product = Product::new(
        payload.name,
        payload.description,
        payload.price,
        payload.image_url,
        payload.stock,
        payload.category_id,
    );
    if let Some(registered_at) = payload.registered_at {
        product.registered_at = registered_at;
    }

    let mut uow = UnitOfWork::begin(&state.pool).await?;
    let created = uow.products().add(&product).await?;
    uow.commit().await?;

    Ok((StatusCode::CREATED, Json(created)).into_response())
}

/// PUT /api/products/{id}
#[tracing::instrument(skip(state, _auth, payload))]
pub async fn update_product(
    State(state): State<Arc<AppState>>,
    _auth: AuthUser,
    Path(id): Path<i32>,
    Json(payload): Json<ProductPayload>,
) -> Result<Json<Product>, ApiError> {
    if payload.product_id != id {
        return Err(ApiError::validation(vec![FieldError::new(
            "product_id",
            "body id must match the path id",
        )]));
    }
    validate_product(&payload.name, &payload.description, &payload.image_url)
        .map_err(ApiError::validation)?;

    let product = Product {
        product_id: id,
        name: payload.name,
        description: payload.description,
        price: payload.price,
        image_url: payload.image_url,
        stock: payload.stock,
        registered_at: payload.registered_at.unwrap_or_else(Utc::now),
        category_id: payload.category_id,
    };

    let mut uow = UnitOfWork::begin(&state.pool).await?;
    uow.products().update(&product).await?;
    uow.commit().await?;

    Ok(Json(product))
}

/// DELETE /api/products/{id}
#[tracing::instrument(skip(state, _auth))]
pub async fn delete_product(
    State(state): State<Arc<AppState>>,
    _auth: AuthUser,
    Path(id): Path<i32>,
) -> Result<Json<Product>, ApiError> {
    let mut uow = UnitOfWork::begin(&state.pool).await?;
    let product = uow
        .products()
        .by_id(id)
        .await?
        .ok_or_else(|| ApiError::not_found("Product", id))?;

    uow.products().delete(&product).await?;
    uow.commit().await?;

    Ok(Json(product))
}
