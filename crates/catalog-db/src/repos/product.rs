use anyhow::Result;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::query_builder::Separated;
use sqlx::Postgres;

use catalog_common::models::page::{PagedResult, PageParams};

use crate::entity::Entity;
use crate::query::EntityQuery;
use crate::repos::generic::Repository;

/// Catalog product row. Every product belongs to exactly one category.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Product {
    pub product_id: i32,
    pub name: String,
    pub description: String,
    pub price: Decimal,
    pub image_url: String,
    pub stock: f32,
    pub registered_at: DateTime<Utc>,
    pub category_id: i32,
}

impl Product {
    /// A not-yet-persisted product, registered now; the identity is
    /// generated at insert time.
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        price: Decimal,
        image_url: impl Into<String>,
        stock: f32,
        category_id: i32,
    ) -> Self {
        Self {
            product_id: 0,
            name: name.into(),
            description: description.into(),
            price,
            image_url: image_url.into(),
            stock,
            registered_at: Utc::now(),
            category_id,
        }
    }
}

impl Entity for Product {
    const TABLE: &'static str = "product";
    const ID_COLUMN: &'static str = "product_id";
    const COLUMNS: &'static str =
        "product_id, name, description, price, image_url, stock, registered_at, category_id";
    const INSERT_COLUMNS: &'static str =
        "name, description, price, image_url, stock, registered_at, category_id";

    fn id(&self) -> i32 {
        self.product_id
    }

    fn push_insert_values(&self, values: &mut Separated<'_, '_, Postgres, &'static str>) {
        values.push_bind(self.name.clone());
        values.push_bind(self.description.clone());
        values.push_bind(self.price);
        values.push_bind(self.image_url.clone());
        values.push_bind(self.stock);
        values.push_bind(self.registered_at);
        values.push_bind(self.category_id);
    }

    fn push_update_assignments(&self, assignments: &mut Separated<'_, '_, Postgres, &'static str>) {
        assignments.push("name = ");
        assignments.push_bind_unseparated(self.name.clone());
        assignments.push("description = ");
        assignments.push_bind_unseparated(self.description.clone());
        assignments.push("price = ");
        assignments.push_bind_unseparated(self.price);
        assignments.push("image_url = ");
        assignments.push_bind_unseparated(self.image_url.clone());
        assignments.push("stock = ");
        assignments.push_bind_unseparated(self.stock);
        assignments.push("registered_at = ");
        assignments.push_bind_unseparated(self.registered_at);
        assignments.push("category_id = ");
        assignments.push_bind_unseparated(self.category_id);
    }
}

/// Product queries on top of the generic repository.
pub struct ProductRepository<'u> {
    inner: Repository<'u, Product>,
}

impl<'u> ProductRepository<'u> {
    pub(crate) fn new(inner: Repository<'u, Product>) -> Self {
        Self { inner }
    }

    /// One page of products, ordered by name.
    pub async fn paged(&mut self, params: PageParams) -> Result<PagedResult<Product>> {
        let query = EntityQuery::all().order_by("name");
        self.inner.paged(&query, params).await
    }

    pub async fn by_id(&mut self, id: i32) -> Result<Option<Product>> {
        self.inner
            .find_one(EntityQuery::all().filter("product_id =", id))
            .await
    }

    /// Every product, cheapest first.
    pub async fn by_price(&mut self) -> Result<Vec<Product>> {
        self.inner
            .query(&EntityQuery::all().order_by("price"))
            .await
    }

    /// Products owned by one category.
    pub async fn by_category(&mut self, category_id: i32) -> Result<Vec<Product>> {
        self.inner
            .query(
                &EntityQuery::all()
                    .filter("category_id =", category_id)
                    .order_by(Product::ID_COLUMN),
            )
            .await
    }

    pub async fn get_all(&mut self) -> Result<Vec<Product>> {
        self.inner.get_all().await
    }

    pub async fn add(&mut self, product: &Product) -> Result<Product> {
        self.inner.add(product).await
    }

    pub async fn update(&mut self, product: &Product) -> Result<()> {
        self.inner.update(product).await
    }

    pub async fn delete(&mut self, product: &Product) -> Result<()> {
        self.inner.delete(product).await
    }
}
