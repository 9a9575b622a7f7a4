use anyhow::Result;
use serde::{Deserialize, Serialize};
use sqlx::query_builder::Separated;
use sqlx::Postgres;

use catalog_common::models::page::{PagedResult, PageParams};

use crate::entity::Entity;
use crate::query::EntityQuery;
use crate::repos::generic::Repository;
use crate::repos::product::Product;

/// Catalog category row. The product collection it owns is reached by
/// query (`with_products`), never stored on the struct.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Category {
    pub category_id: i32,
    pub name: String,
    pub image_url: String,
}

impl Category {
    /// A not-yet-persisted category; the identity is generated at
    /// insert time.
    pub fn new(name: impl Into<String>, image_url: impl Into<String>) -> Self {
        Self {
            category_id: 0,
            name: name.into(),
            image_url: image_url.into(),
        }
    }
}

impl Entity for Category {
    const TABLE: &'static str = "category";
    const ID_COLUMN: &'static str = "category_id";
    const COLUMNS: &'static str = "category_id, name, image_url";
    const INSERT_COLUMNS: &'static str = "name, image_url";

    fn id(&self) -> i32 {
        self.category_id
    }

    fn push_insert_values(&self, values: &mut Separated<'_, '_, Postgres, &'static str>) {
        values.push_bind(self.name.clone());
        values.push_bind(self.image_url.clone());
    }

    fn push_update_assignments(&self, assignments: &mut Separated<'_, '_, Postgres, &'static str>) {
        assignments.push("name = ");
        assignments.push_bind_unseparated(self.name.clone());
        assignments.push("image_url = ");
        assignments.push_bind_unseparated(self.image_url.clone());
    }
}

/// A category together with its eagerly loaded products.
#[derive(Debug, Clone, Serialize)]
pub struct CategoryWithProducts {
    #[serde(flatten)]
    pub category: Category,
    pub products: Vec<Product>,
}

/// Category queries on top of the generic repository.
pub struct CategoryRepository<'u> {
    inner: Repository<'u, Category>,
}

impl<'u> CategoryRepository<'u> {
    pub(crate) fn new(inner: Repository<'u, Category>) -> Self {
        Self { inner }
    }

    /// One page of categories, ordered by identity.
    pub async fn paged(&mut self, params: PageParams) -> Result<PagedResult<Category>> {
        let query = EntityQuery::all().order_by(Category::ID_COLUMN);
        self.inner.paged(&query, params).await
    }

    pub async fn by_id(&mut self, id: i32) -> Result<Option<Category>> {
        self.inner
            .find_one(EntityQuery::all().filter("category_id =", id))
            .await
    }

    /// All categories with their product collections eagerly included.
    /// The include runs as one follow-up query grouped in memory, so
    /// a category with zero products still appears, with an empty
    /// collection.
    pub async fn with_products(&mut self) -> Result<Vec<CategoryWithProducts>> {
        let categories = self
            .inner
            .query(&EntityQuery::all().order_by(Category::ID_COLUMN))
            .await?;
        let products = EntityQuery::<Product>::all()
            .order_by(Product::ID_COLUMN)
            .fetch(self.inner.conn())
            .await?;

        let mut grouped: Vec<CategoryWithProducts> = categories
            .into_iter()
            .map(|category| CategoryWithProducts {
                category,
                products: Vec::new(),
            })
            .collect();
        for product in products {
            if let Some(entry) = grouped
                .iter_mut()
                .find(|e| e.category.category_id == product.category_id)
            {
                entry.products.push(product);
            }
        }
        Ok(grouped)
    }

    pub async fn get_all(&mut self) -> Result<Vec<Category>> {
        self.inner.get_all().await
    }

    pub async fn add(&mut self, category: &Category) -> Result<Category> {
        self.inner.add(category).await
    }

    pub async fn update(&mut self, category: &Category) -> Result<()> {
        self.inner.update(category).await
    }

    pub async fn delete(&mut self, category: &Category) -> Result<()> {
        self.inner.delete(category).await
    }
}
