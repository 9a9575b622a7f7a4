use std::marker::PhantomData;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::{PgConnection, Postgres, QueryBuilder};

use crate::entity::Entity;

/// A bindable filter value. Covers the column types the catalog
/// entities use; extend alongside the entity set.
#[derive(Debug, Clone)]
pub enum SqlValue {
    Int(i32),
    BigInt(i64),
    Text(String),
    Numeric(Decimal),
    Timestamp(DateTime<Utc>),
}

impl From<i32> for SqlValue {
    fn from(v: i32) -> Self {
        SqlValue::Int(v)
    }
}

impl From<i64> for SqlValue {
    fn from(v: i64) -> Self {
        SqlValue::BigInt(v)
    }
}

impl From<&str> for SqlValue {
    fn from(v: &str) -> Self {
        SqlValue::Text(v.to_string())
    }
}

impl From<String> for SqlValue {
    fn from(v: String) -> Self {
        SqlValue::Text(v)
    }
}

impl From<Decimal> for SqlValue {
    fn from(v: Decimal) -> Self {
        SqlValue::Numeric(v)
    }
}

impl From<DateTime<Utc>> for SqlValue {
    fn from(v: DateTime<Utc>) -> Self {
        SqlValue::Timestamp(v)
    }
}

#[derive(Debug, Clone, Copy)]
pub enum Direction {
    Asc,
    Desc,
}

impl Direction {
    fn sql(self) -> &'static str {
        match self {
            Direction::Asc => "ASC",
            Direction::Desc => "DESC",
        }
    }
}

/// A lazy, composable query over one entity type: filters, ordering,
/// counting, and bounded range retrieval. Nothing touches the store
/// until one of the fetch/count methods runs, and every method builds
/// its statement from the same declarative state, so a count and a
/// page fetched from one `EntityQuery` always share an identical
/// predicate+order basis.
#[derive(Debug, Clone)]
pub struct EntityQuery<T: Entity> {
    filters: Vec<(&'static str, SqlValue)>,
    order: Vec<(&'static str, Direction)>,
    _entity: PhantomData<T>,
}

impl<T: Entity> Default for EntityQuery<T> {
    fn default() -> Self {
        Self::all()
    }
}

impl<T: Entity> EntityQuery<T> {
    /// Unfiltered, unordered query over the whole table.
    pub fn all() -> Self {
        Self {
            filters: Vec::new(),
            order: Vec::new(),
            _entity: PhantomData,
        }
    }

    /// Add an AND-combined filter. `expr` is a trusted column/operator
    /// fragment such as `"category_id ="`; the value is always bound,
    /// never interpolated.
    pub fn filter(mut self, expr: &'static str, value: impl Into<SqlValue>) -> Self {
        self.filters.push((expr, value.into()));
        self
    }

    pub fn order_by(mut self, column: &'static str) -> Self {
        self.order.push((column, Direction::Asc));
        self
    }

    pub fn order_by_desc(mut self, column: &'static str) -> Self {
        self.order.push((column, Direction::Desc));
        self
    }

    fn push_where(&self, qb: &mut QueryBuilder<'_, Postgres>) {
        if self.filters.is_empty() {
            return;
        }
        qb.push(" WHERE ");
        let mut conditions = qb.separated(" AND ");
        for (expr, value) in &self.filters {
            conditions.push(*expr);
            conditions.push_unseparated(" ");
            match value {
                SqlValue::Int(v) => conditions.push_bind_unseparated(*v),
                SqlValue::BigInt(v) => conditions.push_bind_unseparated(*v),
                SqlValue::Text(v) => conditions.push_bind_unseparated(v.clone()),
                SqlValue::Numeric(v) => conditions.push_bind_unseparated(*v),
                SqlValue::Timestamp(v) => conditions.push_bind_unseparated(*v),
            };
        }
    }

    fn push_order(&self, qb: &mut QueryBuilder<'_, Postgres>) {
        if self.order.is_empty() {
            return;
        }
        let keys = self
            .order
            .iter()
            .map(|(column, direction)| format!("{column} {}", direction.sql()))
            .collect::<Vec<_>>()
            .join(", ");
        qb.push(" ORDER BY ");
        qb.push(keys);
    }

    fn select(&self) -> QueryBuilder<'static, Postgres> {
        let mut qb = QueryBuilder::new(format!("SELECT {} FROM {}", T::COLUMNS, T::TABLE));
        self.push_where(&mut qb);
        self.push_order(&mut qb);
        qb
    }

    /// Count the matching rows without materializing them.
    pub async fn count(&self, conn: &mut PgConnection) -> Result<i64> {
        let mut qb = QueryBuilder::new(format!("SELECT COUNT(*) FROM {}", T::TABLE));
        self.push_where(&mut qb);
        let count = qb
            .build_query_scalar::<i64>()
            .fetch_one(conn)
            .await
            .with_context(|| format!("Failed to count rows in {}", T::TABLE))?;
        Ok(count)
    }

    /// Fetch every matching row.
    pub async fn fetch(&self, conn: &mut PgConnection) -> Result<Vec<T>> {
        let mut qb = self.select();
        let rows = qb
            .build_query_as::<T>()
            .fetch_all(conn)
            .await
            .with_context(|| format!("Failed to query {}", T::TABLE))?;
        Ok(rows)
    }

    /// Fetch at most one matching row. With multiple matches the first
    /// one wins, with no ordering guarantee unless the query was
    /// ordered first.
    pub async fn fetch_one(&self, conn: &mut PgConnection) -> Result<Option<T>> {
        let mut qb = self.select();
        qb.push(" LIMIT 1");
        let row = qb
            .build_query_as::<T>()
            .fetch_optional(conn)
            .await
            .with_context(|| format!("Failed to query {}", T::TABLE))?;
        Ok(row)
    }

    /// Fetch a bounded range: skip `offset` rows, take `limit`.
    /// Skipped rows stay in the store; OFFSET/LIMIT never loads them.
    pub async fn fetch_range(
        &self,
        conn: &mut PgConnection,
        offset: i64,
        limit: i64,
    ) -> Result<Vec<T>> {
        let mut qb = self.select();
        qb.push(" LIMIT ");
        qb.push_bind(limit);
        qb.push(" OFFSET ");
        qb.push_bind(offset);
        let rows = qb
            .build_query_as::<T>()
            .fetch_all(conn)
            .await
            .with_context(|| format!("Failed to query {}", T::TABLE))?;
        Ok(rows)
    }
}
