use std::marker::PhantomData;

use anyhow::{Context, Result};
use sqlx::{PgConnection, QueryBuilder};

use catalog_common::models::page::{PagedResult, PageParams};

use crate::entity::Entity;
use crate::page::to_paged_list;
use crate::query::EntityQuery;

/// Generic CRUD over one entity type, bound to an open unit-of-work
/// transaction. Mutations execute inside that transaction immediately
/// but become durable only when the owning unit of work commits;
/// dropping the unit of work discards them.
pub struct Repository<'u, T: Entity> {
    conn: &'u mut PgConnection,
    affected: &'u mut u64,
    misses: &'u mut Vec<String>,
    _entity: PhantomData<T>,
}

impl<'u, T: Entity> Repository<'u, T> {
    pub(crate) fn new(
        conn: &'u mut PgConnection,
        affected: &'u mut u64,
        misses: &'u mut Vec<String>,
    ) -> Self {
        Self {
            conn,
            affected,
            misses,
            _entity: PhantomData,
        }
    }

    pub(crate) fn conn(&mut self) -> &mut PgConnection {
        self.conn
    }

    /// Every row, unfiltered and unordered.
    pub async fn get_all(&mut self) -> Result<Vec<T>> {
        EntityQuery::<T>::all().fetch(self.conn).await
    }

    pub async fn query(&mut self, query: &EntityQuery<T>) -> Result<Vec<T>> {
        query.fetch(self.conn).await
    }

    /// At most one match; see `EntityQuery::fetch_one` for the
    /// multiple-match contract.
    pub async fn find_one(&mut self, query: EntityQuery<T>) -> Result<Option<T>> {
        query.fetch_one(self.conn).await
    }

    pub async fn paged(
        &mut self,
        query: &EntityQuery<T>,
        params: PageParams,
    ) -> Result<PagedResult<T>> {
        to_paged_list(query, self.conn, params.page_number, params.page_size).await
    }

    /// Stage an insert and return the row as stored, including the
    /// generated identity.
    pub async fn add(&mut self, entity: &T) -> Result<T> {
        let mut qb = QueryBuilder::new(format!(
            "INSERT INTO {} ({}) VALUES (",
            T::TABLE,
            T::INSERT_COLUMNS
        ));
        {
            let mut values = qb.separated(", ");
            entity.push_insert_values(&mut values);
        }
        qb.push(format!(") RETURNING {}", T::COLUMNS));

        let inserted = qb
            .build_query_as::<T>()
            .fetch_one(&mut *self.conn)
            .await
            .with_context(|| format!("Failed to insert into {}", T::TABLE))?;
        *self.affected += 1;
        Ok(inserted)
    }

    /// Stage a full-record replace by identity. Matching zero rows is
    /// silent here; the miss surfaces as a store-level error when the
    /// owning unit of work commits.
    pub async fn update(&mut self, entity: &T) -> Result<()> {
        let mut qb = QueryBuilder::new(format!("UPDATE {} SET ", T::TABLE));
        {
            let mut assignments = qb.separated(", ");
            entity.push_update_assignments(&mut assignments);
        }
        qb.push(format!(" WHERE {} = ", T::ID_COLUMN));
        qb.push_bind(entity.id());

        let result = qb
            .build()
            .execute(&mut *self.conn)
            .await
            .with_context(|| format!("Failed to update {}", T::TABLE))?;
        if result.rows_affected() == 0 {
            self.misses.push(format!(
                "no row in {} with {} = {}",
                T::TABLE,
                T::ID_COLUMN,
                entity.id()
            ));
        }
        *self.affected += result.rows_affected();
        Ok(())
    }

    /// Stage a removal by identity.
    pub async fn delete(&mut self, entity: &T) -> Result<()> {
        let mut qb = QueryBuilder::new(format!(
            "DELETE FROM {} WHERE {} = ",
            T::TABLE,
            T::ID_COLUMN
        ));
        qb.push_bind(entity.id());

        let result = qb
            .build()
            .execute(&mut *self.conn)
            .await
            .with_context(|| format!("Failed to delete from {}", T::TABLE))?;
        *self.affected += result.rows_affected();
        Ok(())
    }
}
