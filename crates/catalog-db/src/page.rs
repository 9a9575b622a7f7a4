use anyhow::{ensure, Result};
use sqlx::PgConnection;

use catalog_common::models::page::{PageMetadata, PagedResult};

use crate::entity::Entity;
use crate::query::EntityQuery;

/// Materialize one page of an ordered query plus metadata for the full
/// result set.
///
/// The count and the page slice are both derived from `query`, so the
/// metadata always describes the same filter/order basis as the items.
/// A page number beyond the last page yields empty items with
/// still-correct metadata; `has_previous` keeps reflecting the
/// requested page number.
pub async fn to_paged_list<T: Entity>(
    query: &EntityQuery<T>,
    conn: &mut PgConnection,
    page_number: i64,
    page_size: i64,
) -> Result<PagedResult<T>> {
    ensure!(page_number >= 1, "page_number must be at least 1");
    ensure!(page_size >= 1, "page_size must be at least 1");

    let total_count = query.count(conn).await?;
    let items = query
        .fetch_range(conn, (page_number - 1) * page_size, page_size)
        .await?;

    Ok(PagedResult {
        items,
        metadata: PageMetadata::compute(total_count, page_number, page_size),
    })
}
