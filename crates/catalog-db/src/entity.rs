use sqlx::postgres::PgRow;
use sqlx::query_builder::Separated;
use sqlx::Postgres;

/// Metadata and bind hooks a record type must provide so the generic
/// repository and query machinery can build statements for it.
///
/// `COLUMNS` is the full select list; `INSERT_COLUMNS` excludes the
/// generated identity column, which the store assigns on insert.
pub trait Entity: for<'r> sqlx::FromRow<'r, PgRow> + Send + Unpin {
    const TABLE: &'static str;
    const ID_COLUMN: &'static str;
    const COLUMNS: &'static str;
    const INSERT_COLUMNS: &'static str;

    /// Identity value, used for update/delete targeting.
    fn id(&self) -> i32;

    /// Bind this entity's non-identity values, in `INSERT_COLUMNS`
    /// order.
    fn push_insert_values(&self, values: &mut Separated<'_, '_, Postgres, &'static str>);

    /// Push `column = <bind>` assignments for a full-record replace,
    /// covering every non-identity column.
    fn push_update_assignments(&self, assignments: &mut Separated<'_, '_, Postgres, &'static str>);
}
