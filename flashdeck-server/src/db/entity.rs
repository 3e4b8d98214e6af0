//! Entity metadata consumed by the generic repository

use sqlx::postgres::PgRow;
use sqlx::query_builder::Separated;
use sqlx::{FromRow, Postgres};

/// A child collection reachable from an entity, eagerly loadable through
/// [`Repo::get_by_id`](super::repo::Repo::get_by_id) prefetch.
#[derive(Debug, Clone, Copy)]
pub struct Relation {
    /// Name callers use to request the prefetch.
    pub name: &'static str,
    /// Table holding the child rows.
    pub table: &'static str,
    /// Column on the child table referencing the parent id.
    pub foreign_key: &'static str,
}

/// A persisted row type the generic repository can operate on.
///
/// Implementors describe their table shape as constants and bind their own
/// column values; the repository assembles the SQL. `COLUMNS` excludes the
/// id, which the store assigns.
pub trait Entity: for<'r> FromRow<'r, PgRow> + Send + Unpin {
    const TABLE: &'static str;
    const COLUMNS: &'static [&'static str];
    const RELATIONS: &'static [Relation] = &[];

    /// The assigned identifier, if this instance has been persisted.
    fn id(&self) -> Option<i64>;

    /// Record the store-assigned identifier after an insert.
    fn set_id(&mut self, id: i64);

    /// Bind this instance's non-id column values, in `COLUMNS` order.
    fn push_column_values(&self, row: &mut Separated<'_, '_, Postgres, &'static str>);

    /// Decode prefetched child rows into this instance.
    fn attach_related(&mut self, relation: &'static str, rows: Vec<PgRow>) -> sqlx::Result<()> {
        let _ = (relation, rows);
        Ok(())
    }
}
