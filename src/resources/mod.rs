//! Resource CRUD shared between the deployment variants.
//!
//! Both resource kinds are thin rows over a single table, so the list and
//! delete paths are table-parameterized helpers; each kind keeps only its
//! own row type, inputs and resolvers.

use sqlx::postgres::PgRow;
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use crate::error::ApiError;

pub mod course;
pub mod product;

pub(crate) async fn list_all<T>(db: &PgPool, sql: &str) -> Result<Vec<T>, ApiError>
where
    T: for<'r> FromRow<'r, PgRow> + Send + Unpin,
{
    let rows = sqlx::query_as::<_, T>(sql).fetch_all(db).await?;
    Ok(rows)
}

pub(crate) async fn delete_by_id(db: &PgPool, table: &str, id: Uuid) -> Result<bool, ApiError> {
    let sql = format!("DELETE FROM {table} WHERE id = $1");
    let result = sqlx::query(&sql).bind(id).execute(db).await?;
    Ok(result.rows_affected() > 0)
}
