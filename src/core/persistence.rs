//! Shared MySQL plumbing for the resource repositories.

use sqlx::mysql::MySqlRow;
use sqlx::{FromRow, MySql, MySqlConnection, MySqlPool, QueryBuilder};

use crate::core::query::ResourceQuery;
use crate::core::validation::Enumerated;
use crate::core::{AppError, Result};

/// Push ` AND (LOWER(a) LIKE ? OR LOWER(b) LIKE ? ...)` for a search pattern
pub fn push_search(builder: &mut QueryBuilder<'_, MySql>, columns: &[&str], pattern: &str) {
    builder.push(" AND (");
    for (idx, column) in columns.iter().enumerate() {
        if idx > 0 {
            builder.push(" OR ");
        }
        builder
            .push(format!("LOWER(COALESCE({}, '')) LIKE ", column))
            .push_bind(pattern.to_string());
    }
    builder.push(")");
}

/// Count and read one page inside the caller's connection or transaction.
///
/// `push_filters` appends the WHERE clause and is run once for the count and
/// once for the page so both see identical conditions. Rows are ordered by
/// `id`, which is insertion order for AUTO_INCREMENT keys.
pub async fn fetch_page<T, F, Q>(
    conn: &mut MySqlConnection,
    columns: &str,
    table: &str,
    query: &ResourceQuery<Q>,
    push_filters: F,
) -> Result<(Vec<T>, u64)>
where
    T: for<'r> FromRow<'r, MySqlRow> + Send + Unpin,
    F: Fn(&mut QueryBuilder<'_, MySql>),
{
    let mut count = QueryBuilder::<MySql>::new(format!("SELECT COUNT(*) FROM {} WHERE 1 = 1", table));
    push_filters(&mut count);
    let total: i64 = count.build_query_scalar().fetch_one(&mut *conn).await?;

    let mut select =
        QueryBuilder::<MySql>::new(format!("SELECT {} FROM {} WHERE 1 = 1", columns, table));
    push_filters(&mut select);
    select
        .push(" ORDER BY id ASC LIMIT ")
        .push_bind(query.limit)
        .push(" OFFSET ")
        .push_bind(query.offset());

    let rows = select.build_query_as::<T>().fetch_all(&mut *conn).await?;

    tracing::debug!(table, total, returned = rows.len(), "Fetched page");
    Ok((rows, u64::try_from(total).unwrap_or_default()))
}

/// Lock the row for the rest of the transaction, or fail with `NotFound`
pub async fn lock_row(conn: &mut MySqlConnection, table: &str, id: i64, label: &str) -> Result<()> {
    let sql = format!("SELECT id FROM {} WHERE id = ? FOR UPDATE", table);
    let found: Option<i64> = sqlx::query_scalar(&sql)
        .bind(id)
        .fetch_optional(&mut *conn)
        .await?;

    match found {
        Some(_) => Ok(()),
        None => Err(AppError::not_found(format!("{} with id {} not found", label, id))),
    }
}

/// Delete by primary key; dependent rows go through the schema's cascades
pub async fn delete_row(pool: &MySqlPool, table: &str, id: i64, label: &str) -> Result<()> {
    let sql = format!("DELETE FROM {} WHERE id = ?", table);
    let result = sqlx::query(&sql).bind(id).execute(pool).await?;

    if result.rows_affected() == 0 {
        return Err(AppError::not_found(format!("{} with id {} not found", label, id)));
    }

    tracing::debug!(table, id, "Row deleted");
    Ok(())
}

/// Decode a stored enum column
pub fn decode_enum<E: Enumerated>(raw: &str, column: &str) -> Result<E> {
    E::parse(raw)
        .ok_or_else(|| AppError::internal(format!("Invalid value '{}' in column {}", raw, column)))
}

/// Convert the driver's last insert id
pub fn inserted_id(last_insert_id: u64) -> Result<i64> {
    i64::try_from(last_insert_id)
        .map_err(|_| AppError::internal(format!("Inserted id {} out of range", last_insert_id)))
}
