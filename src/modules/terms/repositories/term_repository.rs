use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, MySql, MySqlConnection, MySqlPool, QueryBuilder};

use crate::core::persistence::{
    decode_enum, delete_row, fetch_page, inserted_id, lock_row, push_search,
};
use crate::core::{
    AppError, Enumerated, Resource, ResourcePage, ResourceQuery, ResourceRepository, Result,
};
use crate::modules::terms::models::{NewTerm, Term, TermChanges, TermFilter, Terms};

const TABLE: &str = "terms";
const COLUMNS: &str = "id, name, slug, description, content_status, created_at, updated_at";
const SEARCH_COLUMNS: &[&str] = &["name", "description"];

/// MySQL-backed term repository
#[derive(Clone)]
pub struct MySqlTermRepository {
    pool: MySqlPool,
}

impl MySqlTermRepository {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }

    async fn find_by_id(conn: &mut MySqlConnection, id: i64) -> Result<Option<Term>> {
        let row = sqlx::query_as::<_, TermRow>(
            r#"
            SELECT id, name, slug, description, content_status, created_at, updated_at
            FROM terms
            WHERE id = ?
            "#,
        )
        .bind(id)
        .fetch_optional(conn)
        .await?;

        row.map(TermRow::into_term).transpose()
    }
}

fn push_filters(builder: &mut QueryBuilder<'_, MySql>, query: &ResourceQuery<TermFilter>) {
    if let Some(id) = query.id {
        builder.push(" AND id = ").push_bind(id);
    }
    if let Some(pattern) = query.search_pattern() {
        push_search(builder, SEARCH_COLUMNS, &pattern);
    }
    if let Some(status) = query.filter.content_status {
        builder.push(" AND content_status = ").push_bind(status.as_str());
    }
}

#[async_trait]
impl ResourceRepository<Terms> for MySqlTermRepository {
    async fn find(&self, query: &ResourceQuery<TermFilter>) -> Result<ResourcePage<Term>> {
        let mut tx = self.pool.begin().await?;
        let (rows, total) =
            fetch_page::<TermRow, _, _>(&mut tx, COLUMNS, TABLE, query, |b| push_filters(b, query))
                .await?;
        tx.commit().await?;

        let terms = rows
            .into_iter()
            .map(TermRow::into_term)
            .collect::<Result<Vec<_>>>()?;

        Ok(ResourcePage::new(terms, total, query))
    }

    async fn create(&self, payload: NewTerm) -> Result<Term> {
        let mut tx = self.pool.begin().await?;

        let result = sqlx::query(
            r#"
            INSERT INTO terms (name, slug, description, content_status)
            VALUES (?, ?, ?, ?)
            "#,
        )
        .bind(payload.name)
        .bind(payload.slug)
        .bind(payload.description)
        .bind(payload.content_status.as_str())
        .execute(&mut *tx)
        .await
        .map_err(|e| AppError::from_write(e, Terms::LABEL, None))?;

        let id = inserted_id(result.last_insert_id())?;
        let term = Self::find_by_id(&mut tx, id)
            .await?
            .ok_or_else(|| AppError::internal("Inserted term could not be read back"))?;

        tx.commit().await?;
        Ok(term)
    }

    async fn update(&self, id: i64, changes: TermChanges) -> Result<Term> {
        let mut tx = self.pool.begin().await?;
        lock_row(&mut tx, TABLE, id, Terms::LABEL).await?;

        let mut builder = QueryBuilder::<MySql>::new("UPDATE terms SET ");
        let mut set = builder.separated(", ");
        if let Some(name) = changes.name {
            set.push("name = ").push_bind_unseparated(name);
        }
        if let Some(slug) = changes.slug {
            set.push("slug = ").push_bind_unseparated(slug);
        }
        if let Some(description) = changes.description {
            set.push("description = ").push_bind_unseparated(description);
        }
        if let Some(status) = changes.content_status {
            set.push("content_status = ").push_bind_unseparated(status.as_str());
        }
        set.push("updated_at = CURRENT_TIMESTAMP(6)");
        builder.push(" WHERE id = ").push_bind(id);

        builder
            .build()
            .execute(&mut *tx)
            .await
            .map_err(|e| AppError::from_write(e, Terms::LABEL, None))?;

        let term = Self::find_by_id(&mut tx, id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Term with id {} not found", id)))?;

        tx.commit().await?;
        Ok(term)
    }

    async fn delete(&self, id: i64) -> Result<()> {
        delete_row(&self.pool, TABLE, id, Terms::LABEL).await
    }
}

// Helper struct for database mapping

#[derive(Debug, FromRow)]
struct TermRow {
    id: i64,
    name: String,
    slug: String,
    description: Option<String>,
    content_status: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TermRow {
    fn into_term(self) -> Result<Term> {
        Ok(Term {
            id: self.id,
            name: self.name,
            slug: self.slug,
            description: self.description,
            content_status: decode_enum(&self.content_status, "terms.content_status")?,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}
