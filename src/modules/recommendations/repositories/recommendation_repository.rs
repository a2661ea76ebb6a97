use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, MySql, MySqlConnection, MySqlPool, QueryBuilder};

use crate::core::persistence::{
    decode_enum, delete_row, fetch_page, inserted_id, lock_row, push_search,
};
use crate::core::{
    AppError, Enumerated, Resource, ResourcePage, ResourceQuery, ResourceRepository, Result,
};
use crate::modules::recommendations::models::{
    NewRecommendation, Recommendation, RecommendationChanges, RecommendationFilter,
    Recommendations,
};

const TABLE: &str = "recommendations";
const COLUMNS: &str = "id, cafe_id, title, description, content_status, created_at, updated_at";
const SEARCH_COLUMNS: &[&str] = &["title", "description"];

/// MySQL-backed recommendation repository
#[derive(Clone)]
pub struct MySqlRecommendationRepository {
    pool: MySqlPool,
}

impl MySqlRecommendationRepository {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }

    async fn find_by_id(conn: &mut MySqlConnection, id: i64) -> Result<Option<Recommendation>> {
        let row = sqlx::query_as::<_, RecommendationRow>(
            r#"
            SELECT id, cafe_id, title, description, content_status, created_at, updated_at
            FROM recommendations
            WHERE id = ?
            "#,
        )
        .bind(id)
        .fetch_optional(conn)
        .await?;

        row.map(RecommendationRow::into_recommendation).transpose()
    }
}

fn push_filters(
    builder: &mut QueryBuilder<'_, MySql>,
    query: &ResourceQuery<RecommendationFilter>,
) {
    if let Some(id) = query.id {
        builder.push(" AND id = ").push_bind(id);
    }
    if let Some(pattern) = query.search_pattern() {
        push_search(builder, SEARCH_COLUMNS, &pattern);
    }
    if let Some(status) = query.filter.content_status {
        builder.push(" AND content_status = ").push_bind(status.as_str());
    }
    if let Some(cafe_id) = query.filter.cafe_id {
        builder.push(" AND cafe_id = ").push_bind(cafe_id);
    }
}

#[async_trait]
impl ResourceRepository<Recommendations> for MySqlRecommendationRepository {
    async fn find(
        &self,
        query: &ResourceQuery<RecommendationFilter>,
    ) -> Result<ResourcePage<Recommendation>> {
        let mut tx = self.pool.begin().await?;
        let (rows, total) = fetch_page::<RecommendationRow, _, _>(
            &mut tx,
            COLUMNS,
            TABLE,
            query,
            |b| push_filters(b, query),
        )
        .await?;
        tx.commit().await?;

        let recommendations = rows
            .into_iter()
            .map(RecommendationRow::into_recommendation)
            .collect::<Result<Vec<_>>>()?;

        Ok(ResourcePage::new(recommendations, total, query))
    }

    async fn create(&self, payload: NewRecommendation) -> Result<Recommendation> {
        let mut tx = self.pool.begin().await?;

        let result = sqlx::query(
            r#"
            INSERT INTO recommendations (cafe_id, title, description, content_status)
            VALUES (?, ?, ?, ?)
            "#,
        )
        .bind(payload.cafe_id)
        .bind(payload.title)
        .bind(payload.description)
        .bind(payload.content_status.as_str())
        .execute(&mut *tx)
        .await
        .map_err(|e| AppError::from_write(e, "Recommendation for this cafe", Some("cafeId")))?;

        let id = inserted_id(result.last_insert_id())?;
        let recommendation = Self::find_by_id(&mut tx, id)
            .await?
            .ok_or_else(|| AppError::internal("Inserted recommendation could not be read back"))?;

        tx.commit().await?;
        Ok(recommendation)
    }

    async fn update(&self, id: i64, changes: RecommendationChanges) -> Result<Recommendation> {
        let mut tx = self.pool.begin().await?;
        lock_row(&mut tx, TABLE, id, Recommendations::LABEL).await?;

        let mut builder = QueryBuilder::<MySql>::new("UPDATE recommendations SET ");
        let mut set = builder.separated(", ");
        if let Some(cafe_id) = changes.cafe_id {
            set.push("cafe_id = ").push_bind_unseparated(cafe_id);
        }
        if let Some(title) = changes.title {
            set.push("title = ").push_bind_unseparated(title);
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
            .map_err(|e| AppError::from_write(e, "Recommendation for this cafe", Some("cafeId")))?;

        let recommendation = Self::find_by_id(&mut tx, id).await?.ok_or_else(|| {
            AppError::not_found(format!("Recommendation with id {} not found", id))
        })?;

        tx.commit().await?;
        Ok(recommendation)
    }

    async fn delete(&self, id: i64) -> Result<()> {
        delete_row(&self.pool, TABLE, id, Recommendations::LABEL).await
    }
}

// Helper struct for database mapping

#[derive(Debug, FromRow)]
struct RecommendationRow {
    id: i64,
    cafe_id: i64,
    title: String,
    description: Option<String>,
    content_status: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl RecommendationRow {
    fn into_recommendation(self) -> Result<Recommendation> {
        Ok(Recommendation {
            id: self.id,
            cafe_id: self.cafe_id,
            title: self.title,
            description: self.description,
            content_status: decode_enum(&self.content_status, "recommendations.content_status")?,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}
