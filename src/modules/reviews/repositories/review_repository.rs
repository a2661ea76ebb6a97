use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, MySql, MySqlConnection, MySqlPool, QueryBuilder};

use crate::core::persistence::{
    decode_enum, delete_row, fetch_page, inserted_id, lock_row, push_search,
};
use crate::core::{
    AppError, Enumerated, Resource, ResourcePage, ResourceQuery, ResourceRepository, Result,
};
use crate::modules::reviews::models::{
    NewReview, Rating, Review, ReviewChanges, ReviewFilter, Reviews,
};

const TABLE: &str = "reviews";
const COLUMNS: &str =
    "id, cafe_id, reviewer_name, rating, visitor_type, comment, created_at, updated_at";
const SEARCH_COLUMNS: &[&str] = &["reviewer_name", "comment"];

/// MySQL-backed review repository
#[derive(Clone)]
pub struct MySqlReviewRepository {
    pool: MySqlPool,
}

impl MySqlReviewRepository {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }

    async fn find_by_id(conn: &mut MySqlConnection, id: i64) -> Result<Option<Review>> {
        let row = sqlx::query_as::<_, ReviewRow>(
            r#"
            SELECT id, cafe_id, reviewer_name, rating, visitor_type, comment, created_at, updated_at
            FROM reviews
            WHERE id = ?
            "#,
        )
        .bind(id)
        .fetch_optional(conn)
        .await?;

        row.map(ReviewRow::into_review).transpose()
    }
}

fn push_filters(builder: &mut QueryBuilder<'_, MySql>, query: &ResourceQuery<ReviewFilter>) {
    if let Some(id) = query.id {
        builder.push(" AND id = ").push_bind(id);
    }
    if let Some(pattern) = query.search_pattern() {
        push_search(builder, SEARCH_COLUMNS, &pattern);
    }
    if let Some(rating) = query.filter.rating {
        builder.push(" AND rating = ").push_bind(rating.value());
    }
    if let Some(visitor_type) = query.filter.visitor_type {
        builder.push(" AND visitor_type = ").push_bind(visitor_type.as_str());
    }
    if let Some(cafe_id) = query.filter.cafe_id {
        builder.push(" AND cafe_id = ").push_bind(cafe_id);
    }
}

#[async_trait]
impl ResourceRepository<Reviews> for MySqlReviewRepository {
    async fn find(&self, query: &ResourceQuery<ReviewFilter>) -> Result<ResourcePage<Review>> {
        let mut tx = self.pool.begin().await?;
        let (rows, total) =
            fetch_page::<ReviewRow, _, _>(&mut tx, COLUMNS, TABLE, query, |b| push_filters(b, query))
                .await?;
        tx.commit().await?;

        let reviews = rows
            .into_iter()
            .map(ReviewRow::into_review)
            .collect::<Result<Vec<_>>>()?;

        Ok(ResourcePage::new(reviews, total, query))
    }

    async fn create(&self, payload: NewReview) -> Result<Review> {
        let mut tx = self.pool.begin().await?;

        let result = sqlx::query(
            r#"
            INSERT INTO reviews (cafe_id, reviewer_name, rating, visitor_type, comment)
            VALUES (?, ?, ?, ?, ?)
            "#,
        )
        .bind(payload.cafe_id)
        .bind(payload.reviewer_name)
        .bind(payload.rating.value())
        .bind(payload.visitor_type.as_str())
        .bind(payload.comment)
        .execute(&mut *tx)
        .await
        .map_err(|e| AppError::from_write(e, Reviews::LABEL, Some("cafeId")))?;

        let id = inserted_id(result.last_insert_id())?;
        let review = Self::find_by_id(&mut tx, id)
            .await?
            .ok_or_else(|| AppError::internal("Inserted review could not be read back"))?;

        tx.commit().await?;
        Ok(review)
    }

    async fn update(&self, id: i64, changes: ReviewChanges) -> Result<Review> {
        let mut tx = self.pool.begin().await?;
        lock_row(&mut tx, TABLE, id, Reviews::LABEL).await?;

        let mut builder = QueryBuilder::<MySql>::new("UPDATE reviews SET ");
        let mut set = builder.separated(", ");
        if let Some(cafe_id) = changes.cafe_id {
            set.push("cafe_id = ").push_bind_unseparated(cafe_id);
        }
        if let Some(reviewer_name) = changes.reviewer_name {
            set.push("reviewer_name = ").push_bind_unseparated(reviewer_name);
        }
        if let Some(rating) = changes.rating {
            set.push("rating = ").push_bind_unseparated(rating.value());
        }
        if let Some(visitor_type) = changes.visitor_type {
            set.push("visitor_type = ").push_bind_unseparated(visitor_type.as_str());
        }
        if let Some(comment) = changes.comment {
            set.push("comment = ").push_bind_unseparated(comment);
        }
        set.push("updated_at = CURRENT_TIMESTAMP(6)");
        builder.push(" WHERE id = ").push_bind(id);

        builder
            .build()
            .execute(&mut *tx)
            .await
            .map_err(|e| AppError::from_write(e, Reviews::LABEL, Some("cafeId")))?;

        let review = Self::find_by_id(&mut tx, id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Review with id {} not found", id)))?;

        tx.commit().await?;
        Ok(review)
    }

    async fn delete(&self, id: i64) -> Result<()> {
        delete_row(&self.pool, TABLE, id, Reviews::LABEL).await
    }
}

// Helper struct for database mapping

#[derive(Debug, FromRow)]
struct ReviewRow {
    id: i64,
    cafe_id: i64,
    reviewer_name: String,
    rating: u8,
    visitor_type: String,
    comment: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl ReviewRow {
    fn into_review(self) -> Result<Review> {
        let rating = Rating::try_from(self.rating)
            .map_err(|e| AppError::internal(format!("Unexpected value in reviews.rating: {}", e)))?;

        Ok(Review {
            id: self.id,
            cafe_id: self.cafe_id,
            reviewer_name: self.reviewer_name,
            rating,
            visitor_type: decode_enum(&self.visitor_type, "reviews.visitor_type")?,
            comment: self.comment,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}
