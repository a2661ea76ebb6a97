// Cafe persistence
//
// A cafe is stored in `cafes` with its weekly schedule in
// `cafe_opening_hours`. Writes touching both tables run in one transaction;
// deleting a cafe relies on the schema's ON DELETE CASCADE for its hours,
// recommendation and reviews.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, NaiveTime, Utc};
use sqlx::{FromRow, MySql, MySqlConnection, MySqlPool, QueryBuilder};

use crate::core::persistence::{
    decode_enum, delete_row, fetch_page, inserted_id, lock_row, push_search,
};
use crate::core::{
    AppError, Enumerated, Resource, ResourcePage, ResourceQuery, ResourceRepository, Result,
};
use crate::modules::cafes::models::{
    Cafe, CafeChanges, CafeFilter, Cafes, NewCafe, OpeningHours,
};

const TABLE: &str = "cafes";
const COLUMNS: &str = "id, name, slug, description, address, cafe_type, content_status, \
                       image_url, created_at, updated_at";
const SEARCH_COLUMNS: &[&str] = &["name", "description"];

/// MySQL-backed cafe repository
#[derive(Clone)]
pub struct MySqlCafeRepository {
    pool: MySqlPool,
}

impl MySqlCafeRepository {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }

    async fn find_by_id(conn: &mut MySqlConnection, id: i64) -> Result<Option<Cafe>> {
        let row = sqlx::query_as::<_, CafeRow>(
            r#"
            SELECT id, name, slug, description, address, cafe_type, content_status,
                   image_url, created_at, updated_at
            FROM cafes
            WHERE id = ?
            "#,
        )
        .bind(id)
        .fetch_optional(&mut *conn)
        .await?;

        let Some(row) = row else {
            return Ok(None);
        };

        let mut hours = load_opening_hours(conn, &[row.id]).await?;
        let schedule = hours.remove(&row.id).unwrap_or_default();

        Ok(Some(row.into_cafe(schedule)?))
    }
}

fn push_filters(builder: &mut QueryBuilder<'_, MySql>, query: &ResourceQuery<CafeFilter>) {
    if let Some(id) = query.id {
        builder.push(" AND id = ").push_bind(id);
    }
    if let Some(pattern) = query.search_pattern() {
        push_search(builder, SEARCH_COLUMNS, &pattern);
    }
    if let Some(cafe_type) = query.filter.cafe_type {
        builder.push(" AND cafe_type = ").push_bind(cafe_type.as_str());
    }
    if let Some(status) = query.filter.content_status {
        builder.push(" AND content_status = ").push_bind(status.as_str());
    }
}

/// Opening hours for a set of cafes, keyed by cafe id, Monday first
async fn load_opening_hours(
    conn: &mut MySqlConnection,
    cafe_ids: &[i64],
) -> Result<HashMap<i64, Vec<OpeningHours>>> {
    let mut by_cafe: HashMap<i64, Vec<OpeningHours>> = HashMap::new();
    if cafe_ids.is_empty() {
        return Ok(by_cafe);
    }

    let mut builder = QueryBuilder::<MySql>::new(
        "SELECT cafe_id, day_of_week, opens_at, closes_at FROM cafe_opening_hours WHERE cafe_id IN (",
    );
    let mut ids = builder.separated(", ");
    for id in cafe_ids {
        ids.push_bind(*id);
    }
    ids.push_unseparated(")");

    let rows: Vec<OpeningHoursRow> = builder.build_query_as().fetch_all(&mut *conn).await?;
    for row in rows {
        let cafe_id = row.cafe_id;
        by_cafe
            .entry(cafe_id)
            .or_default()
            .push(row.into_opening_hours()?);
    }
    for schedule in by_cafe.values_mut() {
        schedule.sort_by_key(|h| h.day_of_week);
    }

    Ok(by_cafe)
}

/// Replace a cafe's whole weekly schedule
async fn replace_opening_hours(
    conn: &mut MySqlConnection,
    cafe_id: i64,
    hours: &[OpeningHours],
) -> Result<()> {
    sqlx::query("DELETE FROM cafe_opening_hours WHERE cafe_id = ?")
        .bind(cafe_id)
        .execute(&mut *conn)
        .await?;

    if hours.is_empty() {
        return Ok(());
    }

    let mut builder = QueryBuilder::<MySql>::new(
        "INSERT INTO cafe_opening_hours (cafe_id, day_of_week, opens_at, closes_at) ",
    );
    builder.push_values(hours, |mut row, h| {
        row.push_bind(cafe_id)
            .push_bind(h.day_of_week.as_str())
            .push_bind(h.opens_at)
            .push_bind(h.closes_at);
    });
    builder.build().execute(&mut *conn).await?;

    tracing::debug!(cafe_id, days = hours.len(), "Opening hours replaced");
    Ok(())
}

#[async_trait]
impl ResourceRepository<Cafes> for MySqlCafeRepository {
    async fn find(&self, query: &ResourceQuery<CafeFilter>) -> Result<ResourcePage<Cafe>> {
        let mut tx = self.pool.begin().await?;
        let (rows, total) =
            fetch_page::<CafeRow, _, _>(&mut tx, COLUMNS, TABLE, query, |b| push_filters(b, query))
                .await?;

        let ids: Vec<i64> = rows.iter().map(|row| row.id).collect();
        let mut hours = load_opening_hours(&mut tx, &ids).await?;
        tx.commit().await?;

        let cafes = rows
            .into_iter()
            .map(|row| {
                let schedule = hours.remove(&row.id).unwrap_or_default();
                row.into_cafe(schedule)
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(ResourcePage::new(cafes, total, query))
    }

    async fn create(&self, payload: NewCafe) -> Result<Cafe> {
        let mut tx = self.pool.begin().await?;

        let result = sqlx::query(
            r#"
            INSERT INTO cafes (
                name, slug, description, address, cafe_type, content_status, image_url
            ) VALUES (?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(payload.name)
        .bind(payload.slug)
        .bind(payload.description)
        .bind(payload.address)
        .bind(payload.cafe_type.as_str())
        .bind(payload.content_status.as_str())
        .bind(payload.image_url)
        .execute(&mut *tx)
        .await
        .map_err(|e| AppError::from_write(e, Cafes::LABEL, None))?;

        let id = inserted_id(result.last_insert_id())?;
        replace_opening_hours(&mut tx, id, &payload.opening_hours).await?;

        let cafe = Self::find_by_id(&mut tx, id)
            .await?
            .ok_or_else(|| AppError::internal("Inserted cafe could not be read back"))?;

        tx.commit().await?;
        Ok(cafe)
    }

    async fn update(&self, id: i64, changes: CafeChanges) -> Result<Cafe> {
        let mut tx = self.pool.begin().await?;
        lock_row(&mut tx, TABLE, id, Cafes::LABEL).await?;

        let mut builder = QueryBuilder::<MySql>::new("UPDATE cafes SET ");
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
        if let Some(address) = changes.address {
            set.push("address = ").push_bind_unseparated(address);
        }
        if let Some(cafe_type) = changes.cafe_type {
            set.push("cafe_type = ").push_bind_unseparated(cafe_type.as_str());
        }
        if let Some(status) = changes.content_status {
            set.push("content_status = ").push_bind_unseparated(status.as_str());
        }
        if let Some(image_url) = changes.image_url {
            set.push("image_url = ").push_bind_unseparated(image_url);
        }
        set.push("updated_at = CURRENT_TIMESTAMP(6)");
        builder.push(" WHERE id = ").push_bind(id);

        builder
            .build()
            .execute(&mut *tx)
            .await
            .map_err(|e| AppError::from_write(e, Cafes::LABEL, None))?;

        if let Some(hours) = changes.opening_hours {
            replace_opening_hours(&mut tx, id, &hours).await?;
        }

        let cafe = Self::find_by_id(&mut tx, id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Cafe with id {} not found", id)))?;

        tx.commit().await?;
        Ok(cafe)
    }

    async fn delete(&self, id: i64) -> Result<()> {
        delete_row(&self.pool, TABLE, id, Cafes::LABEL).await
    }
}

// Helper structs for database mapping

#[derive(Debug, FromRow)]
struct CafeRow {
    id: i64,
    name: String,
    slug: String,
    description: Option<String>,
    address: String,
    cafe_type: String,
    content_status: String,
    image_url: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl CafeRow {
    fn into_cafe(self, opening_hours: Vec<OpeningHours>) -> Result<Cafe> {
        Ok(Cafe {
            id: self.id,
            name: self.name,
            slug: self.slug,
            description: self.description,
            address: self.address,
            cafe_type: decode_enum(&self.cafe_type, "cafes.cafe_type")?,
            content_status: decode_enum(&self.content_status, "cafes.content_status")?,
            image_url: self.image_url,
            opening_hours,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

#[derive(Debug, FromRow)]
struct OpeningHoursRow {
    cafe_id: i64,
    day_of_week: String,
    opens_at: NaiveTime,
    closes_at: NaiveTime,
}

impl OpeningHoursRow {
    fn into_opening_hours(self) -> Result<OpeningHours> {
        Ok(OpeningHours {
            day_of_week: decode_enum(&self.day_of_week, "cafe_opening_hours.day_of_week")?,
            opens_at: self.opens_at,
            closes_at: self.closes_at,
        })
    }
}
