use async_trait::async_trait;
use sqlx::{MySql, MySqlConnection, MySqlPool, QueryBuilder};

use crate::core::persistence::{delete_row, fetch_page, inserted_id, lock_row, push_search};
use crate::core::{AppError, Resource, ResourcePage, ResourceQuery, ResourceRepository, Result};
use crate::modules::facilities::models::{
    Facilities, Facility, FacilityChanges, FacilityFilter, NewFacility,
};

const TABLE: &str = "facilities";
const COLUMNS: &str = "id, name, slug, icon, description, created_at, updated_at";
const SEARCH_COLUMNS: &[&str] = &["name", "description"];

/// MySQL-backed facility repository
#[derive(Clone)]
pub struct MySqlFacilityRepository {
    pool: MySqlPool,
}

impl MySqlFacilityRepository {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }

    async fn find_by_id(conn: &mut MySqlConnection, id: i64) -> Result<Option<Facility>> {
        let facility = sqlx::query_as::<_, Facility>(
            r#"
            SELECT id, name, slug, icon, description, created_at, updated_at
            FROM facilities
            WHERE id = ?
            "#,
        )
        .bind(id)
        .fetch_optional(conn)
        .await?;

        Ok(facility)
    }
}

fn push_filters(builder: &mut QueryBuilder<'_, MySql>, query: &ResourceQuery<FacilityFilter>) {
    if let Some(id) = query.id {
        builder.push(" AND id = ").push_bind(id);
    }
    if let Some(pattern) = query.search_pattern() {
        push_search(builder, SEARCH_COLUMNS, &pattern);
    }
}

#[async_trait]
impl ResourceRepository<Facilities> for MySqlFacilityRepository {
    async fn find(&self, query: &ResourceQuery<FacilityFilter>) -> Result<ResourcePage<Facility>> {
        let mut tx = self.pool.begin().await?;
        let (rows, total) =
            fetch_page::<Facility, _, _>(&mut tx, COLUMNS, TABLE, query, |b| push_filters(b, query))
                .await?;
        tx.commit().await?;

        Ok(ResourcePage::new(rows, total, query))
    }

    async fn create(&self, payload: NewFacility) -> Result<Facility> {
        let mut tx = self.pool.begin().await?;

        let result = sqlx::query(
            r#"
            INSERT INTO facilities (name, slug, icon, description)
            VALUES (?, ?, ?, ?)
            "#,
        )
        .bind(payload.name)
        .bind(payload.slug)
        .bind(payload.icon)
        .bind(payload.description)
        .execute(&mut *tx)
        .await
        .map_err(|e| AppError::from_write(e, Facilities::LABEL, None))?;

        let id = inserted_id(result.last_insert_id())?;
        let facility = Self::find_by_id(&mut tx, id)
            .await?
            .ok_or_else(|| AppError::internal("Inserted facility could not be read back"))?;

        tx.commit().await?;
        Ok(facility)
    }

    async fn update(&self, id: i64, changes: FacilityChanges) -> Result<Facility> {
        let mut tx = self.pool.begin().await?;
        lock_row(&mut tx, TABLE, id, Facilities::LABEL).await?;

        let mut builder = QueryBuilder::<MySql>::new("UPDATE facilities SET ");
        let mut set = builder.separated(", ");
        if let Some(name) = changes.name {
            set.push("name = ").push_bind_unseparated(name);
        }
        if let Some(slug) = changes.slug {
            set.push("slug = ").push_bind_unseparated(slug);
        }
        if let Some(icon) = changes.icon {
            set.push("icon = ").push_bind_unseparated(icon);
        }
        if let Some(description) = changes.description {
            set.push("description = ").push_bind_unseparated(description);
        }
        set.push("updated_at = CURRENT_TIMESTAMP(6)");
        builder.push(" WHERE id = ").push_bind(id);

        builder
            .build()
            .execute(&mut *tx)
            .await
            .map_err(|e| AppError::from_write(e, Facilities::LABEL, None))?;

        let facility = Self::find_by_id(&mut tx, id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Facility with id {} not found", id)))?;

        tx.commit().await?;
        Ok(facility)
    }

    async fn delete(&self, id: i64) -> Result<()> {
        delete_row(&self.pool, TABLE, id, Facilities::LABEL).await
    }
}
