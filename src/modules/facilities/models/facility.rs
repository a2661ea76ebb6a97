use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// An amenity listed on café pages
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Facility {
    pub id: i64,

    /// Display name, unique
    pub name: String,

    /// Derived from `name`, unique
    pub slug: String,

    /// Icon identifier understood by the front end
    pub icon: Option<String>,

    pub description: Option<String>,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
