use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::modules::shared::ContentStatus;

/// A featured cafe; each cafe can be recommended at most once
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Recommendation {
    pub id: i64,
    pub cafe_id: i64,
    pub title: String,
    pub description: Option<String>,
    pub content_status: ContentStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
