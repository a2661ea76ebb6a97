use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::modules::shared::ContentStatus;

/// A glossary term (brew methods, bean processing, ...)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Term {
    pub id: i64,
    pub name: String,
    pub slug: String,
    pub description: Option<String>,
    pub content_status: ContentStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
