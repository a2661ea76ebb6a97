use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::rating::Rating;

crate::enumerated! {
    /// Who the reviewer visited as
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
    pub enum VisitorType {
        #[default]
        Student => "STUDENT",
        Worker => "WORKER",
        Freelancer => "FREELANCER",
        Family => "FAMILY",
        Tourist => "TOURIST",
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Review {
    pub id: i64,
    pub cafe_id: i64,
    pub reviewer_name: String,
    pub rating: Rating,
    pub visitor_type: VisitorType,
    pub comment: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
