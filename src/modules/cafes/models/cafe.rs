use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::opening_hours::OpeningHours;
use crate::modules::shared::ContentStatus;

crate::enumerated! {
    /// Kind of venue, used for filtering on the public site
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
    pub enum CafeType {
        #[default]
        CoffeeShop => "COFFEE_SHOP",
        Roastery => "ROASTERY",
        Coworking => "COWORKING",
        Bakery => "BAKERY",
        DessertBar => "DESSERT_BAR",
    }
}

/// A café listed in the directory
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Cafe {
    pub id: i64,

    pub name: String,

    /// Derived from `name`, unique across cafés
    pub slug: String,

    pub description: Option<String>,

    pub address: String,

    pub cafe_type: CafeType,

    pub content_status: ContentStatus,

    /// Blob-store URL of the cover image
    pub image_url: Option<String>,

    /// Weekly schedule, one entry per open day, Monday first
    pub opening_hours: Vec<OpeningHours>,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
