use serde_json::{Map, Value};

use super::recommendation::Recommendation;
use crate::core::{Params, Payload, Resource, ValidationErrors};
use crate::modules::shared::{ContentStatus, DESCRIPTION_MAX_LEN};

const TITLE_MAX_LEN: usize = 160;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct RecommendationFilter {
    pub content_status: Option<ContentStatus>,
    pub cafe_id: Option<i64>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewRecommendation {
    pub cafe_id: i64,
    pub title: String,
    pub description: Option<String>,
    pub content_status: ContentStatus,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct RecommendationChanges {
    pub cafe_id: Option<i64>,
    pub title: Option<String>,
    pub description: Option<Option<String>>,
    pub content_status: Option<ContentStatus>,
}

/// Resource marker for `/recommendations`
pub struct Recommendations;

impl Resource for Recommendations {
    type Record = Recommendation;
    type Filter = RecommendationFilter;
    type Create = NewRecommendation;
    type Update = RecommendationChanges;

    const PATH: &'static str = "recommendations";
    const LABEL: &'static str = "Recommendation";

    fn parse_filter(params: &mut Params<'_>) -> RecommendationFilter {
        RecommendationFilter {
            content_status: params.enumeration("contentStatus"),
            cafe_id: params.id("cafeId"),
        }
    }

    fn parse_create(body: &Map<String, Value>) -> Result<NewRecommendation, ValidationErrors> {
        let mut payload = Payload::new(body);

        let cafe_id = payload.required_id("cafeId");
        let title = payload.required_text("title", TITLE_MAX_LEN);
        let description = payload.optional_text("description", DESCRIPTION_MAX_LEN);
        let content_status = payload.optional_enum("contentStatus").unwrap_or_default();

        payload.finish()?;

        Ok(NewRecommendation {
            cafe_id,
            title,
            description,
            content_status,
        })
    }

    fn parse_update(body: &Map<String, Value>) -> Result<RecommendationChanges, ValidationErrors> {
        let mut payload = Payload::new(body);

        let cafe_id = payload.optional_id("cafeId");
        let title = payload.changed_text("title", TITLE_MAX_LEN);
        let description = payload.changed_nullable_text("description", DESCRIPTION_MAX_LEN);
        let content_status = payload.optional_enum("contentStatus");

        payload.finish()?;

        Ok(RecommendationChanges {
            cafe_id,
            title,
            description,
            content_status,
        })
    }
}
