use serde_json::{Map, Value};

use super::rating::Rating;
use super::review::{Review, VisitorType};
use crate::core::{Params, Payload, Resource, ValidationErrors};

const REVIEWER_NAME_MAX_LEN: usize = 120;
const COMMENT_MAX_LEN: usize = 2000;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReviewFilter {
    pub rating: Option<Rating>,
    pub visitor_type: Option<VisitorType>,
    pub cafe_id: Option<i64>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewReview {
    pub cafe_id: i64,
    pub reviewer_name: String,
    pub rating: Rating,
    pub visitor_type: VisitorType,
    pub comment: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReviewChanges {
    pub cafe_id: Option<i64>,
    pub reviewer_name: Option<String>,
    pub rating: Option<Rating>,
    pub visitor_type: Option<VisitorType>,
    pub comment: Option<Option<String>>,
}

/// Resource marker for `/reviews`
pub struct Reviews;

impl Resource for Reviews {
    type Record = Review;
    type Filter = ReviewFilter;
    type Create = NewReview;
    type Update = ReviewChanges;

    const PATH: &'static str = "reviews";
    const LABEL: &'static str = "Review";

    fn parse_filter(params: &mut Params<'_>) -> ReviewFilter {
        ReviewFilter {
            rating: params.enumeration("rating"),
            visitor_type: params.enumeration("visitorType"),
            cafe_id: params.id("cafeId"),
        }
    }

    fn parse_create(body: &Map<String, Value>) -> Result<NewReview, ValidationErrors> {
        let mut payload = Payload::new(body);

        let cafe_id = payload.required_id("cafeId");
        let reviewer_name = payload.required_text("reviewerName", REVIEWER_NAME_MAX_LEN);
        let rating = payload.required_enum("rating");
        let visitor_type = payload.required_enum("visitorType");
        let comment = payload.optional_text("comment", COMMENT_MAX_LEN);

        payload.finish()?;

        Ok(NewReview {
            cafe_id,
            reviewer_name,
            rating,
            visitor_type,
            comment,
        })
    }

    fn parse_update(body: &Map<String, Value>) -> Result<ReviewChanges, ValidationErrors> {
        let mut payload = Payload::new(body);

        let cafe_id = payload.optional_id("cafeId");
        let reviewer_name = payload.changed_text("reviewerName", REVIEWER_NAME_MAX_LEN);
        let rating = payload.optional_enum("rating");
        let visitor_type = payload.optional_enum("visitorType");
        let comment = payload.changed_nullable_text("comment", COMMENT_MAX_LEN);

        payload.finish()?;

        Ok(ReviewChanges {
            cafe_id,
            reviewer_name,
            rating,
            visitor_type,
            comment,
        })
    }
}
