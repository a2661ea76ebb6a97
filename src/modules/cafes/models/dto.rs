use serde_json::{Map, Value};

use super::cafe::{Cafe, CafeType};
use super::opening_hours::{parse_opening_hours, OpeningHours};
use crate::core::{Params, Payload, Resource, ValidationErrors};
use crate::modules::shared::{derive_slug, parse_image_url, ContentStatus, DESCRIPTION_MAX_LEN};

const NAME_MAX_LEN: usize = 120;
const ADDRESS_MAX_LEN: usize = 255;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct CafeFilter {
    pub cafe_type: Option<CafeType>,
    pub content_status: Option<ContentStatus>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewCafe {
    pub name: String,
    pub slug: String,
    pub description: Option<String>,
    pub address: String,
    pub cafe_type: CafeType,
    pub content_status: ContentStatus,
    pub image_url: Option<String>,
    pub opening_hours: Vec<OpeningHours>,
}

/// Partial update; `opening_hours` replaces the whole schedule when present
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CafeChanges {
    pub name: Option<String>,
    pub slug: Option<String>,
    pub description: Option<Option<String>>,
    pub address: Option<String>,
    pub cafe_type: Option<CafeType>,
    pub content_status: Option<ContentStatus>,
    pub image_url: Option<Option<String>>,
    pub opening_hours: Option<Vec<OpeningHours>>,
}

/// Resource marker for `/cafes`
pub struct Cafes;

impl Resource for Cafes {
    type Record = Cafe;
    type Filter = CafeFilter;
    type Create = NewCafe;
    type Update = CafeChanges;

    const PATH: &'static str = "cafes";
    const LABEL: &'static str = "Cafe";

    fn parse_filter(params: &mut Params<'_>) -> CafeFilter {
        CafeFilter {
            cafe_type: params.enumeration("cafeType"),
            content_status: params.enumeration("contentStatus"),
        }
    }

    fn parse_create(body: &Map<String, Value>) -> Result<NewCafe, ValidationErrors> {
        let mut payload = Payload::new(body);

        let name = payload.required_text("name", NAME_MAX_LEN);
        let slug = derive_slug(&mut payload, &name);
        let description = payload.optional_text("description", DESCRIPTION_MAX_LEN);
        let address = payload.required_text("address", ADDRESS_MAX_LEN);
        let cafe_type = payload.required_enum("cafeType");
        let content_status = payload.optional_enum("contentStatus").unwrap_or_default();
        let image_url = parse_image_url(&mut payload, "imageUrl").flatten();
        let opening_hours = parse_opening_hours(&mut payload, "openingHours").unwrap_or_default();

        payload.finish()?;

        Ok(NewCafe {
            name,
            slug,
            description,
            address,
            cafe_type,
            content_status,
            image_url,
            opening_hours,
        })
    }

    fn parse_update(body: &Map<String, Value>) -> Result<CafeChanges, ValidationErrors> {
        let mut payload = Payload::new(body);

        let name = payload.changed_text("name", NAME_MAX_LEN);
        let slug = name.as_deref().map(|name| derive_slug(&mut payload, name));
        let description = payload.changed_nullable_text("description", DESCRIPTION_MAX_LEN);
        let address = payload.changed_text("address", ADDRESS_MAX_LEN);
        let cafe_type = payload.optional_enum("cafeType");
        let content_status = payload.optional_enum("contentStatus");
        let image_url = parse_image_url(&mut payload, "imageUrl");
        let opening_hours = parse_opening_hours(&mut payload, "openingHours");

        payload.finish()?;

        Ok(CafeChanges {
            name,
            slug,
            description,
            address,
            cafe_type,
            content_status,
            image_url,
            opening_hours,
        })
    }
}
