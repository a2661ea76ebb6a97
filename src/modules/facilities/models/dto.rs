use serde_json::{Map, Value};

use super::facility::Facility;
use crate::core::{Params, Payload, Resource, ValidationErrors};
use crate::modules::shared::{derive_slug, DESCRIPTION_MAX_LEN};

const NAME_MAX_LEN: usize = 80;
const ICON_MAX_LEN: usize = 80;

/// Facilities have no filters beyond search and id
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FacilityFilter;

#[derive(Debug, Clone, PartialEq)]
pub struct NewFacility {
    pub name: String,
    pub slug: String,
    pub icon: Option<String>,
    pub description: Option<String>,
}

/// Partial update; `None` leaves a column unchanged
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FacilityChanges {
    pub name: Option<String>,
    pub slug: Option<String>,
    pub icon: Option<Option<String>>,
    pub description: Option<Option<String>>,
}

/// Resource marker for `/facilities`
pub struct Facilities;

impl Resource for Facilities {
    type Record = Facility;
    type Filter = FacilityFilter;
    type Create = NewFacility;
    type Update = FacilityChanges;

    const PATH: &'static str = "facilities";
    const LABEL: &'static str = "Facility";

    fn parse_filter(_params: &mut Params<'_>) -> FacilityFilter {
        FacilityFilter
    }

    fn parse_create(body: &Map<String, Value>) -> Result<NewFacility, ValidationErrors> {
        let mut payload = Payload::new(body);

        let name = payload.required_text("name", NAME_MAX_LEN);
        let slug = derive_slug(&mut payload, &name);
        let icon = payload.optional_text("icon", ICON_MAX_LEN);
        let description = payload.optional_text("description", DESCRIPTION_MAX_LEN);

        payload.finish()?;

        Ok(NewFacility {
            name,
            slug,
            icon,
            description,
        })
    }

    fn parse_update(body: &Map<String, Value>) -> Result<FacilityChanges, ValidationErrors> {
        let mut payload = Payload::new(body);

        let name = payload.changed_text("name", NAME_MAX_LEN);
        let slug = name.as_deref().map(|name| derive_slug(&mut payload, name));
        let icon = payload.changed_nullable_text("icon", ICON_MAX_LEN);
        let description = payload.changed_nullable_text("description", DESCRIPTION_MAX_LEN);

        payload.finish()?;

        Ok(FacilityChanges {
            name,
            slug,
            icon,
            description,
        })
    }
}
