use serde_json::{Map, Value};

use super::term::Term;
use crate::core::{Params, Payload, Resource, ValidationErrors};
use crate::modules::shared::{derive_slug, ContentStatus, DESCRIPTION_MAX_LEN};

const NAME_MAX_LEN: usize = 120;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct TermFilter {
    pub content_status: Option<ContentStatus>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewTerm {
    pub name: String,
    pub slug: String,
    pub description: Option<String>,
    pub content_status: ContentStatus,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct TermChanges {
    pub name: Option<String>,
    pub slug: Option<String>,
    pub description: Option<Option<String>>,
    pub content_status: Option<ContentStatus>,
}

/// Resource marker for `/terms`
pub struct Terms;

impl Resource for Terms {
    type Record = Term;
    type Filter = TermFilter;
    type Create = NewTerm;
    type Update = TermChanges;

    const PATH: &'static str = "terms";
    const LABEL: &'static str = "Term";

    fn parse_filter(params: &mut Params<'_>) -> TermFilter {
        TermFilter {
            content_status: params.enumeration("contentStatus"),
        }
    }

    fn parse_create(body: &Map<String, Value>) -> Result<NewTerm, ValidationErrors> {
        let mut payload = Payload::new(body);

        let name = payload.required_text("name", NAME_MAX_LEN);
        let slug = derive_slug(&mut payload, &name);
        let description = payload.optional_text("description", DESCRIPTION_MAX_LEN);
        let content_status = payload.optional_enum("contentStatus").unwrap_or_default();

        payload.finish()?;

        Ok(NewTerm {
            name,
            slug,
            description,
            content_status,
        })
    }

    fn parse_update(body: &Map<String, Value>) -> Result<TermChanges, ValidationErrors> {
        let mut payload = Payload::new(body);

        let name = payload.changed_text("name", NAME_MAX_LEN);
        let slug = name.as_deref().map(|name| derive_slug(&mut payload, name));
        let description = payload.changed_nullable_text("description", DESCRIPTION_MAX_LEN);
        let content_status = payload.optional_enum("contentStatus");

        payload.finish()?;

        Ok(TermChanges {
            name,
            slug,
            description,
            content_status,
        })
    }
}
