//! Types shared by several resources.

use serde::{Deserialize, Serialize};

use crate::core::slug::slugify;
use crate::core::Payload;

crate::enumerated! {
    /// Editorial lifecycle of public content
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
    pub enum ContentStatus {
        #[default]
        Draft => "DRAFT",
        Published => "PUBLISHED",
        Archived => "ARCHIVED",
    }
}

/// Maximum length of free-form description fields
pub const DESCRIPTION_MAX_LEN: usize = 5000;

/// Image references point at the blob store or a site-relative path
pub fn is_image_url(value: &str) -> bool {
    value.starts_with("https://") || value.starts_with("http://") || value.starts_with('/')
}

/// Slug for a validated name; a name with no letters or digits fails on `name`
pub fn derive_slug(payload: &mut Payload<'_>, name: &str) -> String {
    let slug = slugify(name);
    if slug.is_empty() && !name.is_empty() {
        payload.add_error("name", "must contain at least one Latin letter or digit");
    }
    slug
}

/// Optional image reference, checked with `is_image_url`
pub fn parse_image_url(payload: &mut Payload<'_>, key: &str) -> Option<Option<String>> {
    let value = payload.changed_nullable_text(key, 500)?;
    if let Some(url) = &value {
        if !is_image_url(url) {
            payload.add_error(key, "must be an http(s) URL or a site-relative path");
        }
    }
    Some(value)
}
