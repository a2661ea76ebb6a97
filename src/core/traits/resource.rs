use serde::Serialize;
use serde_json::{Map, Value};

use crate::core::validation::{Params, ValidationErrors};

/// Static description of one manageable entity type.
///
/// Ties together the record shape, its list filters and its write payloads,
/// so handlers and repositories can be written once and instantiated per
/// resource.
pub trait Resource: Send + Sync + 'static {
    type Record: Serialize + Send + Sync;
    type Filter: Send + Sync;
    type Create: Send;
    type Update: Send;

    /// Collection path segment, e.g. `cafes`
    const PATH: &'static str;

    /// Singular label used in error messages
    const LABEL: &'static str;

    /// Read resource-specific filters from the query string
    fn parse_filter(params: &mut Params<'_>) -> Self::Filter;

    fn parse_create(body: &Map<String, Value>) -> Result<Self::Create, ValidationErrors>;

    fn parse_update(body: &Map<String, Value>) -> Result<Self::Update, ValidationErrors>;
}
