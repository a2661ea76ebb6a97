use std::fmt;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde_json::Value;

pub const DEFAULT_PAGE_SIZE: u32 = 10;
pub const PAGE_SIZE_OPTIONS: [u32; 4] = [10, 25, 50, 100];
pub const SEARCH_DEBOUNCE: Duration = Duration::from_millis(300);

/// Placeholder for null or missing cells
pub const EMPTY_CELL: &str = "-";

/// How a column turns a JSON value into display text
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnKind {
    Text,
    /// Enum wire value shown as a title-cased label
    Badge,
    /// RFC 3339 timestamp shown as `YYYY-MM-DD HH:MM` UTC
    DateTime,
    Boolean,
    /// Text cut to the given number of characters
    Truncated(usize),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    /// Field name in the record JSON
    pub key: String,
    pub header: String,
    pub kind: ColumnKind,
    pub sortable: bool,
}

impl Column {
    pub fn new(key: impl Into<String>, header: impl Into<String>, kind: ColumnKind) -> Self {
        Self {
            key: key.into(),
            header: header.into(),
            kind,
            sortable: false,
        }
    }

    pub fn text(key: impl Into<String>, header: impl Into<String>) -> Self {
        Self::new(key, header, ColumnKind::Text)
    }

    pub fn badge(key: impl Into<String>, header: impl Into<String>) -> Self {
        Self::new(key, header, ColumnKind::Badge)
    }

    pub fn date_time(key: impl Into<String>, header: impl Into<String>) -> Self {
        Self::new(key, header, ColumnKind::DateTime)
    }

    pub fn boolean(key: impl Into<String>, header: impl Into<String>) -> Self {
        Self::new(key, header, ColumnKind::Boolean)
    }

    pub fn truncated(key: impl Into<String>, header: impl Into<String>, max_chars: usize) -> Self {
        Self::new(key, header, ColumnKind::Truncated(max_chars))
    }

    pub fn sortable(mut self) -> Self {
        self.sortable = true;
        self
    }

    /// Display text for this column of `row`
    pub fn render(&self, row: &Value) -> String {
        let value = match row.get(&self.key) {
            None | Some(Value::Null) => return EMPTY_CELL.to_string(),
            Some(value) => value,
        };

        match self.kind {
            ColumnKind::Text => plain(value),
            ColumnKind::Badge => badge_label(&plain(value)),
            ColumnKind::DateTime => match value.as_str().map(DateTime::parse_from_rfc3339) {
                Some(Ok(at)) => at.with_timezone(&Utc).format("%Y-%m-%d %H:%M").to_string(),
                _ => plain(value),
            },
            ColumnKind::Boolean => match value.as_bool() {
                Some(true) => "Yes".to_string(),
                Some(false) => "No".to_string(),
                None => plain(value),
            },
            ColumnKind::Truncated(max) => truncate(&plain(value), max),
        }
    }
}

fn plain(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// `COFFEE_SHOP` -> `Coffee Shop`
fn badge_label(raw: &str) -> String {
    raw.split('_')
        .filter(|w| !w.is_empty())
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first
                    .to_uppercase()
                    .chain(chars.flat_map(char::to_lowercase))
                    .collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        return text.to_string();
    }
    let mut cut: String = text.chars().take(max).collect();
    cut.push('…');
    cut
}

/// Row identity as found in the record's `id` field
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum RowId {
    Number(i64),
    Text(String),
}

impl RowId {
    pub fn of(row: &Value) -> Option<RowId> {
        match row.get("id")? {
            Value::Number(n) => n.as_i64().map(RowId::Number),
            Value::String(s) if !s.is_empty() => Some(RowId::Text(s.clone())),
            _ => None,
        }
    }

    pub fn matches(&self, row: &Value) -> bool {
        RowId::of(row).as_ref() == Some(self)
    }
}

impl fmt::Display for RowId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RowId::Number(id) => write!(f, "{}", id),
            RowId::Text(id) => f.write_str(id),
        }
    }
}

impl From<i64> for RowId {
    fn from(id: i64) -> Self {
        RowId::Number(id)
    }
}

/// Declarative table setup for one collection endpoint
#[derive(Debug, Clone)]
pub struct TableConfig {
    /// Collection path, e.g. `/cafes`
    pub api_endpoint: String,
    pub columns: Vec<Column>,
    pub search_placeholder: String,
    /// Edit link template; `{id}` is replaced by the row id
    pub edit_href: Option<String>,
    pub can_delete: bool,
    pub page_size: u32,
    pub page_size_options: Vec<u32>,
    pub search_debounce: Duration,
    /// Sent with every fetch, e.g. `cafeId` for a nested list
    pub fixed_params: Vec<(String, String)>,
}

impl TableConfig {
    pub fn new(api_endpoint: impl Into<String>, columns: Vec<Column>) -> Self {
        Self {
            api_endpoint: api_endpoint.into(),
            columns,
            search_placeholder: "Search...".to_string(),
            edit_href: None,
            can_delete: false,
            page_size: DEFAULT_PAGE_SIZE,
            page_size_options: PAGE_SIZE_OPTIONS.to_vec(),
            search_debounce: SEARCH_DEBOUNCE,
            fixed_params: Vec::new(),
        }
    }

    pub fn search_placeholder(mut self, placeholder: impl Into<String>) -> Self {
        self.search_placeholder = placeholder.into();
        self
    }

    pub fn edit_href(mut self, template: impl Into<String>) -> Self {
        self.edit_href = Some(template.into());
        self
    }

    pub fn can_delete(mut self, can_delete: bool) -> Self {
        self.can_delete = can_delete;
        self
    }

    pub fn page_size(mut self, page_size: u32) -> Self {
        self.page_size = page_size;
        self
    }

    pub fn search_debounce(mut self, debounce: Duration) -> Self {
        self.search_debounce = debounce;
        self
    }

    pub fn fixed_param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.fixed_params.push((key.into(), value.into()));
        self
    }

    /// Edit link for a row, if the table has one and the row carries an id
    pub fn edit_link(&self, row: &Value) -> Option<String> {
        let template = self.edit_href.as_ref()?;
        let id = RowId::of(row)?;
        Some(template.replace("{id}", &id.to_string()))
    }

    pub fn column(&self, key: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.key == key)
    }
}
