//! Field-scoped validation primitives.
//!
//! `Params` reads query-string maps and `Payload` reads JSON request bodies.
//! Both accumulate every field error into a `ValidationErrors` instead of
//! stopping at the first one, and both ignore keys they are never asked about.

use std::collections::{BTreeMap, HashMap};
use std::fmt;

use chrono::NaiveTime;
use serde::Serialize;
use serde_json::{Map, Value};

/// Validation failures keyed by field name
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ValidationErrors(BTreeMap<String, Vec<String>>);

impl ValidationErrors {
    pub fn add(&mut self, field: impl Into<String>, msg: impl Into<String>) {
        self.0.entry(field.into()).or_default().push(msg.into());
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Messages recorded for one field
    pub fn field(&self, field: &str) -> Option<&[String]> {
        self.0.get(field).map(Vec::as_slice)
    }

    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    /// `Ok(())` when nothing was recorded
    pub fn into_result(self) -> Result<(), ValidationErrors> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(self)
        }
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (field, messages) in &self.0 {
            for msg in messages {
                if !first {
                    write!(f, "; ")?;
                }
                write!(f, "{} {}", field, msg)?;
                first = false;
            }
        }
        Ok(())
    }
}

/// A closed set of wire values
pub trait Enumerated: Sized + Copy {
    /// Accepted wire values, in display order
    const VARIANTS: &'static [&'static str];

    fn parse(value: &str) -> Option<Self>;

    fn as_str(&self) -> &'static str;

    fn expected() -> String {
        format!("must be one of: {}", Self::VARIANTS.join(", "))
    }
}

/// Declare a unit enum with fixed wire values.
///
/// Generates the enum with serde renames, `Enumerated` and `Display`.
#[macro_export]
macro_rules! enumerated {
    (
        $(#[$meta:meta])*
        pub enum $name:ident {
            $($(#[$vmeta:meta])* $variant:ident => $wire:literal),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        pub enum $name {
            $($(#[$vmeta])* #[serde(rename = $wire)] $variant),+
        }

        impl $crate::core::validation::Enumerated for $name {
            const VARIANTS: &'static [&'static str] = &[$($wire),+];

            fn parse(value: &str) -> Option<Self> {
                match value {
                    $($wire => Some($name::$variant),)+
                    _ => None,
                }
            }

            fn as_str(&self) -> &'static str {
                match self {
                    $($name::$variant => $wire),+
                }
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str($crate::core::validation::Enumerated::as_str(self))
            }
        }
    };
}

/// Query-string reader
pub struct Params<'a> {
    raw: &'a HashMap<String, String>,
    errors: ValidationErrors,
}

impl<'a> Params<'a> {
    pub fn new(raw: &'a HashMap<String, String>) -> Self {
        Self {
            raw,
            errors: ValidationErrors::default(),
        }
    }

    /// Trimmed value; blank counts as absent
    pub fn text(&self, key: &str) -> Option<String> {
        self.raw
            .get(key)
            .map(|v| v.trim())
            .filter(|v| !v.is_empty())
            .map(str::to_string)
    }

    /// Positive integer with a default and an optional upper bound
    pub fn positive_int(&mut self, key: &str, default: u32, max: Option<u32>) -> u32 {
        let Some(raw) = self.text(key) else {
            return default;
        };

        match raw.parse::<u32>() {
            Ok(0) | Err(_) => {
                self.errors.add(key, "must be a positive integer");
                default
            }
            Ok(value) => match max {
                Some(max) if value > max => {
                    self.errors.add(key, format!("must be at most {}", max));
                    default
                }
                _ => value,
            },
        }
    }

    /// Optional record id
    pub fn id(&mut self, key: &str) -> Option<i64> {
        let raw = self.text(key)?;
        match raw.parse::<i64>() {
            Ok(id) if id > 0 => Some(id),
            _ => {
                self.errors.add(key, "must be a positive integer id");
                None
            }
        }
    }

    /// Optional enum filter; unknown values fail rather than being dropped
    pub fn enumeration<E: Enumerated>(&mut self, key: &str) -> Option<E> {
        let raw = self.text(key)?;
        match E::parse(&raw) {
            Some(value) => Some(value),
            None => {
                self.errors.add(key, E::expected());
                None
            }
        }
    }

    pub fn finish(self) -> Result<(), ValidationErrors> {
        self.errors.into_result()
    }
}

/// JSON object reader for create/update bodies.
///
/// `required_*` readers record an error and return a placeholder when the
/// field is missing or malformed; the placeholder is never observed because
/// `finish` fails in that case.
pub struct Payload<'a> {
    body: &'a Map<String, Value>,
    errors: ValidationErrors,
}

impl<'a> Payload<'a> {
    pub fn new(body: &'a Map<String, Value>) -> Self {
        Self {
            body,
            errors: ValidationErrors::default(),
        }
    }

    /// Parse raw request bytes into a JSON object
    pub fn parse_body(bytes: &[u8]) -> Result<Map<String, Value>, ValidationErrors> {
        match serde_json::from_slice::<Value>(bytes) {
            Ok(Value::Object(map)) => Ok(map),
            _ => {
                let mut errors = ValidationErrors::default();
                errors.add("body", "must be a JSON object");
                Err(errors)
            }
        }
    }

    fn get(&self, key: &str) -> Option<&'a Value> {
        self.body.get(key)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.body.contains_key(key)
    }

    pub fn add_error(&mut self, field: impl Into<String>, msg: impl Into<String>) {
        self.errors.add(field, msg);
    }

    pub fn has_error(&self, field: &str) -> bool {
        self.errors.field(field).is_some()
    }

    pub fn required_text(&mut self, key: &str, max_len: usize) -> String {
        match self.get(key) {
            None | Some(Value::Null) => {
                self.errors.add(key, "is required");
                String::new()
            }
            Some(value) => self.text_value(key, value, max_len, true).unwrap_or_default(),
        }
    }

    /// Absent or null yields `None`; blank strings also become `None`
    pub fn optional_text(&mut self, key: &str, max_len: usize) -> Option<String> {
        match self.get(key) {
            None | Some(Value::Null) => None,
            Some(value) => self.text_value(key, value, max_len, false),
        }
    }

    /// Update-style text: absent is `None` (unchanged), present is validated
    pub fn changed_text(&mut self, key: &str, max_len: usize) -> Option<String> {
        match self.get(key) {
            None => None,
            Some(Value::Null) => {
                self.errors.add(key, "cannot be null");
                None
            }
            Some(value) => self.text_value(key, value, max_len, true),
        }
    }

    /// Update-style nullable text: absent is `None`, null clears to `Some(None)`
    pub fn changed_nullable_text(&mut self, key: &str, max_len: usize) -> Option<Option<String>> {
        match self.get(key) {
            None => None,
            Some(Value::Null) => Some(None),
            Some(value) => Some(self.text_value(key, value, max_len, false)),
        }
    }

    pub fn required_enum<E: Enumerated + Default>(&mut self, key: &str) -> E {
        match self.get(key) {
            None | Some(Value::Null) => {
                self.errors.add(key, "is required");
                E::default()
            }
            Some(value) => self.enum_value(key, value).unwrap_or_default(),
        }
    }

    /// Absent yields `None`; null is rejected
    pub fn optional_enum<E: Enumerated>(&mut self, key: &str) -> Option<E> {
        match self.get(key) {
            None => None,
            Some(Value::Null) => {
                self.errors.add(key, "cannot be null");
                None
            }
            Some(value) => self.enum_value(key, value),
        }
    }

    pub fn required_id(&mut self, key: &str) -> i64 {
        match self.get(key) {
            None | Some(Value::Null) => {
                self.errors.add(key, "is required");
                0
            }
            Some(value) => self.id_value(key, value).unwrap_or_default(),
        }
    }

    pub fn optional_id(&mut self, key: &str) -> Option<i64> {
        match self.get(key) {
            None => None,
            Some(Value::Null) => {
                self.errors.add(key, "cannot be null");
                None
            }
            Some(value) => self.id_value(key, value),
        }
    }

    /// Array of objects with their positions; `None` when absent
    pub fn objects(&mut self, key: &str) -> Option<Vec<(usize, &'a Map<String, Value>)>> {
        match self.get(key) {
            None => None,
            Some(Value::Array(items)) => {
                let mut objects = Vec::with_capacity(items.len());
                for (idx, item) in items.iter().enumerate() {
                    match item {
                        Value::Object(map) => objects.push((idx, map)),
                        _ => self.errors.add(format!("{}[{}]", key, idx), "must be an object"),
                    }
                }
                Some(objects)
            }
            Some(_) => {
                self.errors.add(key, "must be an array");
                None
            }
        }
    }

    /// `HH:MM` or `HH:MM:SS`
    pub fn required_time(&mut self, key: &str) -> NaiveTime {
        let parsed = match self.get(key) {
            Some(Value::String(raw)) => NaiveTime::parse_from_str(raw.trim(), "%H:%M")
                .or_else(|_| NaiveTime::parse_from_str(raw.trim(), "%H:%M:%S"))
                .ok(),
            _ => None,
        };
        match parsed {
            Some(time) => time,
            None => {
                self.errors.add(key, "must be a time formatted as HH:MM");
                NaiveTime::MIN
            }
        }
    }

    /// Merge errors collected by a nested reader under `prefix`
    pub fn absorb(&mut self, prefix: &str, nested: ValidationErrors) {
        for (field, messages) in nested.0 {
            for msg in messages {
                self.errors.add(format!("{}.{}", prefix, field), msg);
            }
        }
    }

    pub fn finish(self) -> Result<(), ValidationErrors> {
        self.errors.into_result()
    }

    pub fn into_errors(self) -> ValidationErrors {
        self.errors
    }

    fn text_value(
        &mut self,
        key: &str,
        value: &Value,
        max_len: usize,
        required: bool,
    ) -> Option<String> {
        let Value::String(raw) = value else {
            self.errors.add(key, "must be a string");
            return None;
        };

        let trimmed = raw.trim();
        if trimmed.is_empty() {
            if required {
                self.errors.add(key, "must not be blank");
            }
            return None;
        }
        if trimmed.chars().count() > max_len {
            self.errors.add(key, format!("must be at most {} characters", max_len));
            return None;
        }
        Some(trimmed.to_string())
    }

    fn enum_value<E: Enumerated>(&mut self, key: &str, value: &Value) -> Option<E> {
        let parsed = match value {
            Value::String(raw) => E::parse(raw.trim()),
            Value::Number(n) => E::parse(&n.to_string()),
            _ => None,
        };
        if parsed.is_none() {
            self.errors.add(key, E::expected());
        }
        parsed
    }

    fn id_value(&mut self, key: &str, value: &Value) -> Option<i64> {
        let parsed = match value {
            Value::Number(n) => n.as_i64(),
            Value::String(raw) => raw.trim().parse::<i64>().ok(),
            _ => None,
        };
        match parsed {
            Some(id) if id > 0 => Some(id),
            _ => {
                self.errors.add(key, "must be a positive integer id");
                None
            }
        }
    }
}
