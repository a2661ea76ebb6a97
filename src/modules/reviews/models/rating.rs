use std::fmt;

use serde::{Deserialize, Serialize};

use crate::core::Enumerated;

/// Star rating from 1 to 5.
///
/// Query strings carry it as text (`?rating=4`), JSON bodies and responses
/// as a number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct Rating(u8);

impl Rating {
    pub const MIN: Rating = Rating(1);
    pub const MAX: Rating = Rating(5);

    pub fn new(value: u8) -> Option<Self> {
        (Self::MIN.0..=Self::MAX.0)
            .contains(&value)
            .then_some(Rating(value))
    }

    pub fn value(self) -> u8 {
        self.0
    }
}

/// Placeholder for missing input; never persisted
impl Default for Rating {
    fn default() -> Self {
        Self::MIN
    }
}

impl Enumerated for Rating {
    const VARIANTS: &'static [&'static str] = &["1", "2", "3", "4", "5"];

    fn parse(value: &str) -> Option<Self> {
        Self::VARIANTS
            .iter()
            .position(|v| *v == value)
            .and_then(|idx| u8::try_from(idx + 1).ok())
            .map(Rating)
    }

    fn as_str(&self) -> &'static str {
        Self::VARIANTS[usize::from(self.0 - 1)]
    }
}

impl TryFrom<u8> for Rating {
    type Error = InvalidRating;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Rating::new(value).ok_or(InvalidRating(value))
    }
}

impl From<Rating> for u8 {
    fn from(rating: Rating) -> Self {
        rating.0
    }
}

impl fmt::Display for Rating {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, thiserror::Error)]
#[error("rating {0} is outside 1..=5")]
pub struct InvalidRating(pub u8);
