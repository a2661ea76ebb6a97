use chrono::NaiveTime;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::core::{Payload, ValidationErrors};

crate::enumerated! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
    pub enum Weekday {
        #[default]
        Monday => "MONDAY",
        Tuesday => "TUESDAY",
        Wednesday => "WEDNESDAY",
        Thursday => "THURSDAY",
        Friday => "FRIDAY",
        Saturday => "SATURDAY",
        Sunday => "SUNDAY",
    }
}

/// Opening window for one day of the week
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OpeningHours {
    pub day_of_week: Weekday,
    #[serde(with = "clock_time")]
    pub opens_at: NaiveTime,
    #[serde(with = "clock_time")]
    pub closes_at: NaiveTime,
}

/// `HH:MM` on the wire; seconds are accepted on input
mod clock_time {
    use chrono::NaiveTime;
    use serde::{de, Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(time: &NaiveTime, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(&time.format("%H:%M"))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveTime, D::Error> {
        let raw = String::deserialize(deserializer)?;
        NaiveTime::parse_from_str(&raw, "%H:%M")
            .or_else(|_| NaiveTime::parse_from_str(&raw, "%H:%M:%S"))
            .map_err(de::Error::custom)
    }
}

impl OpeningHours {
    /// Validate one `openingHours[]` entry
    fn parse(entry: &Map<String, Value>) -> Result<Self, ValidationErrors> {
        let mut payload = Payload::new(entry);

        let day_of_week = payload.required_enum::<Weekday>("dayOfWeek");
        let opens_at = payload.required_time("opensAt");
        let closes_at = payload.required_time("closesAt");

        if !payload.has_error("opensAt") && !payload.has_error("closesAt") && opens_at >= closes_at {
            payload.add_error("closesAt", "must be later than opensAt");
        }

        payload.finish()?;

        Ok(Self {
            day_of_week,
            opens_at,
            closes_at,
        })
    }
}

/// Read the `openingHours` array, if present.
///
/// Errors are reported as `openingHours[i].field`; a day may appear once.
/// The result is sorted Monday first.
pub fn parse_opening_hours(payload: &mut Payload<'_>, key: &str) -> Option<Vec<OpeningHours>> {
    let entries = payload.objects(key)?;
    let mut hours: Vec<OpeningHours> = Vec::with_capacity(entries.len());

    for (idx, entry) in entries {
        let prefix = format!("{}[{}]", key, idx);
        match OpeningHours::parse(entry) {
            Ok(parsed) => {
                if hours.iter().any(|h| h.day_of_week == parsed.day_of_week) {
                    payload.add_error(format!("{}.dayOfWeek", prefix), "is listed more than once");
                } else {
                    hours.push(parsed);
                }
            }
            Err(errors) => payload.absorb(&prefix, errors),
        }
    }

    hours.sort_by_key(|h| h.day_of_week);
    Some(hours)
}
