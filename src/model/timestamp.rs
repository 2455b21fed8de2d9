use chrono::{DateTime, NaiveDate, Utc};
use derive_new::new;
use serde::{Deserialize, Serialize};

pub fn now() -> Timestamp {
    Timestamp::new(Utc::now())
}

pub fn today() -> NaiveDate {
    Utc::now().date_naive()
}

/// A UTC instant that is stored and sent over the wire as an RFC 3339 string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, new)]
pub struct Timestamp(DateTime<Utc>);

impl std::fmt::Display for Timestamp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0.format("%Y-%m-%d %H:%M:%S UTC"))
    }
}

impl Serialize for Timestamp {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.0.to_rfc3339().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Timestamp {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        DateTime::parse_from_rfc3339(&s)
            .map(|dt| Self(dt.into()))
            .map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn serializes_as_rfc3339() {
        let timestamp = Timestamp::new(Utc.with_ymd_and_hms(2025, 3, 22, 8, 30, 0).unwrap());
        let json = serde_json::to_string(&timestamp).unwrap();
        assert_eq!(json, "\"2025-03-22T08:30:00+00:00\"");

        let parsed: Timestamp = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, timestamp);
    }

    #[test]
    fn rejects_non_rfc3339_input() {
        let parsed = serde_json::from_str::<Timestamp>("\"yesterday\"");
        assert!(parsed.is_err());
    }
}
