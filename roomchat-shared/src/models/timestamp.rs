use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};

/// Instant a message was created, as recorded by the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Timestamp(pub DateTime<Utc>);

impl Timestamp {
    /// The current wall-clock instant.
    #[must_use]
    pub fn now() -> Self {
        Self(Utc::now())
    }

    /// The same instant expressed in another zone.
    #[must_use]
    pub fn in_zone<Tz: TimeZone>(&self, tz: &Tz) -> DateTime<Tz> {
        self.0.with_timezone(tz)
    }
}

impl From<DateTime<Utc>> for Timestamp {
    fn from(value: DateTime<Utc>) -> Self {
        Self(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::FixedOffset;

    #[test]
    fn test_timestamp_serialization() {
        let dt = Utc.with_ymd_and_hms(2025, 3, 8, 14, 30, 0).unwrap();
        let serialized = serde_json::to_string(&Timestamp(dt)).unwrap();

        assert_eq!(serialized, "\"2025-03-08T14:30:00Z\"");
    }

    #[test]
    fn test_timestamp_deserialization_with_offset() {
        let deserialized: Timestamp = serde_json::from_str("\"2025-03-08T16:30:00+02:00\"").unwrap();

        let expected = Utc.with_ymd_and_hms(2025, 3, 8, 14, 30, 0).unwrap();
        assert_eq!(deserialized.0, expected);
    }

    #[test]
    fn test_in_zone_keeps_instant() {
        let dt = Utc.with_ymd_and_hms(2025, 3, 8, 23, 30, 0).unwrap();
        let east = FixedOffset::east_opt(3 * 3600).unwrap();
        let local = Timestamp(dt).in_zone(&east);

        assert_eq!(local.format("%Y-%m-%d %H:%M").to_string(), "2025-03-09 02:30");
        assert_eq!(local.with_timezone(&Utc), dt);
    }

    #[test]
    fn test_timestamp_ordering() {
        let earlier = Timestamp(Utc.with_ymd_and_hms(2025, 3, 8, 14, 30, 0).unwrap());
        let later = Timestamp(Utc.with_ymd_and_hms(2025, 3, 8, 14, 30, 1).unwrap());

        assert!(earlier < later);
        assert_ne!(earlier, later);
    }
}
