//! Calendar-day grouping of the loaded message list.
//!
//! Labels are derived from the wall clock at the moment grouping runs and
//! are never cached per message, so a message labelled "Today" becomes
//! "Yesterday" once local midnight passes and the view re-renders.

use std::fmt::{Display, Formatter, Result as FmtResult};

use chrono::{DateTime, NaiveDate, TimeZone};

use crate::models::{Message, Timestamp};

/// Separator label for one calendar day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DayLabel {
    /// The viewer's current local date.
    Today,
    /// The local date before today.
    Yesterday,
    /// Any other local date, rendered as `DD/MM/YYYY`.
    Date(NaiveDate),
}

impl DayLabel {
    /// Label for `date` relative to `today`.
    #[must_use]
    pub fn for_date(date: NaiveDate, today: NaiveDate) -> Self {
        if date == today {
            Self::Today
        } else if today.pred_opt() == Some(date) {
            Self::Yesterday
        } else {
            Self::Date(date)
        }
    }

    /// Label for an instant as seen from `now`'s zone and date.
    #[must_use]
    pub fn of<Tz: TimeZone>(timestamp: &Timestamp, now: &DateTime<Tz>) -> Self {
        let date = timestamp.in_zone(&now.timezone()).date_naive();
        Self::for_date(date, now.date_naive())
    }
}

impl Display for DayLabel {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            Self::Today => f.write_str("Today"),
            Self::Yesterday => f.write_str("Yesterday"),
            Self::Date(date) => write!(f, "{}", date.format("%d/%m/%Y")),
        }
    }
}

/// Messages sharing one local calendar day, in store order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DayGroup<'a> {
    pub label: DayLabel,
    pub messages: Vec<&'a Message>,
}

/// Bucket `messages` by local calendar day.
///
/// Buckets appear in the order their label is first seen; a label seen again
/// joins the existing bucket. Input order is kept inside each bucket, and the
/// list itself is never re-sorted.
pub fn group_by_day<'a, Tz: TimeZone>(
    messages: &'a [Message],
    now: &DateTime<Tz>,
) -> Vec<DayGroup<'a>> {
    let mut groups: Vec<DayGroup<'a>> = Vec::new();

    for message in messages {
        let label = DayLabel::of(&message.created_at, now);
        match groups.iter_mut().rev().find(|group| group.label == label) {
            Some(group) => group.messages.push(message),
            None => groups.push(DayGroup {
                label,
                messages: vec![message],
            }),
        }
    }

    groups
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::UserProfile;
    use chrono::{FixedOffset, Utc};

    fn message(id: &str, y: i32, m: u32, d: u32, h: u32) -> Message {
        Message {
            id: id.to_string(),
            user: UserProfile {
                uid: "u1".to_string(),
                display_name: None,
                photo_url: None,
            },
            content: format!("message {id}"),
            created_at: Timestamp(Utc.with_ymd_and_hms(y, m, d, h, 0, 0).unwrap()),
            reply_to_id: None,
        }
    }

    fn ids(group: &DayGroup<'_>) -> Vec<String> {
        group.messages.iter().map(|m| m.id.clone()).collect()
    }

    #[test]
    fn test_yesterday_scenario() {
        let messages = vec![message("1", 2024, 1, 1, 10)];
        let now = Utc.with_ymd_and_hms(2024, 1, 2, 9, 0, 0).unwrap();

        let groups = group_by_day(&messages, &now);

        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].label.to_string(), "Yesterday");
        assert_eq!(ids(&groups[0]), vec!["1"]);
    }

    #[test]
    fn test_today_relabels_after_midnight() {
        let messages = vec![message("1", 2024, 1, 1, 10)];
        let same_day = Utc.with_ymd_and_hms(2024, 1, 1, 23, 59, 0).unwrap();
        let next_day = Utc.with_ymd_and_hms(2024, 1, 2, 0, 1, 0).unwrap();

        assert_eq!(group_by_day(&messages, &same_day)[0].label, DayLabel::Today);
        assert_eq!(
            group_by_day(&messages, &next_day)[0].label,
            DayLabel::Yesterday
        );
        assert_eq!(messages[0].id, "1");
    }

    #[test]
    fn test_older_dates_are_zero_padded() {
        let messages = vec![message("1", 2024, 3, 5, 10)];
        let now = Utc.with_ymd_and_hms(2024, 6, 1, 9, 0, 0).unwrap();

        assert_eq!(group_by_day(&messages, &now)[0].label.to_string(), "05/03/2024");
    }

    #[test]
    fn test_buckets_follow_input_order_and_cover_every_message() {
        let messages = vec![
            message("1", 2023, 12, 30, 8),
            message("2", 2023, 12, 30, 9),
            message("3", 2024, 1, 1, 10),
            message("4", 2024, 1, 2, 7),
            message("5", 2024, 1, 2, 8),
        ];
        let now = Utc.with_ymd_and_hms(2024, 1, 2, 12, 0, 0).unwrap();

        let groups = group_by_day(&messages, &now);
        let labels: Vec<String> = groups.iter().map(|g| g.label.to_string()).collect();
        assert_eq!(labels, vec!["30/12/2023", "Yesterday", "Today"]);

        let firsts: Vec<_> = groups.iter().map(|g| g.messages[0].created_at).collect();
        assert!(firsts.windows(2).all(|pair| pair[0] <= pair[1]));

        let flattened: Vec<String> = groups.iter().flat_map(ids).collect();
        assert_eq!(flattened, vec!["1", "2", "3", "4", "5"]);
    }

    #[test]
    fn test_dates_use_the_viewer_zone() {
        // 23:30 UTC on Jan 1 is already Jan 2 three hours east.
        let messages = vec![message("1", 2024, 1, 1, 23)];
        let east = FixedOffset::east_opt(3 * 3600).unwrap();
        let now = east.with_ymd_and_hms(2024, 1, 2, 12, 0, 0).unwrap();

        assert_eq!(group_by_day(&messages, &now)[0].label, DayLabel::Today);

        let utc_now = Utc.with_ymd_and_hms(2024, 1, 2, 12, 0, 0).unwrap();
        assert_eq!(
            group_by_day(&messages, &utc_now)[0].label,
            DayLabel::Yesterday
        );
    }

    #[test]
    fn test_repeated_label_joins_first_bucket() {
        let messages = vec![
            message("1", 2024, 1, 1, 10),
            message("2", 2024, 1, 2, 10),
            message("3", 2024, 1, 1, 11),
        ];
        let now = Utc.with_ymd_and_hms(2024, 1, 5, 12, 0, 0).unwrap();

        let groups = group_by_day(&messages, &now);
        assert_eq!(groups.len(), 2);
        assert_eq!(ids(&groups[0]), vec!["1", "3"]);
        assert_eq!(ids(&groups[1]), vec!["2"]);
    }

    #[test]
    fn test_empty_list() {
        let now = Utc.with_ymd_and_hms(2024, 1, 2, 12, 0, 0).unwrap();
        assert!(group_by_day(&[], &now).is_empty());
    }

    #[test]
    fn test_label_for_year_boundary() {
        let today = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let new_years_eve = NaiveDate::from_ymd_opt(2023, 12, 31).unwrap();

        assert_eq!(DayLabel::for_date(new_years_eve, today), DayLabel::Yesterday);
        assert_eq!(DayLabel::for_date(today, today), DayLabel::Today);
    }
}
