//! Reply lookups over the loaded message list. Parents are resolved on
//! read, so a reply whose parent is not loaded simply has none.

use crate::models::Message;

/// First loaded message with the given id.
#[must_use]
pub fn find_by_id<'a>(messages: &'a [Message], id: &str) -> Option<&'a Message> {
    messages.iter().find(|candidate| candidate.id == id)
}

/// The message `message` replies to, if it is among the loaded ones.
///
/// A reference to a message that is not loaded resolves to `None`; the view
/// then renders the reply without a quoted parent.
#[must_use]
pub fn find_parent<'a>(messages: &'a [Message], message: &Message) -> Option<&'a Message> {
    message
        .reply_to_id
        .as_deref()
        .and_then(|id| find_by_id(messages, id))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Timestamp, UserProfile};
    use chrono::{TimeZone, Utc};

    fn message(id: &str, reply_to: Option<&str>) -> Message {
        Message {
            id: id.to_string(),
            user: UserProfile {
                uid: "u1".to_string(),
                display_name: Some("Ada".to_string()),
                photo_url: None,
            },
            content: format!("content {id}"),
            created_at: Timestamp(Utc.with_ymd_and_hms(2024, 1, 1, 10, 0, 0).unwrap()),
            reply_to_id: reply_to.map(str::to_string),
        }
    }

    #[test]
    fn test_resolves_loaded_parent() {
        let messages = vec![message("1", None), message("2", Some("1"))];

        let parent = find_parent(&messages, &messages[1]).unwrap();
        assert_eq!(parent.id, "1");
        assert_eq!(parent.content, "content 1");
    }

    #[test]
    fn test_missing_parent_is_none() {
        let messages = vec![message("1", None), message("2", Some("99"))];

        assert!(find_parent(&messages, &messages[1]).is_none());
    }

    #[test]
    fn test_non_reply_has_no_parent() {
        let messages = vec![message("1", None)];

        assert!(find_parent(&messages, &messages[0]).is_none());
    }

    #[test]
    fn test_resolution_is_stable_across_calls() {
        let messages = vec![
            message("1", None),
            message("2", Some("1")),
            message("3", Some("2")),
        ];

        let first: Vec<Option<&str>> = messages
            .iter()
            .map(|m| find_parent(&messages, m).map(|p| p.id.as_str()))
            .collect();
        let reversed: Vec<Option<&str>> = messages
            .iter()
            .rev()
            .map(|m| find_parent(&messages, m).map(|p| p.id.as_str()))
            .collect::<Vec<_>>()
            .into_iter()
            .rev()
            .collect();

        assert_eq!(first, vec![None, Some("1"), Some("2")]);
        assert_eq!(first, reversed);
    }

    #[test]
    fn test_first_match_wins() {
        let mut duplicate = message("1", None);
        duplicate.content = "second copy".to_string();
        let messages = vec![message("1", None), duplicate];

        assert_eq!(find_by_id(&messages, "1").unwrap().content, "content 1");
    }
}
