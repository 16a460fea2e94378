//! Display fallbacks for sender details.

use chrono::TimeZone;

use crate::models::{Identity, Message, Timestamp, UserProfile};

/// Name shown for senders whose display name is missing or empty.
pub const GUEST: &str = "Guest";

/// Sender name, or [`GUEST`] when it is missing or empty. Whitespace-only
/// names are shown as stored.
#[must_use]
pub fn display_name(profile: &UserProfile) -> &str {
    profile
        .display_name
        .as_deref()
        .filter(|name| !name.is_empty())
        .unwrap_or(GUEST)
}

/// Upper-cased first character of the sender name, used when no avatar image is set.
#[must_use]
pub fn avatar_initial(profile: &UserProfile) -> String {
    display_name(profile)
        .trim_start()
        .chars()
        .next()
        .map(|c| c.to_uppercase().collect::<String>())
        .unwrap_or_default()
}

#[must_use]
pub fn avatar_url(profile: &UserProfile) -> Option<&str> {
    profile
        .photo_url
        .as_deref()
        .filter(|url| !url.is_empty())
}

/// Whether `message` was sent by the signed-in viewer.
#[must_use]
pub fn is_own(message: &Message, viewer: &Identity) -> bool {
    message.user.uid == viewer.uid
}

/// `HH:MM` in the viewer's zone.
#[must_use]
pub fn format_time<Tz>(timestamp: &Timestamp, tz: &Tz) -> String
where
    Tz: TimeZone,
    Tz::Offset: std::fmt::Display,
{
    timestamp.in_zone(tz).format("%H:%M").to_string()
}

/// Banner shown above the composer while a reply target is selected.
#[must_use]
pub fn reply_banner(target: &Message) -> String {
    format!(
        "Replying to {}: {}",
        display_name(&target.user),
        target.content
    )
}

/// Truncate `content` to at most `max_chars` characters, marking the cut.
#[must_use]
pub fn excerpt(content: &str, max_chars: usize) -> String {
    let mut chars = content.chars();
    let head: String = chars.by_ref().take(max_chars).collect();
    if chars.next().is_some() {
        format!("{head}…")
    } else {
        head
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{FixedOffset, Utc};

    fn profile(name: Option<&str>, photo: Option<&str>) -> UserProfile {
        UserProfile {
            uid: "u1".to_string(),
            display_name: name.map(str::to_string),
            photo_url: photo.map(str::to_string),
        }
    }

    fn message_from(uid: &str) -> Message {
        Message {
            id: "1".to_string(),
            user: UserProfile {
                uid: uid.to_string(),
                display_name: Some("Ada".to_string()),
                photo_url: None,
            },
            content: "hi there".to_string(),
            created_at: Timestamp(Utc.with_ymd_and_hms(2024, 1, 1, 10, 5, 0).unwrap()),
            reply_to_id: None,
        }
    }

    #[test]
    fn test_display_name_fallback() {
        assert_eq!(display_name(&profile(Some("Ada"), None)), "Ada");
        assert_eq!(display_name(&profile(None, None)), "Guest");
        assert_eq!(display_name(&profile(Some(""), None)), "Guest");
        assert_eq!(display_name(&profile(Some("  "), None)), "  ");
    }

    #[test]
    fn test_avatar_initial() {
        assert_eq!(avatar_initial(&profile(Some("ada"), None)), "A");
        assert_eq!(avatar_initial(&profile(None, None)), "G");
        assert_eq!(avatar_initial(&profile(Some("élodie"), None)), "É");
        assert_eq!(avatar_initial(&profile(Some(" "), None)), "");
    }

    #[test]
    fn test_avatar_url_ignores_empty() {
        assert_eq!(
            avatar_url(&profile(None, Some("https://example.com/a.png"))),
            Some("https://example.com/a.png")
        );
        assert_eq!(avatar_url(&profile(None, Some(""))), None);
        assert_eq!(avatar_url(&profile(None, None)), None);
    }

    #[test]
    fn test_is_own() {
        let viewer = Identity {
            uid: "u2".to_string(),
            display_name: None,
            email: None,
            photo_url: None,
        };

        assert!(is_own(&message_from("u2"), &viewer));
        assert!(!is_own(&message_from("u1"), &viewer));
    }

    #[test]
    fn test_format_time_in_zone() {
        let message = message_from("u1");
        let west = FixedOffset::west_opt(5 * 3600).unwrap();

        assert_eq!(format_time(&message.created_at, &Utc), "10:05");
        assert_eq!(format_time(&message.created_at, &west), "05:05");
    }

    #[test]
    fn test_reply_banner() {
        assert_eq!(reply_banner(&message_from("u1")), "Replying to Ada: hi there");
    }

    #[test]
    fn test_excerpt_respects_char_boundaries() {
        assert_eq!(excerpt("short", 10), "short");
        assert_eq!(excerpt("ümlauts everywhere", 7), "ümlauts…");
        assert_eq!(excerpt("", 3), "");
    }
}
