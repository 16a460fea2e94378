use serde::{Deserialize, Serialize};

/// Sender details embedded in every message at send time.
///
/// This is a snapshot: later profile changes at the identity provider do not
/// rewrite messages that were already stored.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    /// Stable identifier of the signed-in identity.
    pub uid: String,

    /// Name shown next to the message, if the provider supplied one.
    #[serde(default)]
    pub display_name: Option<String>,

    /// Avatar image location.
    #[serde(default, rename = "photoURL")]
    pub photo_url: Option<String>,
}

/// An authenticated identity as reported by the auth collaborator.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "camelCase")]
pub struct Identity {
    /// Stable identifier, unique per identity.
    pub uid: String,

    /// Provider display name.
    #[serde(default)]
    pub display_name: Option<String>,

    /// Provider email address.
    #[serde(default)]
    pub email: Option<String>,

    /// Avatar image location.
    #[serde(default, rename = "photoURL")]
    pub photo_url: Option<String>,
}

impl Identity {
    /// Snapshot of this identity to embed in a new message.
    ///
    /// The stored display name falls back to the email when the provider
    /// returned no display name.
    #[must_use]
    pub fn profile(&self) -> UserProfile {
        UserProfile {
            uid: self.uid.clone(),
            display_name: non_empty(self.display_name.as_deref())
                .or_else(|| non_empty(self.email.as_deref()))
                .map(str::to_string),
            photo_url: self.photo_url.clone(),
        }
    }

    /// Label for the signed-in header.
    #[must_use]
    pub fn label(&self) -> &str {
        non_empty(self.display_name.as_deref())
            .or_else(|| non_empty(self.email.as_deref()))
            .unwrap_or(crate::chat::display::GUEST)
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|text| !text.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn identity(display_name: Option<&str>, email: Option<&str>) -> Identity {
        Identity {
            uid: "u1".to_string(),
            display_name: display_name.map(str::to_string),
            email: email.map(str::to_string),
            photo_url: Some("https://example.com/a.png".to_string()),
        }
    }

    #[test]
    fn test_profile_prefers_display_name() {
        let profile = identity(Some("Ada"), Some("ada@example.com")).profile();

        assert_eq!(profile.uid, "u1");
        assert_eq!(profile.display_name.as_deref(), Some("Ada"));
        assert_eq!(
            profile.photo_url.as_deref(),
            Some("https://example.com/a.png")
        );
    }

    #[test]
    fn test_profile_falls_back_to_email() {
        let profile = identity(None, Some("ada@example.com")).profile();
        assert_eq!(profile.display_name.as_deref(), Some("ada@example.com"));

        let empty = identity(Some(""), Some("ada@example.com")).profile();
        assert_eq!(empty.display_name.as_deref(), Some("ada@example.com"));

        let blank = identity(Some("  "), Some("ada@example.com")).profile();
        assert_eq!(blank.display_name.as_deref(), Some("  "));
    }

    #[test]
    fn test_profile_without_name_or_email() {
        let profile = identity(None, None).profile();
        assert_eq!(profile.display_name, None);
    }

    #[test]
    fn test_label_fallbacks() {
        assert_eq!(identity(Some("Ada"), None).label(), "Ada");
        assert_eq!(identity(None, Some("ada@example.com")).label(), "ada@example.com");
        assert_eq!(identity(None, None).label(), "Guest");
        assert_eq!(identity(Some(""), Some("")).label(), "Guest");
    }

    #[test]
    fn test_profile_wire_names() {
        let json = serde_json::to_value(identity(Some("Ada"), None).profile()).unwrap();

        assert_eq!(json["uid"], "u1");
        assert_eq!(json["displayName"], "Ada");
        assert_eq!(json["photoURL"], "https://example.com/a.png");
    }

    #[test]
    fn test_identity_missing_optional_fields() {
        let parsed: Identity = serde_json::from_str(r#"{"uid":"u9"}"#).unwrap();

        assert_eq!(parsed.uid, "u9");
        assert!(parsed.display_name.is_none());
        assert!(parsed.email.is_none());
        assert!(parsed.photo_url.is_none());
    }
}
