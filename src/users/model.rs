//! User records: the directory's wire format and the sanitized card-ready form.

use serde::{Deserialize, Serialize};

use crate::format::{is_mostly_special, truncate, MAX_NAME_LENGTH};

/// User object as returned by `GET /users/{id}`.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct DiscordUser {
    pub id: String,
    pub username: String,
    #[serde(default)]
    pub global_name: Option<String>,
    #[serde(default)]
    pub discriminator: Option<String>,
    /// Avatar hash, absent when the user kept the default avatar
    #[serde(default)]
    pub avatar: Option<String>,
}

/// A resolved user, ready to be drawn.
///
/// Immutable once built; a refresh replaces the whole record.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct UserInfo {
    pub id: String,
    pub username: String,
    pub display_name: String,
    pub discriminator: Option<String>,
    #[serde(rename = "avatar")]
    pub avatar_url: Option<String>,
}

impl UserInfo {
    /// Builds the card-ready record from a directory response.
    ///
    /// The global name is used as display name unless it is absent or mostly
    /// non-alphanumeric, in which case the username stands in.
    pub fn from_directory(user: DiscordUser, cdn_base: &str) -> Self {
        let display_source = user
            .global_name
            .as_deref()
            .filter(|name| !is_mostly_special(name))
            .unwrap_or(&user.username);

        let display_name = truncate(display_source, MAX_NAME_LENGTH);
        let avatar_url = user
            .avatar
            .as_deref()
            .filter(|hash| !hash.is_empty())
            .map(|hash| avatar_url(cdn_base, &user.id, hash));

        Self {
            username: truncate(&user.username, MAX_NAME_LENGTH),
            display_name,
            discriminator: user.discriminator,
            avatar_url,
            id: user.id,
        }
    }
}

/// CDN location of a user's avatar as PNG.
pub fn avatar_url(cdn_base: &str, user_id: &str, hash: &str) -> String {
    format!("{}/avatars/{}/{}.png", cdn_base, user_id, hash)
}

#[cfg(test)]
mod tests {
    use super::*;

    const CDN: &str = "https://cdn.discordapp.com";

    fn user(global_name: Option<&str>, avatar: Option<&str>) -> DiscordUser {
        DiscordUser {
            id: "1159667835761594449".to_string(),
            username: "real_user".to_string(),
            global_name: global_name.map(str::to_string),
            discriminator: Some("0".to_string()),
            avatar: avatar.map(str::to_string),
        }
    }

    #[test]
    fn test_global_name_preferred() {
        let info = UserInfo::from_directory(user(Some("Real Name"), None), CDN);
        assert_eq!(info.display_name, "Real Name");
        assert_eq!(info.username, "real_user");
    }

    #[test]
    fn test_special_global_name_falls_back_to_username() {
        let info = UserInfo::from_directory(user(Some("????"), None), CDN);
        assert_eq!(info.display_name, "real_user");
    }

    #[test]
    fn test_missing_global_name_falls_back_to_username() {
        let info = UserInfo::from_directory(user(None, None), CDN);
        assert_eq!(info.display_name, "real_user");
    }

    #[test]
    fn test_names_are_truncated() {
        let mut raw = user(Some("A Very Long Global Name"), None);
        raw.username = "abcdefghijklmnopqrstuvwxyz".to_string();
        let info = UserInfo::from_directory(raw, CDN);
        assert_eq!(info.username, "abcdefghijk...");
        assert_eq!(info.display_name, "A Very Long...");
    }

    #[test]
    fn test_avatar_url() {
        let info = UserInfo::from_directory(user(None, Some("a1b2c3")), CDN);
        assert_eq!(
            info.avatar_url.as_deref(),
            Some("https://cdn.discordapp.com/avatars/1159667835761594449/a1b2c3.png")
        );

        let none = UserInfo::from_directory(user(None, None), CDN);
        assert!(none.avatar_url.is_none());
    }

    #[test]
    fn test_deserialize_directory_payload() {
        let json = r#"{"id":"42","username":"neo","avatar":null,"discriminator":"0","public_flags":0}"#;
        let raw: DiscordUser = serde_json::from_str(json).unwrap();
        assert_eq!(raw.id, "42");
        assert!(raw.global_name.is_none());
        assert!(raw.avatar.is_none());
    }

    #[test]
    fn test_serialize_card_json() {
        let info = UserInfo::from_directory(user(Some("Real Name"), Some("abc")), CDN);
        let json = serde_json::to_value(&info).unwrap();
        assert_eq!(json["displayName"], "Real Name");
        assert_eq!(json["username"], "real_user");
        assert!(json["avatar"].as_str().unwrap().ends_with("/abc.png"));
    }
}
