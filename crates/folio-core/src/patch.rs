//! Partial documents.
//!
//! A [`ContentPatch`] is any subset of sections, each any subset of fields.
//! It is the shape of everything that flows into the store: persisted blobs
//! from older schema versions, remote snapshots and admin edits.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::content::{Announcement, Maintenance, Post, Service, SiteContent, TeamMember};
use crate::error::{ContentError, json_type_name};
use crate::lists;

/// A partial Content Document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub general: Option<GeneralPatch>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub home: Option<HomePatch>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub about: Option<AboutPatch>,
    #[serde(
        default,
        deserialize_with = "lists::deserialize_opt",
        skip_serializing_if = "Option::is_none"
    )]
    pub services: Option<Vec<Service>>,
    #[serde(
        default,
        deserialize_with = "lists::deserialize_opt",
        skip_serializing_if = "Option::is_none"
    )]
    pub posts: Option<Vec<Post>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub disclaimer: Option<DisclaimerPatch>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub credentials: Option<CredentialsPatch>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneralPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tagline: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hero_image: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub accent_color: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HomePatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hero_title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hero_subtitle: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub intro_text: Option<String>,
    /// Replaced whole when present
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub maintenance: Option<Maintenance>,
    /// Replaced whole when present
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub announcement: Option<Announcement>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AboutPatch {
    /// Replaced whole when present
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub founder: Option<TeamMember>,
    #[serde(
        default,
        deserialize_with = "lists::deserialize_opt",
        skip_serializing_if = "Option::is_none"
    )]
    pub executives: Option<Vec<TeamMember>>,
    #[serde(
        default,
        deserialize_with = "lists::deserialize_opt",
        skip_serializing_if = "Option::is_none"
    )]
    pub cas: Option<Vec<TeamMember>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub associates_text: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DisclaimerPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub popup_text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub footer_text: Option<String>,
}

/// Credentials patch.
///
/// `recovery_code` is tri-state: `None` keeps the current value,
/// `Some(None)` (JSON `null`) clears it, `Some(Some(_))` sets it.
#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CredentialsPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    #[serde(
        default,
        deserialize_with = "present_or_null",
        skip_serializing_if = "Option::is_none"
    )]
    pub recovery_code: Option<Option<String>>,
}

impl std::fmt::Debug for CredentialsPatch {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CredentialsPatch")
            .field("username", &self.username)
            .field("password", &self.password.as_ref().map(|_| "<redacted>"))
            .field(
                "recovery_code",
                &self
                    .recovery_code
                    .as_ref()
                    .map(|code| code.as_ref().map(|_| "<redacted>")),
            )
            .finish()
    }
}

fn present_or_null<'de, D>(deserializer: D) -> Result<Option<Option<String>>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<String>::deserialize(deserializer).map(Some)
}

/// A section that could not be decoded and was left out of a patch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RejectedSection {
    /// Top-level key
    pub section: String,
    /// Decoder message
    pub reason: String,
}

/// Result of lenient decoding.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DecodedPatch {
    /// Sections that decoded
    pub patch: ContentPatch,
    /// Sections that were present but malformed
    pub rejected: Vec<RejectedSection>,
    /// Keys that are not part of the schema
    pub unknown: Vec<String>,
}

impl ContentPatch {
    /// Decode a partial document, section by section.
    ///
    /// Only a non-object top level is an error. A malformed section is
    /// dropped and reported so the rest of the document still applies;
    /// `null` sections count as absent.
    pub fn decode(value: Value) -> Result<DecodedPatch, ContentError> {
        let Value::Object(map) = value else {
            return Err(ContentError::NotAnObject {
                found: json_type_name(&value),
            });
        };

        let mut decoded = DecodedPatch::default();
        for (key, section) in map {
            if section.is_null() {
                continue;
            }
            let patch = &mut decoded.patch;
            let result = match key.as_str() {
                "general" => serde_json::from_value(section).map(|s| patch.general = Some(s)),
                "home" => serde_json::from_value(section).map(|s| patch.home = Some(s)),
                "about" => serde_json::from_value(section).map(|s| patch.about = Some(s)),
                "services" => lists::list_from_value(section).map(|s| patch.services = Some(s)),
                "posts" => lists::list_from_value(section).map(|s| patch.posts = Some(s)),
                "disclaimer" => {
                    serde_json::from_value(section).map(|s| patch.disclaimer = Some(s))
                }
                "credentials" => {
                    serde_json::from_value(section).map(|s| patch.credentials = Some(s))
                }
                _ => {
                    decoded.unknown.push(key);
                    continue;
                }
            };
            if let Err(e) = result {
                decoded.rejected.push(RejectedSection {
                    section: key,
                    reason: e.to_string(),
                });
            }
        }
        Ok(decoded)
    }

    /// Decode a partial document, failing on the first malformed section.
    pub fn decode_strict(value: Value) -> Result<ContentPatch, ContentError> {
        let decoded = Self::decode(value)?;
        match decoded.rejected.into_iter().next() {
            Some(rejected) => Err(ContentError::invalid_section(
                rejected.section,
                rejected.reason,
            )),
            None => Ok(decoded.patch),
        }
    }

    /// Decode from raw JSON text (lenient).
    pub fn decode_str(text: &str) -> Result<DecodedPatch, ContentError> {
        let value: Value = serde_json::from_str(text)?;
        Self::decode(value)
    }

    /// True when the patch touches nothing
    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }
}

impl From<SiteContent> for ContentPatch {
    /// A patch that sets every field of the document.
    fn from(content: SiteContent) -> Self {
        let SiteContent {
            general,
            home,
            about,
            services,
            posts,
            disclaimer,
            credentials,
        } = content;
        Self {
            general: Some(GeneralPatch {
                phone: Some(general.phone),
                email: Some(general.email),
                address: Some(general.address),
                tagline: Some(general.tagline),
                hero_image: Some(general.hero_image),
                accent_color: Some(general.accent_color),
            }),
            home: Some(HomePatch {
                hero_title: Some(home.hero_title),
                hero_subtitle: Some(home.hero_subtitle),
                intro_text: Some(home.intro_text),
                maintenance: Some(home.maintenance),
                announcement: Some(home.announcement),
            }),
            about: Some(AboutPatch {
                founder: Some(about.founder),
                executives: Some(about.executives),
                cas: Some(about.cas),
                associates_text: Some(about.associates_text),
            }),
            services: Some(services),
            posts: Some(posts),
            disclaimer: Some(DisclaimerPatch {
                popup_text: Some(disclaimer.popup_text),
                footer_text: Some(disclaimer.footer_text),
            }),
            credentials: Some(CredentialsPatch {
                username: Some(credentials.username),
                password: Some(credentials.password),
                recovery_code: Some(credentials.recovery_code),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_decode_partial_sections() {
        let decoded = ContentPatch::decode(json!({
            "general": {"phone": "123"},
            "home": {"maintenance": {"enabled": true, "date": "01/01/2025"}}
        }))
        .unwrap();

        let general = decoded.patch.general.unwrap();
        assert_eq!(general.phone.as_deref(), Some("123"));
        assert!(general.email.is_none());
        assert!(decoded.patch.about.is_none());
        assert!(decoded.rejected.is_empty());
    }

    #[test]
    fn test_decode_drops_malformed_section_only() {
        let decoded = ContentPatch::decode(json!({
            "general": {"phone": 42},
            "disclaimer": {"footerText": "kept"}
        }))
        .unwrap();

        assert!(decoded.patch.general.is_none());
        assert_eq!(
            decoded.patch.disclaimer.unwrap().footer_text.as_deref(),
            Some("kept")
        );
        assert_eq!(decoded.rejected.len(), 1);
        assert_eq!(decoded.rejected[0].section, "general");
    }

    #[test]
    fn test_decode_strict_reports_section() {
        let err = ContentPatch::decode_strict(json!({"services": "oops"})).unwrap_err();
        assert!(matches!(err, ContentError::InvalidSection { ref section, .. } if section == "services"));
    }

    #[test]
    fn test_decode_rejects_non_object() {
        let err = ContentPatch::decode(json!([1, 2, 3])).unwrap_err();
        assert!(matches!(err, ContentError::NotAnObject { found: "array" }));
    }

    #[test]
    fn test_null_sections_are_absent() {
        let decoded = ContentPatch::decode(json!({"posts": null, "about": null})).unwrap();
        assert!(decoded.patch.is_empty());
    }

    #[test]
    fn test_unknown_keys_are_reported() {
        let decoded = ContentPatch::decode(json!({"theme": {}})).unwrap();
        assert_eq!(decoded.unknown, vec!["theme".to_string()]);
    }

    #[test]
    fn test_services_as_keyed_object() {
        let decoded = ContentPatch::decode(json!({
            "services": {
                "0": {"id": "a", "title": "A", "iconName": "Globe"},
                "2": {"id": "c", "title": "C", "iconName": "Ship"}
            }
        }))
        .unwrap();
        let services = decoded.patch.services.unwrap();
        assert_eq!(services.len(), 2);
        assert_eq!(services[1].id, "c");
    }

    #[test]
    fn test_recovery_code_tristate() {
        let keep: CredentialsPatch = serde_json::from_value(json!({"username": "x"})).unwrap();
        assert_eq!(keep.recovery_code, None);

        let clear: CredentialsPatch = serde_json::from_value(json!({"recoveryCode": null})).unwrap();
        assert_eq!(clear.recovery_code, Some(None));

        let set: CredentialsPatch = serde_json::from_value(json!({"recoveryCode": "1"})).unwrap();
        assert_eq!(set.recovery_code, Some(Some("1".to_string())));
    }

    #[test]
    fn test_full_patch_from_document() {
        let patch = ContentPatch::from(SiteContent::default());
        assert!(patch.general.is_some());
        assert_eq!(patch.services.as_ref().map(Vec::len), Some(8));
        assert_eq!(
            patch.credentials.unwrap().recovery_code,
            Some(None)
        );
    }
}
