//! The Content Document and its sections.
//!
//! A [`SiteContent`] is always fully shaped: every section and every field
//! is present. Partial data from storage, remote snapshots or admin edits
//! is expressed as a [`ContentPatch`](crate::ContentPatch) and merged over
//! a complete document.
//!
//! Field names serialize in camelCase so persisted blobs and remote nodes
//! keep the JSON shape the site has always used.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::icon::ServiceIcon;
use crate::lists;

/// The single editable document behind the site.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SiteContent {
    /// Contact and branding
    pub general: GeneralSection,
    /// Landing page copy and banners
    pub home: HomeSection,
    /// Team and firm description
    pub about: AboutSection,
    /// Practice areas
    #[serde(deserialize_with = "lists::deserialize")]
    pub services: Vec<Service>,
    /// News and articles (absent in older documents)
    #[serde(default, deserialize_with = "lists::deserialize")]
    pub posts: Vec<Post>,
    /// Regulatory disclaimer texts
    pub disclaimer: DisclaimerSection,
    /// Admin credentials
    pub credentials: Credentials,
}

/// Contact and branding fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneralSection {
    pub phone: String,
    pub email: String,
    pub address: String,
    pub tagline: String,
    /// URL or embedded data for the hero background
    pub hero_image: String,
    /// Hex color, e.g. `#C5A059`
    pub accent_color: String,
}

/// Landing page copy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HomeSection {
    pub hero_title: String,
    pub hero_subtitle: String,
    pub intro_text: String,
    pub maintenance: Maintenance,
    #[serde(default)]
    pub announcement: Announcement,
}

/// Maintenance banner.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Maintenance {
    #[serde(default)]
    pub enabled: bool,
    /// Free-form date shown in the banner
    #[serde(default)]
    pub date: String,
}

/// Announcement ticker.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Announcement {
    #[serde(default)]
    pub enabled: bool,
    #[serde(default)]
    pub text: String,
}

/// Team section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AboutSection {
    pub founder: TeamMember,
    #[serde(deserialize_with = "lists::deserialize")]
    pub executives: Vec<TeamMember>,
    /// Chartered accountants
    #[serde(deserialize_with = "lists::deserialize")]
    pub cas: Vec<TeamMember>,
    pub associates_text: String,
}

/// A person shown on the about page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeamMember {
    /// Stable key within its list
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub role: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub qualifications: Option<String>,
    #[serde(default)]
    pub bio: String,
    /// URL or embedded data
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

/// A practice area.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Service {
    pub id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    /// Raw icon name as edited; resolve with [`Service::icon`]
    #[serde(default)]
    pub icon_name: String,
    /// URL or embedded data
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub video_url: Option<String>,
}

impl Service {
    /// Resolve the icon name against the fixed icon set.
    pub fn icon(&self) -> ServiceIcon {
        ServiceIcon::resolve(&self.icon_name)
    }
}

/// A news entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    pub id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub date: String,
    #[serde(default)]
    pub excerpt: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub external_url: Option<String>,
}

/// Disclaimer texts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DisclaimerSection {
    /// Shown in the entry modal
    pub popup_text: String,
    /// Shown in the page footer
    pub footer_text: String,
}

/// Admin credentials.
///
/// `password` holds either an Argon2 PHC string or a legacy plaintext
/// value. `recovery_code` is only ever cleared by this system; it stays in
/// the schema so older documents that carry one decode and get cleaned.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Credentials {
    pub username: String,
    pub password: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recovery_code: Option<String>,
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .field("recovery_code", &self.recovery_code.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}
