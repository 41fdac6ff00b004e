//! Response bodies

use folio_cms::{SyncWarning, UpdateOutcome};
use folio_core::{
    AboutSection, DisclaimerSection, GeneralSection, HomeSection, Post, Service, ServiceIcon,
    SiteContent,
};
use serde::Serialize;

/// What visitors see: everything except credentials
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicContent {
    pub general: GeneralSection,
    pub home: HomeSection,
    pub about: AboutSection,
    pub services: Vec<PublicService>,
    pub posts: Vec<Post>,
    pub disclaimer: DisclaimerSection,
}

/// A service with its icon resolved
#[derive(Debug, Clone, Serialize)]
pub struct PublicService {
    #[serde(flatten)]
    pub service: Service,
    pub icon: ServiceIcon,
}

impl From<&SiteContent> for PublicContent {
    fn from(content: &SiteContent) -> Self {
        Self {
            general: content.general.clone(),
            home: content.home.clone(),
            about: content.about.clone(),
            services: content
                .services
                .iter()
                .map(|service| PublicService {
                    icon: service.icon(),
                    service: service.clone(),
                })
                .collect(),
            posts: content.posts.clone(),
            disclaimer: content.disclaimer.clone(),
        }
    }
}

/// The document as the admin panel sees it.
///
/// The stored password and any recovery code never leave the server.
pub fn redacted(content: &SiteContent) -> SiteContent {
    let mut content = content.clone();
    content.credentials.password = String::new();
    content.credentials.recovery_code = None;
    content
}

/// Result of a write
#[derive(Debug, Clone, Serialize)]
pub struct WriteResponse {
    pub content: SiteContent,
    pub warnings: Vec<SyncWarning>,
}

impl From<UpdateOutcome> for WriteResponse {
    fn from(outcome: UpdateOutcome) -> Self {
        Self {
            content: redacted(&outcome.content),
            warnings: outcome.warnings,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_public_view_hides_credentials() {
        let value = serde_json::to_value(PublicContent::from(&SiteContent::default())).unwrap();
        assert!(value.get("credentials").is_none());
        assert!(value["services"][0]["icon"].is_string());
        assert!(value["services"][0]["iconName"].is_string());
    }

    #[test]
    fn test_redacted_keeps_username() {
        let content = redacted(&SiteContent::default());
        assert_eq!(content.credentials.username, folio_core::DEFAULT_USERNAME);
        assert!(content.credentials.password.is_empty());
    }
}
