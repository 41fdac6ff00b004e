//! Shape-preserving merge.
//!
//! A patch is applied one level deep: every section present in the patch
//! overlays the matching section of the target field by field, and every
//! field present in a section replaces the target field whole. Absent
//! sections and absent fields keep the target's value, so the result is
//! always a complete document.
//!
//! Sub-objects such as `maintenance` or `founder` are fields, so they are
//! replaced whole rather than merged recursively. List fields follow a
//! [`ListMerge`] policy.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::content::{Post, Service, SiteContent, TeamMember};
use crate::patch::ContentPatch;

/// How a list field present in a patch combines with the target list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ListMerge {
    /// The incoming list replaces the target list wholesale
    #[default]
    Replace,
    /// Incoming entries in their order, followed by target entries whose id
    /// the incoming list does not carry
    UnionById,
}

/// A list element with a stable id.
pub trait ListEntry {
    fn entry_id(&self) -> &str;
}

impl ListEntry for TeamMember {
    fn entry_id(&self) -> &str {
        &self.id
    }
}

impl ListEntry for Service {
    fn entry_id(&self) -> &str {
        &self.id
    }
}

impl ListEntry for Post {
    fn entry_id(&self) -> &str {
        &self.id
    }
}

/// Combine an incoming list with the target list.
pub fn merge_list<T: ListEntry>(target: &mut Vec<T>, incoming: Vec<T>, policy: ListMerge) {
    match policy {
        ListMerge::Replace => *target = incoming,
        ListMerge::UnionById => {
            let seen: HashSet<String> = incoming
                .iter()
                .map(|entry| entry.entry_id().to_string())
                .collect();
            let local_only: Vec<T> = std::mem::take(target)
                .into_iter()
                .filter(|entry| !seen.contains(entry.entry_id()))
                .collect();
            *target = incoming;
            target.extend(local_only);
        }
    }
}

/// Overlay every present field of a section patch onto its target.
macro_rules! overlay {
    ($target:expr, $patch:expr; $($field:ident),+ $(,)?) => {
        $(
            if let Some(value) = $patch.$field {
                $target.$field = value;
            }
        )+
    };
}

impl SiteContent {
    /// Apply a patch in place.
    pub fn apply(&mut self, patch: ContentPatch, lists: ListMerge) {
        let ContentPatch {
            general,
            home,
            about,
            services,
            posts,
            disclaimer,
            credentials,
        } = patch;

        if let Some(general) = general {
            overlay!(self.general, general; phone, email, address, tagline, hero_image, accent_color);
        }
        if let Some(home) = home {
            overlay!(self.home, home; hero_title, hero_subtitle, intro_text, maintenance, announcement);
        }
        if let Some(about) = about {
            overlay!(self.about, about; founder, associates_text);
            if let Some(executives) = about.executives {
                merge_list(&mut self.about.executives, executives, lists);
            }
            if let Some(cas) = about.cas {
                merge_list(&mut self.about.cas, cas, lists);
            }
        }
        if let Some(services) = services {
            merge_list(&mut self.services, services, lists);
        }
        if let Some(posts) = posts {
            merge_list(&mut self.posts, posts, lists);
        }
        if let Some(disclaimer) = disclaimer {
            overlay!(self.disclaimer, disclaimer; popup_text, footer_text);
        }
        if let Some(credentials) = credentials {
            overlay!(self.credentials, credentials; username, password, recovery_code);
        }
    }

    /// Return a new document with the patch applied.
    pub fn merged(&self, patch: ContentPatch, lists: ListMerge) -> SiteContent {
        let mut next = self.clone();
        next.apply(patch, lists);
        next
    }
}
