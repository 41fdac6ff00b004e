//! # Folio Core
//!
//! Content schema and merge rules for the Folio site CMS.
//!
//! The site is driven by one [`SiteContent`] document. This crate defines
//! its shape, the compiled-in defaults, partial documents
//! ([`ContentPatch`]) and the one-level, shape-preserving merge that folds
//! partial data from storage, remote snapshots and admin edits into a
//! complete document.
//!
//! ## Example
//!
//! ```
//! use folio_core::{ContentPatch, ListMerge, SiteContent};
//! use serde_json::json;
//!
//! let defaults = SiteContent::default();
//! let decoded = ContentPatch::decode(json!({"general": {"phone": "555"}})).unwrap();
//! let content = defaults.merged(decoded.patch, ListMerge::Replace);
//!
//! assert_eq!(content.general.phone, "555");
//! assert_eq!(content.general.email, defaults.general.email);
//! ```

pub mod content;
pub mod defaults;
pub mod error;
pub mod icon;
pub mod ids;
pub mod lists;
pub mod merge;
pub mod patch;
pub mod remote;
pub mod validate;

pub use content::{
    AboutSection, Announcement, Credentials, DisclaimerSection, GeneralSection, HomeSection,
    Maintenance, Post, Service, SiteContent, TeamMember,
};
pub use defaults::{DEFAULT_PASSWORD, DEFAULT_USERNAME};
pub use error::ContentError;
pub use icon::ServiceIcon;
pub use ids::{EntryKind, new_entry_id};
pub use merge::{ListEntry, ListMerge, merge_list};
pub use patch::{
    AboutPatch, ContentPatch, CredentialsPatch, DecodedPatch, DisclaimerPatch, GeneralPatch,
    HomePatch, RejectedSection,
};
pub use remote::{ConnectionSource, DEFAULT_NODE, RemoteConfig};
pub use validate::SchemaIssue;
