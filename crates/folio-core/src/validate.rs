//! Schema checks that never block a write.
//!
//! Merging performs no validation; these checks are run after the fact and
//! logged so an operator can spot broken content.

use std::collections::HashSet;
use std::fmt;

use crate::content::SiteContent;
use crate::merge::ListEntry;

/// Something odd about a document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SchemaIssue {
    /// An entry in `list` has an empty id
    EmptyId { list: &'static str, index: usize },
    /// Two entries in `list` share an id
    DuplicateId { list: &'static str, id: String },
    /// `general.accentColor` is not `#rgb` or `#rrggbb`
    AccentColor { value: String },
}

impl fmt::Display for SchemaIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SchemaIssue::EmptyId { list, index } => {
                write!(f, "{list}[{index}] has an empty id")
            }
            SchemaIssue::DuplicateId { list, id } => {
                write!(f, "{list} contains duplicate id '{id}'")
            }
            SchemaIssue::AccentColor { value } => {
                write!(f, "accent color '{value}' is not a hex color")
            }
        }
    }
}

fn check_list<T: ListEntry>(list: &'static str, entries: &[T], issues: &mut Vec<SchemaIssue>) {
    let mut seen = HashSet::new();
    for (index, entry) in entries.iter().enumerate() {
        let id = entry.entry_id();
        if id.trim().is_empty() {
            issues.push(SchemaIssue::EmptyId { list, index });
        } else if !seen.insert(id) {
            issues.push(SchemaIssue::DuplicateId {
                list,
                id: id.to_string(),
            });
        }
    }
}

fn is_hex_color(value: &str) -> bool {
    match value.strip_prefix('#') {
        Some(hex) => {
            matches!(hex.len(), 3 | 6) && hex.chars().all(|c| c.is_ascii_hexdigit())
        }
        None => false,
    }
}

impl SiteContent {
    /// Collect schema issues. An empty result means the document is clean.
    pub fn validate(&self) -> Vec<SchemaIssue> {
        let mut issues = Vec::new();
        check_list("executives", &self.about.executives, &mut issues);
        check_list("cas", &self.about.cas, &mut issues);
        check_list("services", &self.services, &mut issues);
        check_list("posts", &self.posts, &mut issues);
        if !is_hex_color(&self.general.accent_color) {
            issues.push(SchemaIssue::AccentColor {
                value: self.general.accent_color.clone(),
            });
        }
        issues
    }
}
