//! Ids for new list entries.

use uuid::Uuid;

/// The kind of list entry an id is minted for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntryKind {
    Executive,
    CharteredAccountant,
    Service,
    Post,
}

impl EntryKind {
    /// Id prefix
    pub fn prefix(self) -> &'static str {
        match self {
            EntryKind::Executive => "exec",
            EntryKind::CharteredAccountant => "ca",
            EntryKind::Service => "srv",
            EntryKind::Post => "post",
        }
    }

    /// Parse the list name used in admin routes.
    pub fn from_list_name(name: &str) -> Option<Self> {
        match name {
            "executives" => Some(EntryKind::Executive),
            "cas" => Some(EntryKind::CharteredAccountant),
            "services" => Some(EntryKind::Service),
            "posts" => Some(EntryKind::Post),
            _ => None,
        }
    }

    /// List name in the document
    pub fn list_name(self) -> &'static str {
        match self {
            EntryKind::Executive => "executives",
            EntryKind::CharteredAccountant => "cas",
            EntryKind::Service => "services",
            EntryKind::Post => "posts",
        }
    }
}

/// Mint a fresh id, e.g. `srv-3f2a...`.
///
/// Ids are only generated for new entries; existing ids are never rewritten.
pub fn new_entry_id(kind: EntryKind) -> String {
    format!("{}-{}", kind.prefix(), Uuid::new_v4().simple())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ids_are_prefixed_and_unique() {
        let a = new_entry_id(EntryKind::Service);
        let b = new_entry_id(EntryKind::Service);
        assert!(a.starts_with("srv-"));
        assert_ne!(a, b);
        assert_eq!(a.len(), "srv-".len() + 32);
    }

    #[test]
    fn test_list_names_roundtrip() {
        for kind in [
            EntryKind::Executive,
            EntryKind::CharteredAccountant,
            EntryKind::Service,
            EntryKind::Post,
        ] {
            assert_eq!(EntryKind::from_list_name(kind.list_name()), Some(kind));
        }
        assert_eq!(EntryKind::from_list_name("founder"), None);
    }
}
