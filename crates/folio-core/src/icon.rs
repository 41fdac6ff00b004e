//! Service icons.
//!
//! Icon names are free text in the document. They resolve through a fixed
//! table; anything not in the table falls back to [`ServiceIcon::Briefcase`].

use std::fmt;

use serde::{Deserialize, Serialize};

/// The fixed set of icons a service can show.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ServiceIcon {
    Calculator,
    Rocket,
    Stethoscope,
    Globe,
    ShieldCheck,
    Home,
    Ship,
    Landmark,
    Scale,
    Gavel,
    FileText,
    Users,
    Building,
    #[default]
    Briefcase,
}

const TABLE: &[(&str, ServiceIcon)] = &[
    ("Calculator", ServiceIcon::Calculator),
    ("Rocket", ServiceIcon::Rocket),
    ("Stethoscope", ServiceIcon::Stethoscope),
    ("Globe", ServiceIcon::Globe),
    ("ShieldCheck", ServiceIcon::ShieldCheck),
    ("Home", ServiceIcon::Home),
    ("Ship", ServiceIcon::Ship),
    ("Landmark", ServiceIcon::Landmark),
    ("Scale", ServiceIcon::Scale),
    ("Gavel", ServiceIcon::Gavel),
    ("FileText", ServiceIcon::FileText),
    ("Users", ServiceIcon::Users),
    ("Building", ServiceIcon::Building),
    ("Briefcase", ServiceIcon::Briefcase),
];

impl ServiceIcon {
    /// Every icon, in table order
    pub const ALL: [ServiceIcon; 14] = [
        ServiceIcon::Calculator,
        ServiceIcon::Rocket,
        ServiceIcon::Stethoscope,
        ServiceIcon::Globe,
        ServiceIcon::ShieldCheck,
        ServiceIcon::Home,
        ServiceIcon::Ship,
        ServiceIcon::Landmark,
        ServiceIcon::Scale,
        ServiceIcon::Gavel,
        ServiceIcon::FileText,
        ServiceIcon::Users,
        ServiceIcon::Building,
        ServiceIcon::Briefcase,
    ];

    /// Look up an icon by its exact name, if it is in the table.
    pub fn lookup(name: &str) -> Option<Self> {
        let name = name.trim();
        TABLE
            .iter()
            .find(|(candidate, _)| *candidate == name)
            .map(|(_, icon)| *icon)
    }

    /// Resolve a name, falling back to the default icon.
    pub fn resolve(name: &str) -> Self {
        Self::lookup(name).unwrap_or_default()
    }

    /// Canonical name
    pub fn name(self) -> &'static str {
        TABLE
            .iter()
            .find(|(_, icon)| *icon == self)
            .map(|(name, _)| *name)
            .unwrap_or("Briefcase")
    }
}

impl fmt::Display for ServiceIcon {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_icon_resolves_to_itself() {
        for icon in ServiceIcon::ALL {
            assert_eq!(ServiceIcon::resolve(icon.name()), icon);
        }
    }

    #[test]
    fn test_unknown_and_empty_fall_back() {
        assert_eq!(ServiceIcon::resolve(""), ServiceIcon::Briefcase);
        assert_eq!(ServiceIcon::resolve("constructor"), ServiceIcon::Briefcase);
        assert_eq!(ServiceIcon::lookup("calculator"), None);
    }

    #[test]
    fn test_surrounding_whitespace_is_ignored() {
        assert_eq!(ServiceIcon::resolve("  Ship "), ServiceIcon::Ship);
    }

    #[test]
    fn test_table_covers_all() {
        assert_eq!(TABLE.len(), ServiceIcon::ALL.len());
    }
}
