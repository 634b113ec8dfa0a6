//! Ignore set for listing and sync.
//!
//! The ignore set is the single source of exclusion rules for every traversal
//! (`get_all`, fetch, push, migrate, clear). It always contains the reserved
//! settings node; user patterns from configuration are added on top. A title
//! is ignored when the whole title, or any of its `/`-separated components,
//! is in the set, so a reserved directory hides its entire subtree.

use crate::settings::SETTINGS_TITLE;
use std::collections::BTreeSet;

/// Built-in reserved titles.
const BUILTIN_RESERVED: &[&str] = &[SETTINGS_TITLE];

/// Reserved titles excluded from all traversal and sync operations
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IgnoreSet {
    titles: BTreeSet<String>,
}

impl Default for IgnoreSet {
    fn default() -> Self {
        Self {
            titles: BUILTIN_RESERVED.iter().map(|s| s.to_string()).collect(),
        }
    }
}

impl IgnoreSet {
    /// Built-in reserved titles plus `extra` (blank entries are skipped).
    pub fn with_extra<I, S>(extra: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut set = Self::default();
        for pattern in extra {
            let pattern = pattern.as_ref().trim().trim_matches('/');
            if !pattern.is_empty() {
                set.titles.insert(pattern.to_string());
            }
        }
        set
    }

    /// A set with nothing in it, not even the reserved settings node.
    pub fn empty() -> Self {
        Self {
            titles: BTreeSet::new(),
        }
    }

    pub fn matches(&self, title: &str) -> bool {
        if self.titles.contains(title) {
            return true;
        }
        title
            .split('/')
            .filter(|component| !component.is_empty())
            .any(|component| self.titles.contains(component))
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.titles.iter().map(String::as_str)
    }
}
