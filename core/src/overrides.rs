//! # Override List
//!
//! Literal strings that classify as VPN no matter what the range lists say.
//!
//! Entries are matched by exact text only, surrounding whitespace included. They are
//! not parsed or expanded; an operator may list anything non-empty. Listing keeps
//! insertion order.

use parking_lot::RwLock;

use crate::error::OverrideError;

#[derive(Debug, Default)]
pub struct OverrideList {
    entries: RwLock<Vec<String>>,
}

impl OverrideList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a list from seed entries, silently dropping empty ones.
    pub fn with_entries<I, S>(entries: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let list = Self::new();
        for entry in entries {
            let _ = list.add(entry.as_ref());
        }
        list
    }

    /// Appends `entry`, returning `true` if it was not already present.
    pub fn add(&self, entry: &str) -> Result<bool, OverrideError> {
        if entry.is_empty() {
            return Err(OverrideError::Empty);
        }

        let mut entries = self.entries.write();
        if entries.iter().any(|existing| existing == entry) {
            return Ok(false);
        }
        entries.push(entry.to_string());
        Ok(true)
    }

    /// Removes `entry`, returning `true` if it was present.
    pub fn remove(&self, entry: &str) -> bool {
        let mut entries = self.entries.write();
        match entries.iter().position(|existing| existing == entry) {
            Some(index) => {
                entries.remove(index);
                true
            }
            None => false,
        }
    }

    pub fn contains(&self, entry: &str) -> bool {
        self.entries.read().iter().any(|existing| existing == entry)
    }

    /// Snapshot of all entries in the order they were added.
    pub fn list(&self) -> Vec<String> {
        self.entries.read().clone()
    }

    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
