//! Seen-address set
//!
//! Grow-only set of lowercase token addresses. Membership and insertion
//! are case-insensitive; empty addresses are never stored.

use std::collections::HashSet;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SeenSet {
    addresses: HashSet<String>,
}

impl SeenSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from raw addresses, lowercasing each
    pub fn from_addresses<I, S>(addresses: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut set = Self::new();
        for addr in addresses {
            set.insert(addr.as_ref());
        }
        set
    }

    /// Insert an address. Returns true if it was not present before.
    pub fn insert(&mut self, address: &str) -> bool {
        let key = address.trim().to_lowercase();
        if key.is_empty() {
            return false;
        }
        self.addresses.insert(key)
    }

    pub fn contains(&self, address: &str) -> bool {
        self.addresses.contains(&address.trim().to_lowercase())
    }

    pub fn len(&self) -> usize {
        self.addresses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.addresses.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.addresses.iter().map(String::as_str)
    }

    /// Addresses in lexicographic order, for stable documents
    pub fn sorted(&self) -> Vec<&str> {
        let mut out: Vec<&str> = self.iter().collect();
        out.sort_unstable();
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_case_insensitive_membership() {
        let mut set = SeenSet::new();
        assert!(set.insert("0xABC"));
        assert!(set.contains("0xabc"));
        assert!(set.contains("0XaBc"));
        assert!(!set.insert("0xabc"));
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn test_empty_address_ignored() {
        let mut set = SeenSet::new();
        assert!(!set.insert(""));
        assert!(!set.insert("   "));
        assert!(set.is_empty());
    }

    #[test]
    fn test_from_addresses_lowercases() {
        let set = SeenSet::from_addresses(["0xDEF", "0xabc", "0xABC"]);
        assert_eq!(set.sorted(), vec!["0xabc", "0xdef"]);
    }
}
