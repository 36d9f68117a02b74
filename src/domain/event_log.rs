//! Capped event log
//!
//! Detection-ordered list of new-token events with oldest-first eviction.

use super::token::NewTokenEvent;

/// Default cap on retained events
pub const DEFAULT_MAX_LOG_ITEMS: usize = 500;

/// Append `new_events` to `existing` and evict from the front until at most
/// `max_items` remain. Survivors keep their relative order.
pub fn append_capped(
    mut existing: Vec<NewTokenEvent>,
    new_events: &[NewTokenEvent],
    max_items: usize,
) -> Vec<NewTokenEvent> {
    existing.extend_from_slice(new_events);
    if existing.len() > max_items {
        let excess = existing.len() - max_items;
        existing.drain(..excess);
    }
    existing
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::token::TokenRecord;

    fn event(addr: &str, ts: i64) -> NewTokenEvent {
        NewTokenEvent::new(
            TokenRecord {
                address: addr.to_string(),
                ..Default::default()
            },
            ts,
        )
    }

    #[test]
    fn test_append_under_cap() {
        let out = append_capped(vec![event("a", 1)], &[event("b", 2)], 10);
        assert_eq!(out.len(), 2);
        assert_eq!(out[1].token.address, "b");
    }

    #[test]
    fn test_eviction_keeps_newest_in_order() {
        let existing: Vec<_> = (0..5).map(|i| event(&format!("old{}", i), i)).collect();
        let new: Vec<_> = (5..8).map(|i| event(&format!("new{}", i), i)).collect();

        let out = append_capped(existing, &new, 4);
        let stamps: Vec<i64> = out.iter().map(|e| e.timestamp).collect();
        assert_eq!(stamps, vec![4, 5, 6, 7]);
    }

    #[test]
    fn test_full_log_drops_one_per_new_event() {
        let existing: Vec<_> = (0..4).map(|i| event("old", i)).collect();

        let out = append_capped(existing.clone(), &[], 4);
        assert_eq!(out, existing);

        let out = append_capped(existing, &[event("new", 4), event("new", 5)], 4);
        let stamps: Vec<i64> = out.iter().map(|e| e.timestamp).collect();
        assert_eq!(stamps, vec![2, 3, 4, 5]);
    }

    #[test]
    fn test_new_batch_larger_than_cap() {
        let new: Vec<_> = (0..6).map(|i| event("x", i)).collect();
        let out = append_capped(Vec::new(), &new, 3);
        let stamps: Vec<i64> = out.iter().map(|e| e.timestamp).collect();
        assert_eq!(stamps, vec![3, 4, 5]);
    }

    #[test]
    fn test_zero_cap_empties() {
        assert!(append_capped(vec![event("a", 1)], &[event("b", 2)], 0).is_empty());
    }
}
