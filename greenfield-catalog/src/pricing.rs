use serde::Serialize;

use crate::slot::Slot;

/// Prices closer than this (half a paisa) count as equal.
const PRICE_TOLERANCE: f64 = 0.005;

/// Server-side price for a slot selection, computed from the stored slots.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SlotQuote {
    pub total: f64,
    pub priced_slots: usize,
    /// Requested ids with no stored slot behind them.
    pub unknown_slots: Vec<String>,
}

impl SlotQuote {
    pub fn matches(&self, client_total: f64) -> bool {
        self.unknown_slots.is_empty() && (self.total - client_total).abs() < PRICE_TOLERANCE
    }
}

/// Sums the stored price of every distinct requested slot. `slots` holds
/// whatever the repository found for `requested`, in any order. A repeated id
/// is priced once, the same way it is claimed once.
pub fn quote(requested: &[String], slots: &[Slot]) -> SlotQuote {
    let mut total = 0.0;
    let mut priced_slots = 0;
    let mut unknown_slots = Vec::new();
    let mut seen: Vec<&String> = Vec::with_capacity(requested.len());

    for id in requested {
        if seen.contains(&id) {
            continue;
        }
        seen.push(id);
        match slots.iter().find(|s| &s.id == id) {
            Some(slot) => {
                total += slot.price;
                priced_slots += 1;
            }
            None => unknown_slots.push(id.clone()),
        }
    }

    SlotQuote { total, priced_slots, unknown_slots }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn slot(id: &str, price: f64) -> Slot {
        Slot {
            id: id.to_string(),
            turf_id: "turf1".to_string(),
            date: NaiveDate::from_ymd_opt(2026, 10, 19).unwrap(),
            time: "6:00 AM - 7:00 AM".to_string(),
            available: true,
            price,
        }
    }

    #[test]
    fn test_quote_sums_known_slots() {
        let slots = vec![slot("a", 500.0), slot("b", 500.0)];
        let q = quote(&["a".to_string(), "b".to_string()], &slots);

        assert_eq!(q.total, 1000.0);
        assert_eq!(q.priced_slots, 2);
        assert!(q.matches(1000.0));
        assert!(!q.matches(1.0));
    }

    #[test]
    fn test_unknown_slots_never_match() {
        let slots = vec![slot("a", 500.0)];
        let q = quote(&["a".to_string(), "ghost".to_string()], &slots);

        assert_eq!(q.unknown_slots, vec!["ghost".to_string()]);
        assert!(!q.matches(500.0));
    }

    #[test]
    fn test_repeated_ids_are_priced_once() {
        let slots = vec![slot("a", 500.0), slot("b", 700.0)];
        let requested = ["a", "b", "a"].map(String::from);
        let q = quote(&requested, &slots);

        assert_eq!(q.total, 1200.0);
        assert_eq!(q.priced_slots, 2);
        assert!(q.matches(1200.0));
    }
}
