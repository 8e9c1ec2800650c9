//! Bounded memory of recently dispatched event ids. Absorbs at-least-once redelivery.

use std::collections::{HashSet, VecDeque};

pub(crate) struct SeenEvents {
    capacity: usize,
    ids: HashSet<String>,
    order: VecDeque<String>,
}

impl SeenEvents {
    pub(crate) fn new(capacity: usize) -> Self {
        Self {
            capacity,
            ids: HashSet::new(),
            order: VecDeque::new(),
        }
    }

    /// Records `id`; returns false if it was already seen within the window.
    pub(crate) fn first_delivery(&mut self, id: &str) -> bool {
        if self.capacity == 0 {
            return true;
        }
        if self.ids.contains(id) {
            return false;
        }
        if self.order.len() == self.capacity {
            if let Some(oldest) = self.order.pop_front() {
                self.ids.remove(&oldest);
            }
        }
        self.ids.insert(id.to_string());
        self.order.push_back(id.to_string());
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_redelivery_detected() {
        let mut seen = SeenEvents::new(4);
        assert!(seen.first_delivery("a"));
        assert!(!seen.first_delivery("a"));
        assert!(seen.first_delivery("b"));
    }

    #[test]
    fn test_window_evicts_oldest() {
        let mut seen = SeenEvents::new(2);
        assert!(seen.first_delivery("a"));
        assert!(seen.first_delivery("b"));
        assert!(seen.first_delivery("c"));
        assert!(seen.first_delivery("a"));
        assert!(!seen.first_delivery("c"));
    }

    #[test]
    fn test_zero_capacity_disables() {
        let mut seen = SeenEvents::new(0);
        assert!(seen.first_delivery("a"));
        assert!(seen.first_delivery("a"));
    }
}
