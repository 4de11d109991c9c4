//! Fixed-capacity sliding window of boolean observations

/// Circular buffer of the last `capacity` observations
///
/// Keeps a running count of `true` values so the hit rate is O(1).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoolWindow {
    slots: Vec<bool>,
    capacity: usize,
    // index of the oldest element
    head: usize,
    len: usize,
    ones: usize,
}

impl BoolWindow {
    /// Create an empty window; `capacity` must be non-zero
    pub fn new(capacity: usize) -> Self {
        debug_assert!(capacity > 0, "window capacity must be non-zero");
        Self {
            slots: vec![false; capacity],
            capacity,
            head: 0,
            len: 0,
            ones: 0,
        }
    }

    /// Append an observation, evicting and returning the oldest one when full
    pub fn push(&mut self, value: bool) -> Option<bool> {
        if self.len < self.capacity {
            let tail = (self.head + self.len) % self.capacity;
            self.slots[tail] = value;
            self.len += 1;
            self.ones += usize::from(value);
            None
        } else {
            let evicted = self.slots[self.head];
            self.slots[self.head] = value;
            self.head = (self.head + 1) % self.capacity;
            self.ones = self.ones - usize::from(evicted) + usize::from(value);
            Some(evicted)
        }
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn is_full(&self) -> bool {
        self.len == self.capacity
    }

    /// Number of `true` observations currently held
    pub fn count_ones(&self) -> usize {
        self.ones
    }

    /// Fraction of `true` observations, `None` when empty
    pub fn hit_rate(&self) -> Option<f64> {
        if self.len == 0 {
            None
        } else {
            Some(self.ones as f64 / self.len as f64)
        }
    }

    /// Observations from oldest to newest
    pub fn iter(&self) -> impl Iterator<Item = bool> + '_ {
        (0..self.len).map(move |i| self.slots[(self.head + i) % self.capacity])
    }

    /// Number of `true` values in positions `[start, end)`, counted from the oldest
    pub fn count_ones_in(&self, start: usize, end: usize) -> usize {
        self.iter()
            .skip(start)
            .take(end.saturating_sub(start))
            .filter(|&v| v)
            .count()
    }

    pub fn clear(&mut self) {
        self.slots.iter_mut().for_each(|slot| *slot = false);
        self.head = 0;
        self.len = 0;
        self.ones = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_push_and_evict() {
        let mut window = BoolWindow::new(3);
        assert_eq!(window.push(true), None);
        assert_eq!(window.push(false), None);
        assert_eq!(window.push(true), None);
        assert!(window.is_full());
        assert_eq!(window.count_ones(), 2);

        assert_eq!(window.push(false), Some(true));
        assert_eq!(window.iter().collect::<Vec<_>>(), vec![false, true, false]);
        assert_eq!(window.count_ones(), 1);
        assert_eq!(window.count_ones_in(1, 3), 1);
    }

    #[test]
    fn test_clear() {
        let mut window = BoolWindow::new(2);
        window.push(true);
        window.push(true);
        window.push(true);
        window.clear();
        assert!(window.is_empty());
        assert_eq!(window.hit_rate(), None);
        assert_eq!(window, BoolWindow::new(2));
    }

    proptest! {
        #[test]
        fn prop_window_matches_tail(values in prop::collection::vec(any::<bool>(), 0..200), capacity in 1usize..40) {
            let mut window = BoolWindow::new(capacity);
            for &v in &values {
                window.push(v);
                prop_assert!(window.len() <= capacity);
            }
            let start = values.len().saturating_sub(capacity);
            let expected: Vec<bool> = values[start..].to_vec();
            prop_assert_eq!(window.iter().collect::<Vec<_>>(), expected.clone());
            prop_assert_eq!(window.count_ones(), expected.iter().filter(|&&v| v).count());
            prop_assert_eq!(window.len(), values.len().min(capacity));
        }
    }
}
