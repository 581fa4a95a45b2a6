/// Ordered toggle set of ids.
///
/// Toggling a member removes it; toggling anything else appends it, so the
/// display order is the order items were picked in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectionSet<T> {
    items: Vec<T>,
}

impl<T> Default for SelectionSet<T> {
    fn default() -> Self {
        Self { items: Vec::new() }
    }
}

impl<T: PartialEq + Clone> SelectionSet<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns whether `item` is selected afterwards.
    pub fn toggle(&mut self, item: T) -> bool {
        match self.items.iter().position(|x| *x == item) {
            Some(index) => {
                self.items.remove(index);
                false
            }
            None => {
                self.items.push(item);
                true
            }
        }
    }

    pub fn contains(&self, item: &T) -> bool {
        self.items.contains(item)
    }

    /// Drop members not in `valid`, e.g. after the list they came from reloads
    pub fn retain_known(&mut self, valid: &[T]) {
        self.items.retain(|x| valid.contains(x));
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn items(&self) -> &[T] {
        &self.items
    }

    pub fn to_vec(&self) -> Vec<T> {
        self.items.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_toggle_keeps_pick_order() {
        let mut set = SelectionSet::new();
        assert!(set.toggle("e2"));
        assert!(set.toggle("e1"));
        assert!(set.toggle("e3"));
        assert!(!set.toggle("e1"));
        assert_eq!(set.items(), &["e2", "e3"]);
    }

    #[test]
    fn test_retain_known() {
        let mut set = SelectionSet::new();
        set.toggle("e1");
        set.toggle("e2");
        set.retain_known(&["e2", "e9"]);
        assert_eq!(set.items(), &["e2"]);
    }

    proptest! {
        #[test]
        fn toggling_twice_is_identity(
            initial in proptest::collection::vec(0u8..16, 0..8),
            id in 0u8..16,
        ) {
            let mut set = SelectionSet::new();
            for x in initial {
                set.toggle(x);
            }
            let before = set.clone();
            set.toggle(id);
            set.toggle(id);
            // Re-adding a removed member moves it to the end.
            if before.contains(&id) {
                let mut after = set.to_vec();
                let mut expected = before.to_vec();
                after.sort_unstable();
                expected.sort_unstable();
                prop_assert_eq!(after, expected);
                prop_assert_eq!(set.items().last(), Some(&id));
            } else {
                prop_assert_eq!(set, before);
            }
        }
    }
}
