use std::ops::Range;

use super::{Direction, Item};

/// Number of copies of the source items kept in the working sequence.
pub const COPIES: usize = 3;

/// Source items repeated [`COPIES`] times so the window around any slot in the
/// middle copy always has real neighbours on both sides.
#[derive(Debug, Clone)]
pub struct ExtendedSequence {
    items: Vec<Item>,
}

impl ExtendedSequence {
    /// Returns `None` for an empty source list.
    pub fn build(items: Vec<Item>) -> Option<Self> {
        if items.is_empty() {
            return None;
        }
        Some(Self { items })
    }

    /// Number of source items (`N`).
    pub fn source_len(&self) -> usize {
        self.items.len()
    }

    /// Number of slots in the working sequence (`3N`).
    pub fn len(&self) -> usize {
        self.items.len() * COPIES
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Slot index where the middle copy begins; the cursor starts here.
    pub fn middle_start(&self) -> usize {
        self.items.len()
    }

    pub fn middle(&self) -> Range<usize> {
        let n = self.items.len();
        n..2 * n
    }

    pub fn source_index(&self, slot: usize) -> usize {
        slot % self.items.len()
    }

    pub fn slot(&self, slot: usize) -> Option<&Item> {
        if slot >= self.len() {
            return None;
        }
        self.items.get(self.source_index(slot))
    }

    pub fn slots(&self) -> impl Iterator<Item = (usize, &Item)> {
        (0..self.len()).map(move |slot| (slot, &self.items[slot % self.items.len()]))
    }

    /// Equivalent middle-copy slot when `cursor` has left the middle copy in
    /// the direction of travel. Only the bound ahead of the move is checked.
    pub fn wrap_target(&self, cursor: usize, direction: Direction) -> Option<usize> {
        let n = self.items.len();
        let out_of_range = match direction {
            Direction::Forward => cursor >= 2 * n,
            Direction::Backward => cursor < n,
        };
        out_of_range.then(|| n + cursor % n)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::carousel::{ItemContent, ItemId};

    fn items(n: usize) -> Vec<Item> {
        (0..n)
            .map(|i| Item {
                id: ItemId(i),
                content: ItemContent::Image {
                    src: format!("student {}.jpg", i + 1),
                    alt: String::new(),
                },
            })
            .collect()
    }

    #[test]
    fn empty_source_builds_nothing() {
        assert!(ExtendedSequence::build(Vec::new()).is_none());
    }

    #[test]
    fn slots_repeat_source_order() {
        let seq = ExtendedSequence::build(items(4)).unwrap();
        assert_eq!(seq.len(), 12);
        assert_eq!(seq.middle(), 4..8);
        let ids: Vec<usize> = seq.slots().map(|(_, item)| item.id.0).collect();
        assert_eq!(ids, vec![0, 1, 2, 3, 0, 1, 2, 3, 0, 1, 2, 3]);
        assert!(seq.slot(12).is_none());
    }

    #[test]
    fn wrap_checks_only_the_bound_ahead() {
        let seq = ExtendedSequence::build(items(5)).unwrap();
        assert_eq!(seq.wrap_target(10, Direction::Forward), Some(5));
        assert_eq!(seq.wrap_target(9, Direction::Forward), None);
        assert_eq!(seq.wrap_target(4, Direction::Backward), Some(9));
        assert_eq!(seq.wrap_target(5, Direction::Backward), None);
        // a low cursor is left alone while moving forward
        assert_eq!(seq.wrap_target(4, Direction::Forward), None);
    }
}
