use std::collections::BTreeSet;

use tracing::debug;

use crate::effects::{Confetti, Effect};

pub const MISMATCH_MESSAGE: &str = "Oops! Try the other box.";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bin {
    pub name: &'static str,
    pub color: &'static str,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortItem {
    pub id: &'static str,
    pub name: &'static str,
    pub category: &'static str,
    pub icon: &'static str,
}

pub fn builtin_bins() -> Vec<Bin> {
    vec![
        Bin {
            name: "First Aid Kit",
            color: "#ff8ba7",
        },
        Bin {
            name: "Cleaning",
            color: "#95d5b2",
        },
    ]
}

pub fn builtin_items() -> Vec<SortItem> {
    vec![
        SortItem {
            id: "b1",
            name: "Bandage",
            category: "First Aid Kit",
            icon: "🩹",
        },
        SortItem {
            id: "s1",
            name: "Soap",
            category: "Cleaning",
            icon: "🧼",
        },
        SortItem {
            id: "a1",
            name: "Antiseptic",
            category: "First Aid Kit",
            icon: "🧴",
        },
        SortItem {
            id: "m1",
            name: "Mop",
            category: "Cleaning",
            icon: "🧹",
        },
    ]
}

#[derive(Debug, Clone, PartialEq)]
pub enum SortResult {
    Placed { item: &'static str, effects: Vec<Effect> },
    Mismatch { effects: Vec<Effect> },
    NothingSelected,
}

/// Tap an item, then tap the bin it belongs to.
#[derive(Debug, Clone)]
pub struct SortingPuzzle {
    bins: Vec<Bin>,
    items: Vec<SortItem>,
    sorted: BTreeSet<&'static str>,
    selected: Option<usize>,
}

impl Default for SortingPuzzle {
    fn default() -> Self {
        Self::new(builtin_bins(), builtin_items())
    }
}

impl SortingPuzzle {
    pub fn new(bins: Vec<Bin>, items: Vec<SortItem>) -> Self {
        Self {
            bins,
            items,
            sorted: BTreeSet::new(),
            selected: None,
        }
    }

    pub fn bins(&self) -> &[Bin] {
        &self.bins
    }

    pub fn selected(&self) -> Option<&SortItem> {
        self.selected.map(|index| &self.items[index])
    }

    pub fn is_sorted(&self, item_id: &str) -> bool {
        self.sorted.contains(item_id)
    }

    pub fn unsorted_items(&self) -> impl Iterator<Item = &SortItem> {
        self.items.iter().filter(|item| !self.sorted.contains(item.id))
    }

    pub fn items_in<'a>(&'a self, bin: &'a str) -> impl Iterator<Item = &'a SortItem> + 'a {
        self.items
            .iter()
            .filter(move |item| item.category == bin && self.sorted.contains(item.id))
    }

    /// Picks up an item. Unknown or already sorted items are ignored.
    pub fn select(&mut self, item_id: &str) -> bool {
        let found = self
            .items
            .iter()
            .position(|item| item.id == item_id && !self.sorted.contains(item.id));

        match found {
            Some(index) => {
                self.selected = Some(index);
                true
            }
            None => false,
        }
    }

    pub fn drop_into(&mut self, bin: &str) -> SortResult {
        let Some(index) = self.selected.take() else {
            return SortResult::NothingSelected;
        };
        let item = &self.items[index];

        if item.category == bin {
            debug!(item = item.id, bin, "item sorted");
            self.sorted.insert(item.id);
            SortResult::Placed {
                item: item.id,
                effects: vec![Effect::Celebrate(Confetti::item_sorted())],
            }
        } else {
            debug!(item = item.id, bin, "item dropped in the wrong bin");
            SortResult::Mismatch {
                effects: vec![Effect::speak(MISMATCH_MESSAGE)],
            }
        }
    }

    pub fn is_complete(&self) -> bool {
        self.sorted.len() == self.items.len()
    }

    pub fn play_again(&mut self) {
        self.sorted.clear();
        self.selected = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn correct_bin_sorts_item() {
        let mut puzzle = SortingPuzzle::default();
        assert!(puzzle.select("b1"));

        let result = puzzle.drop_into("First Aid Kit");

        assert!(matches!(result, SortResult::Placed { item: "b1", .. }));
        assert!(puzzle.is_sorted("b1"));
        assert!(puzzle.selected().is_none());
        assert_eq!(puzzle.items_in("First Aid Kit").count(), 1);
    }

    #[test]
    fn wrong_bin_clears_selection_and_speaks() {
        let mut puzzle = SortingPuzzle::default();
        puzzle.select("s1");

        let result = puzzle.drop_into("First Aid Kit");

        assert_eq!(
            result,
            SortResult::Mismatch {
                effects: vec![Effect::speak(MISMATCH_MESSAGE)]
            }
        );
        assert!(!puzzle.is_sorted("s1"));
        assert!(puzzle.selected().is_none());
    }

    #[test]
    fn bin_without_selection_is_noop() {
        let mut puzzle = SortingPuzzle::default();
        assert_eq!(puzzle.drop_into("Cleaning"), SortResult::NothingSelected);
    }

    #[test]
    fn sorted_and_unknown_items_cannot_be_selected() {
        let mut puzzle = SortingPuzzle::default();
        puzzle.select("m1");
        puzzle.drop_into("Cleaning");

        assert!(!puzzle.select("m1"));
        assert!(!puzzle.select("zz"));
        assert_eq!(puzzle.unsorted_items().count(), 3);
    }

    #[test]
    fn completes_and_restarts() {
        let mut puzzle = SortingPuzzle::default();
        for item in builtin_items() {
            puzzle.select(item.id);
            puzzle.drop_into(item.category);
        }

        assert!(puzzle.is_complete());
        puzzle.play_again();
        assert!(!puzzle.is_complete());
        assert_eq!(puzzle.unsorted_items().count(), 4);
    }
}
