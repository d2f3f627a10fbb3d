use crate::category::{self, Category, CategoryId};
use std::collections::HashSet;

/// The current selection, read as a tagged variant so "nothing selected" is
/// always handled explicitly.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Selection<'a> {
    Selected { index: usize, category: &'a Category },
    Empty,
}

impl<'a> Selection<'a> {
    pub fn category(&self) -> Option<&'a Category> {
        match self {
            Self::Selected { category, .. } => Some(category),
            Self::Empty => None,
        }
    }

    pub fn index(&self) -> Option<usize> {
        match self {
            Self::Selected { index, .. } => Some(*index),
            Self::Empty => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectionChange {
    pub previous: Option<CategoryId>,
    pub current: CategoryId,
    pub index: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Replacement {
    pub previous_count: usize,
    pub count: usize,
    pub selection_changed: bool,
}

impl Replacement {
    pub fn count_changed(&self) -> bool {
        self.previous_count != self.count
    }
}

/// Ordered categories plus the selected id. The only place either lives.
#[derive(Debug, Clone, Default)]
pub struct ChartState {
    categories: Vec<Category>,
    selected: Option<CategoryId>,
}

impl ChartState {
    pub fn new(categories: Vec<Category>, initial: Option<&CategoryId>) -> Self {
        warn_on_duplicates(&categories);

        let selected = initial
            .filter(|id| categories.iter().any(|c| c.id() == *id))
            .or_else(|| categories.first().map(Category::id))
            .cloned();

        Self {
            categories,
            selected,
        }
    }

    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    pub fn total(&self) -> f64 {
        category::total(&self.categories)
    }

    pub fn selected_id(&self) -> Option<&CategoryId> {
        self.selected.as_ref()
    }

    pub fn selection(&self) -> Selection<'_> {
        self.selected
            .as_ref()
            .and_then(|id| self.position(id))
            .map_or(Selection::Empty, |index| Selection::Selected {
                index,
                category: &self.categories[index],
            })
    }

    pub fn position(&self, id: &CategoryId) -> Option<usize> {
        self.categories.iter().position(|c| c.id() == id)
    }

    /// Selects a member of the current sequence. Unknown ids (e.g. from a
    /// sequence that has since been replaced) and the already-selected id are
    /// no-ops and return `None`.
    pub fn select(&mut self, id: &CategoryId) -> Option<SelectionChange> {
        if self.selected.as_ref() == Some(id) {
            return None;
        }

        let Some(index) = self.position(id) else {
            log::debug!("Ignoring selection of unknown category '{}'", id);
            return None;
        };

        let previous = self.selected.replace(id.clone());
        Some(SelectionChange {
            previous,
            current: id.clone(),
            index,
        })
    }

    /// Swaps in a new sequence. A selection whose id survives is kept;
    /// otherwise it falls back to the first category, or to nothing.
    pub fn replace_categories(&mut self, categories: Vec<Category>) -> Replacement {
        warn_on_duplicates(&categories);

        let previous_count = self.categories.len();
        let survives = self
            .selected
            .as_ref()
            .is_some_and(|id| categories.iter().any(|c| c.id() == id));

        let previous = self.selected.take();
        self.selected = if survives {
            previous.clone()
        } else {
            categories.first().map(|c| c.id().clone())
        };
        self.categories = categories;

        Replacement {
            previous_count,
            count: self.categories.len(),
            selection_changed: previous != self.selected,
        }
    }
}

fn warn_on_duplicates(categories: &[Category]) {
    let mut seen = HashSet::new();
    for c in categories {
        if !seen.insert(c.id()) {
            log::warn!(
                "Duplicate category id '{}'; only the first occurrence is selectable",
                c.id()
            );
        }
    }
}
