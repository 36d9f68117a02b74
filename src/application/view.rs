//! Mode selection state
//!
//! The dashboard tracks two pairs of modes: the *selected* sort and filter
//! move with the arrow keys, the *active* ones drive the listing query.
//! Enter promotes the selection to active.

use crate::domain::{FilterMode, SortMode};

/// Keyboard-level action
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputAction {
    SortPrev,
    SortNext,
    FilterPrev,
    FilterNext,
    Confirm,
    Quit,
}

/// What the application must do after an action
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewCommand {
    /// Redraw only
    None,
    /// Active modes changed; refetch with them
    Requery { sort: SortMode, filter: FilterMode },
    Quit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ViewState {
    pub active_sort: SortMode,
    pub selected_sort: SortMode,
    pub active_filter: FilterMode,
    pub selected_filter: FilterMode,
}

impl ViewState {
    pub fn new(sort: SortMode, filter: FilterMode) -> Self {
        Self {
            active_sort: sort,
            selected_sort: sort,
            active_filter: filter,
            selected_filter: filter,
        }
    }

    pub fn apply(&mut self, action: InputAction) -> ViewCommand {
        match action {
            InputAction::SortPrev => self.selected_sort = self.selected_sort.prev(),
            InputAction::SortNext => self.selected_sort = self.selected_sort.next(),
            InputAction::FilterPrev => self.selected_filter = self.selected_filter.prev(),
            InputAction::FilterNext => self.selected_filter = self.selected_filter.next(),
            InputAction::Confirm => return self.confirm(),
            InputAction::Quit => return ViewCommand::Quit,
        }
        ViewCommand::None
    }

    fn confirm(&mut self) -> ViewCommand {
        if self.selected_sort == self.active_sort && self.selected_filter == self.active_filter {
            return ViewCommand::None;
        }
        self.active_sort = self.selected_sort;
        self.active_filter = self.selected_filter;
        ViewCommand::Requery {
            sort: self.active_sort,
            filter: self.active_filter,
        }
    }
}
