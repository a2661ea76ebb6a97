use std::time::{Duration, Instant};

use super::config::RowId;

/// Page position over a collection of `total` rows
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    pub page: u32,
    pub limit: u32,
    pub total: u64,
}

impl Pagination {
    pub fn new(limit: u32) -> Self {
        Self {
            page: 1,
            limit: limit.max(1),
            total: 0,
        }
    }

    /// At least one, so an empty collection still has a page to show
    pub fn page_count(&self) -> u32 {
        let pages = self.total.div_ceil(u64::from(self.limit)).max(1);
        u32::try_from(pages).unwrap_or(u32::MAX)
    }

    pub fn offset(&self) -> u64 {
        u64::from(self.page - 1) * u64::from(self.limit)
    }

    pub fn has_next(&self) -> bool {
        self.page < self.page_count()
    }

    pub fn has_previous(&self) -> bool {
        self.page > 1
    }

    /// Returns whether the page changed
    pub fn next(&mut self) -> bool {
        if !self.has_next() {
            return false;
        }
        self.page += 1;
        true
    }

    pub fn previous(&mut self) -> bool {
        if !self.has_previous() {
            return false;
        }
        self.page -= 1;
        true
    }

    pub fn go_to(&mut self, page: u32) -> bool {
        if page == 0 || page > self.page_count() || page == self.page {
            return false;
        }
        self.page = page;
        true
    }

    /// Changing the page size restarts from the first page
    pub fn set_limit(&mut self, limit: u32) -> bool {
        if limit == 0 || limit == self.limit {
            return false;
        }
        self.limit = limit;
        self.page = 1;
        true
    }

    pub fn reset(&mut self) {
        self.page = 1;
    }
}

/// Debounced search input.
///
/// Keystrokes land in `pending`; they become the applied term once the
/// input has been quiet for the debounce window.
#[derive(Debug, Clone)]
pub struct SearchState {
    applied: String,
    pending: Option<(String, Instant)>,
    debounce: Duration,
}

impl SearchState {
    pub fn new(debounce: Duration) -> Self {
        Self {
            applied: String::new(),
            pending: None,
            debounce,
        }
    }

    /// Search term currently reflected in the rows
    pub fn applied(&self) -> &str {
        &self.applied
    }

    /// What the input box shows
    pub fn text(&self) -> &str {
        match &self.pending {
            Some((text, _)) => text,
            None => &self.applied,
        }
    }

    pub fn input(&mut self, text: impl Into<String>, now: Instant) {
        self.pending = Some((text.into(), now));
    }

    /// When the pending input becomes due, if any
    pub fn deadline(&self) -> Option<Instant> {
        self.pending.as_ref().map(|(_, at)| *at + self.debounce)
    }

    /// Apply the pending input once it is due; `true` when the term changed
    pub fn settle(&mut self, now: Instant) -> bool {
        match self.deadline() {
            Some(deadline) if now >= deadline => self.flush(),
            _ => false,
        }
    }

    /// Apply the pending input immediately
    pub fn flush(&mut self) -> bool {
        let Some((text, _)) = self.pending.take() else {
            return false;
        };
        let text = text.trim().to_string();
        if text == self.applied {
            return false;
        }
        self.applied = text;
        true
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Ascending,
    Descending,
}

impl SortDirection {
    pub fn toggled(self) -> Self {
        match self {
            SortDirection::Ascending => SortDirection::Descending,
            SortDirection::Descending => SortDirection::Ascending,
        }
    }
}

/// Row deletion flow: `Idle -> Confirming -> Deleting -> Idle`.
///
/// A failed delete goes back to `Confirming` with the message kept, so the
/// user can retry or cancel.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum DeleteState {
    #[default]
    Idle,
    Confirming {
        id: RowId,
        error: Option<String>,
    },
    Deleting {
        id: RowId,
    },
}

impl DeleteState {
    pub fn is_idle(&self) -> bool {
        matches!(self, DeleteState::Idle)
    }

    /// Row the flow is about, if any
    pub fn target(&self) -> Option<&RowId> {
        match self {
            DeleteState::Idle => None,
            DeleteState::Confirming { id, .. } | DeleteState::Deleting { id } => Some(id),
        }
    }
}
