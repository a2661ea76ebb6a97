use std::cmp::Ordering;
use std::time::Instant;

use serde_json::Value;

use super::client::{PageRequest, TableApi, TableError};
use super::config::{RowId, TableConfig};
use super::state::{DeleteState, Pagination, SearchState, SortDirection};
use crate::core::ResourcePage;

/// Handle for one issued fetch.
///
/// Only the most recently issued ticket may settle; anything older is a
/// superseded request and its response is dropped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchTicket {
    seq: u64,
    pub request: PageRequest,
}

/// Resource-agnostic table state driven by a `TableApi`
pub struct DataTable<A> {
    api: A,
    config: TableConfig,
    pagination: Pagination,
    search: SearchState,
    sort: Option<(String, SortDirection)>,
    delete: DeleteState,
    rows: Vec<Value>,
    loading: bool,
    error: Option<TableError>,
    issued: u64,
    /// Set when a settled page lay past the end and the page was clamped
    refetch_pending: bool,
}

impl<A: TableApi> DataTable<A> {
    pub fn new(api: A, config: TableConfig) -> Self {
        Self {
            pagination: Pagination::new(config.page_size),
            search: SearchState::new(config.search_debounce),
            api,
            config,
            sort: None,
            delete: DeleteState::Idle,
            rows: Vec::new(),
            loading: false,
            error: None,
            issued: 0,
            refetch_pending: false,
        }
    }

    pub fn api(&self) -> &A {
        &self.api
    }

    pub fn config(&self) -> &TableConfig {
        &self.config
    }

    pub fn rows(&self) -> &[Value] {
        &self.rows
    }

    pub fn pagination(&self) -> &Pagination {
        &self.pagination
    }

    pub fn search(&self) -> &SearchState {
        &self.search
    }

    pub fn delete_state(&self) -> &DeleteState {
        &self.delete
    }

    pub fn sort(&self) -> Option<(&str, SortDirection)> {
        self.sort.as_ref().map(|(key, dir)| (key.as_str(), *dir))
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    /// Error of the last settled fetch
    pub fn error(&self) -> Option<&TableError> {
        self.error.as_ref()
    }

    /// The last settled page lay past the end and the page was moved back
    pub fn needs_refetch(&self) -> bool {
        self.refetch_pending
    }

    /// Rendered cells of one row, in column order
    pub fn cells(&self, row: &Value) -> Vec<String> {
        self.config.columns.iter().map(|c| c.render(row)).collect()
    }

    // Fetching

    /// Issue a fetch for the current state, superseding any in flight
    pub fn begin_fetch(&mut self) -> FetchTicket {
        self.issued += 1;
        self.loading = true;
        self.refetch_pending = false;

        let search = Some(self.search.applied())
            .filter(|s| !s.is_empty())
            .map(str::to_string);

        FetchTicket {
            seq: self.issued,
            request: PageRequest {
                page: self.pagination.page,
                limit: self.pagination.limit,
                search,
                params: self.config.fixed_params.clone(),
            },
        }
    }

    /// Apply a fetch outcome; `false` when the ticket was superseded.
    ///
    /// An empty page beyond the reported total (rows removed elsewhere)
    /// moves the table to the last page and flags `needs_refetch`.
    pub fn settle_fetch(
        &mut self,
        ticket: FetchTicket,
        result: Result<ResourcePage<Value>, TableError>,
    ) -> bool {
        if ticket.seq != self.issued {
            tracing::debug!(
                ticket = ticket.seq,
                latest = self.issued,
                "Discarding stale table response"
            );
            return false;
        }

        self.loading = false;
        match result {
            Ok(page) => {
                self.pagination.total = page.total;
                self.rows = page.data;
                self.apply_sort();
                self.error = None;

                let last = self.pagination.page_count();
                if self.rows.is_empty() && self.pagination.page > last {
                    tracing::debug!(page = self.pagination.page, last, "Page past the end, moving back");
                    self.pagination.page = last;
                    self.refetch_pending = true;
                }
            }
            Err(err) => {
                tracing::warn!(endpoint = %self.config.api_endpoint, error = %err, "Table fetch failed");
                self.error = Some(err);
            }
        }
        true
    }

    /// Fetch the current page and apply it, moving back once if it lay past the end
    pub async fn refresh(&mut self) -> bool {
        let applied = self.fetch_current().await;
        if applied && self.refetch_pending {
            return self.fetch_current().await;
        }
        applied
    }

    async fn fetch_current(&mut self) -> bool {
        let ticket = self.begin_fetch();
        let result = self
            .api
            .fetch_page(&self.config.api_endpoint, &ticket.request)
            .await;
        self.settle_fetch(ticket, result)
    }

    // Pagination

    pub async fn next_page(&mut self) -> bool {
        self.pagination.next() && self.refresh().await
    }

    pub async fn previous_page(&mut self) -> bool {
        self.pagination.previous() && self.refresh().await
    }

    pub async fn go_to_page(&mut self, page: u32) -> bool {
        self.pagination.go_to(page) && self.refresh().await
    }

    /// Only sizes from the configured options are accepted
    pub async fn set_page_size(&mut self, limit: u32) -> bool {
        if !self.config.page_size_options.contains(&limit) {
            return false;
        }
        self.pagination.set_limit(limit) && self.refresh().await
    }

    // Search

    /// Record a keystroke; nothing is fetched until the input settles
    pub fn search_input(&mut self, text: impl Into<String>, now: Instant) {
        self.search.input(text, now);
    }

    /// Apply search input that has been quiet for the debounce window
    pub async fn tick(&mut self, now: Instant) -> bool {
        if !self.search.settle(now) {
            return false;
        }
        self.pagination.reset();
        self.refresh().await
    }

    /// Apply search input immediately, e.g. on Enter
    pub async fn flush_search(&mut self) -> bool {
        if !self.search.flush() {
            return false;
        }
        self.pagination.reset();
        self.refresh().await
    }

    // Sorting over the visible page

    /// Sort by a sortable column; repeated calls flip the direction
    pub fn sort_by(&mut self, key: &str) -> bool {
        if !self.config.column(key).is_some_and(|c| c.sortable) {
            return false;
        }

        let direction = match &self.sort {
            Some((current, dir)) if current == key => dir.toggled(),
            _ => SortDirection::Ascending,
        };
        self.sort = Some((key.to_string(), direction));
        self.apply_sort();
        true
    }

    fn apply_sort(&mut self) {
        let Some((key, direction)) = &self.sort else {
            return;
        };
        self.rows.sort_by(|a, b| {
            let ord = compare_values(a.get(key), b.get(key));
            match direction {
                SortDirection::Ascending => ord,
                SortDirection::Descending => ord.reverse(),
            }
        });
    }

    // Deleting

    /// Ask for confirmation to delete a visible row
    pub fn request_delete(&mut self, id: RowId) -> bool {
        if !self.config.can_delete || !self.delete.is_idle() {
            return false;
        }
        if !self.rows.iter().any(|row| id.matches(row)) {
            return false;
        }
        self.delete = DeleteState::Confirming { id, error: None };
        true
    }

    pub fn cancel_delete(&mut self) -> bool {
        if !matches!(self.delete, DeleteState::Confirming { .. }) {
            return false;
        }
        self.delete = DeleteState::Idle;
        true
    }

    /// Move from `Confirming` to `Deleting`, returning the row to delete
    pub fn confirm_delete(&mut self) -> Option<RowId> {
        let DeleteState::Confirming { id, .. } = &self.delete else {
            return None;
        };
        let id = id.clone();
        self.delete = DeleteState::Deleting { id: id.clone() };
        Some(id)
    }

    /// Apply a delete outcome.
    ///
    /// Success and `NotFound` both mean the row is gone. Returns `true` when
    /// the visible page needs to be fetched again.
    pub fn settle_delete(&mut self, result: Result<(), TableError>) -> bool {
        let DeleteState::Deleting { id } = std::mem::take(&mut self.delete) else {
            return false;
        };

        match result {
            Ok(()) | Err(TableError::NotFound(_)) => {
                let before = self.rows.len();
                self.rows.retain(|row| !id.matches(row));
                if self.rows.len() < before {
                    self.pagination.total = self.pagination.total.saturating_sub(1);
                }
                tracing::debug!(%id, total = self.pagination.total, "Row removed from table");

                if self.rows.is_empty() && self.pagination.page > 1 {
                    self.pagination.page = self.pagination.page_count().min(self.pagination.page - 1);
                    return true;
                }
                let shown = self.pagination.offset() + self.rows.len() as u64;
                self.rows.len() < self.pagination.limit as usize && shown < self.pagination.total
            }
            Err(err) => {
                tracing::warn!(%id, error = %err, "Delete failed");
                self.delete = DeleteState::Confirming {
                    id,
                    error: Some(err.to_string()),
                };
                false
            }
        }
    }

    /// Confirm the pending delete, issue it, and re-fetch when needed
    pub async fn delete_confirmed(&mut self) -> bool {
        let Some(id) = self.confirm_delete() else {
            return false;
        };

        let result = self.api.delete_row(&self.config.api_endpoint, &id).await;
        let deleted = result.is_ok() || matches!(result, Err(TableError::NotFound(_)));

        if self.settle_delete(result) {
            self.refresh().await;
        }
        deleted
    }
}

/// Numbers numerically, strings case-insensitively, missing values last
fn compare_values(a: Option<&Value>, b: Option<&Value>) -> Ordering {
    let a = a.filter(|v| !v.is_null());
    let b = b.filter(|v| !v.is_null());

    match (a, b) {
        (None, None) => Ordering::Equal,
        (None, Some(_)) => Ordering::Greater,
        (Some(_), None) => Ordering::Less,
        (Some(Value::Number(x)), Some(Value::Number(y))) => {
            let x = x.as_f64().unwrap_or_default();
            let y = y.as_f64().unwrap_or_default();
            x.partial_cmp(&y).unwrap_or(Ordering::Equal)
        }
        (Some(Value::Bool(x)), Some(Value::Bool(y))) => x.cmp(y),
        (Some(Value::String(x)), Some(Value::String(y))) => {
            x.to_lowercase().cmp(&y.to_lowercase())
        }
        (Some(x), Some(y)) => x.to_string().cmp(&y.to_string()),
    }
}
