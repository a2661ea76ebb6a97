//! Generic admin data table.
//!
//! A UI-agnostic view over any collection served in the `ResourcePage` shape.
//! The table owns pagination, debounced search, delete confirmation and
//! fetch ordering; columns are the only resource-specific input.

pub mod client;
pub mod config;
pub mod data_table;
pub mod state;

pub use client::{HttpTableApi, PageRequest, TableApi, TableError};
pub use config::{Column, ColumnKind, RowId, TableConfig};
pub use data_table::{DataTable, FetchTicket};
pub use state::{DeleteState, Pagination, SearchState, SortDirection};
