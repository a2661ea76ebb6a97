// Tests for the generic data table state machines
//
// The table runs against a scripted TableApi that replays queued responses
// and records every call, so each flow can be checked step by step.

use std::collections::VecDeque;
use std::sync::Mutex;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use ngopi::core::ResourcePage;
use ngopi::table::{
    Column, DataTable, DeleteState, PageRequest, RowId, SortDirection, TableApi, TableConfig,
    TableError,
};
use serde_json::{json, Value};

#[derive(Default)]
struct ScriptedApi {
    pages: Mutex<VecDeque<Result<ResourcePage<Value>, TableError>>>,
    deletes: Mutex<VecDeque<Result<(), TableError>>>,
    fetched: Mutex<Vec<PageRequest>>,
    deleted: Mutex<Vec<RowId>>,
}

impl ScriptedApi {
    fn with_page(self, page: ResourcePage<Value>) -> Self {
        self.pages.lock().unwrap().push_back(Ok(page));
        self
    }

    fn with_delete(self, result: Result<(), TableError>) -> Self {
        self.deletes.lock().unwrap().push_back(result);
        self
    }

    fn fetched(&self) -> Vec<PageRequest> {
        self.fetched.lock().unwrap().clone()
    }

    fn deleted(&self) -> Vec<RowId> {
        self.deleted.lock().unwrap().clone()
    }
}

#[async_trait]
impl TableApi for ScriptedApi {
    async fn fetch_page(
        &self,
        _endpoint: &str,
        request: &PageRequest,
    ) -> Result<ResourcePage<Value>, TableError> {
        self.fetched.lock().unwrap().push(request.clone());
        self.pages
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(TableError::Transport("no scripted page".to_string())))
    }

    async fn delete_row(&self, _endpoint: &str, id: &RowId) -> Result<(), TableError> {
        self.deleted.lock().unwrap().push(id.clone());
        self.deletes
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(TableError::Transport("no scripted delete".to_string())))
    }
}

fn rows(ids: std::ops::RangeInclusive<i64>) -> Vec<Value> {
    ids.map(|id| json!({ "id": id, "name": format!("Cafe {}", id) }))
        .collect()
}

fn page(ids: std::ops::RangeInclusive<i64>, total: u64, page: u32, limit: u32) -> ResourcePage<Value> {
    ResourcePage {
        data: rows(ids),
        total,
        page,
        limit,
    }
}

fn config() -> TableConfig {
    TableConfig::new(
        "/cafes",
        vec![Column::text("id", "ID").sortable(), Column::text("name", "Name").sortable()],
    )
    .search_placeholder("Search cafes...")
    .edit_href("/admin/cafes/{id}")
    .can_delete(true)
}

fn ids(table: &DataTable<ScriptedApi>) -> Vec<i64> {
    table
        .rows()
        .iter()
        .filter_map(|row| row["id"].as_i64())
        .collect()
}

#[tokio::test]
async fn test_delete_confirm_flow_treats_404_as_deleted() {
    let api = ScriptedApi::default()
        .with_page(page(1..=3, 3, 1, 10))
        .with_delete(Err(TableError::NotFound("Cafe with id 2 not found".to_string())));
    let mut table = DataTable::new(api, config());
    assert!(table.refresh().await);

    assert!(table.request_delete(RowId::Number(2)));
    assert_eq!(
        table.delete_state(),
        &DeleteState::Confirming {
            id: RowId::Number(2),
            error: None
        }
    );

    assert_eq!(table.confirm_delete(), Some(RowId::Number(2)));
    assert_eq!(
        table.delete_state(),
        &DeleteState::Deleting {
            id: RowId::Number(2)
        }
    );

    let result = table.api().delete_row("/cafes", &RowId::Number(2)).await;
    let needs_refetch = table.settle_delete(result);

    assert!(!needs_refetch);
    assert_eq!(table.delete_state(), &DeleteState::Idle);
    assert_eq!(ids(&table), vec![1, 3]);
    assert_eq!(table.pagination().total, 2);
    assert_eq!(table.api().deleted(), vec![RowId::Number(2)]);
}

#[tokio::test]
async fn test_failed_delete_keeps_confirmation_with_error() {
    let api = ScriptedApi::default()
        .with_page(page(1..=3, 3, 1, 10))
        .with_delete(Err(TableError::Server {
            status: 500,
            message: "Internal server error".to_string(),
        }));
    let mut table = DataTable::new(api, config());
    table.refresh().await;

    table.request_delete(RowId::Number(1));
    assert!(!table.delete_confirmed().await);

    match table.delete_state() {
        DeleteState::Confirming { id, error } => {
            assert_eq!(id, &RowId::Number(1));
            assert!(error.as_deref().unwrap().contains("Internal server error"));
        }
        other => panic!("expected Confirming, got {:?}", other),
    }
    assert_eq!(ids(&table), vec![1, 2, 3]);
    assert_eq!(table.pagination().total, 3);

    assert!(table.cancel_delete());
    assert!(table.delete_state().is_idle());
}

#[tokio::test]
async fn test_short_page_is_refetched_after_delete() {
    let api = ScriptedApi::default()
        .with_page(page(1..=10, 15, 1, 10))
        .with_delete(Ok(()))
        .with_page(page(2..=11, 14, 1, 10));
    let mut table = DataTable::new(api, config());
    table.refresh().await;

    table.request_delete(RowId::Number(1));
    assert!(table.delete_confirmed().await);

    assert_eq!(table.api().fetched().len(), 2);
    assert_eq!(ids(&table), (2..=11).collect::<Vec<_>>());
    assert_eq!(table.pagination().total, 14);
}

#[tokio::test]
async fn test_emptied_last_page_steps_back() {
    let api = ScriptedApi::default()
        .with_page(page(1..=10, 11, 1, 10))
        .with_page(page(11..=11, 11, 2, 10))
        .with_delete(Ok(()))
        .with_page(page(1..=10, 10, 1, 10));
    let mut table = DataTable::new(api, config());
    table.refresh().await;
    assert!(table.next_page().await);

    table.request_delete(RowId::Number(11));
    table.delete_confirmed().await;

    let fetched = table.api().fetched();
    assert_eq!(fetched.len(), 3);
    assert_eq!(fetched[2].page, 1);
    assert_eq!(table.pagination().page, 1);
    assert_eq!(ids(&table).len(), 10);
}

#[tokio::test]
async fn test_page_past_shrunken_total_moves_to_last_page() {
    let api = ScriptedApi::default()
        .with_page(page(1..=10, 30, 1, 10))
        .with_page(page(21..=30, 30, 3, 10))
        // rows were removed elsewhere; page 3 no longer exists
        .with_page(page(1..=0, 12, 3, 10))
        .with_page(page(11..=12, 12, 2, 10));
    let mut table = DataTable::new(api, config());
    table.refresh().await;
    assert!(table.go_to_page(3).await);

    assert!(table.refresh().await);

    let fetched = table.api().fetched();
    assert_eq!(fetched.len(), 4);
    assert_eq!(fetched[3].page, 2);
    assert_eq!(table.pagination().page, 2);
    assert_eq!(table.pagination().total, 12);
    assert_eq!(ids(&table), vec![11, 12]);
    assert!(!table.needs_refetch());
}

#[tokio::test]
async fn test_settling_empty_page_past_end_flags_refetch() {
    let api = ScriptedApi::default().with_page(page(1..=10, 40, 1, 10));
    let mut table = DataTable::new(api, config());
    table.refresh().await;

    // nothing else is scripted, so this fetch fails but the page still moves
    table.go_to_page(4).await;

    let ticket = table.begin_fetch();
    assert_eq!(ticket.request.page, 4);
    assert!(table.settle_fetch(ticket, Ok(page(1..=0, 25, 4, 10))));

    assert!(table.needs_refetch());
    assert_eq!(table.pagination().page, 3);

    let next = table.begin_fetch();
    assert_eq!(next.request.page, 3);
    assert!(!table.needs_refetch());
}

#[tokio::test]
async fn test_stale_response_is_discarded() {
    let mut table = DataTable::new(ScriptedApi::default(), config());

    let first = table.begin_fetch();
    let second = table.begin_fetch();

    assert!(table.settle_fetch(second, Ok(page(11..=12, 12, 2, 10))));
    assert!(!table.settle_fetch(first, Ok(page(1..=10, 12, 1, 10))));

    assert_eq!(ids(&table), vec![11, 12]);
    assert!(!table.is_loading());
}

#[tokio::test]
async fn test_fetch_error_keeps_previous_rows() {
    let api = ScriptedApi::default().with_page(page(1..=2, 2, 1, 10));
    let mut table = DataTable::new(api, config());
    table.refresh().await;

    // queue is empty now, so the next fetch fails
    table.refresh().await;

    assert_eq!(ids(&table), vec![1, 2]);
    assert!(matches!(table.error(), Some(TableError::Transport(_))));
}

#[tokio::test]
async fn test_debounced_search_resets_to_first_page() {
    let api = ScriptedApi::default()
        .with_page(page(1..=10, 30, 1, 10))
        .with_page(page(11..=20, 30, 2, 10))
        .with_page(page(3..=3, 1, 1, 10));
    let mut table = DataTable::new(api, config());
    table.refresh().await;
    table.next_page().await;

    let start = Instant::now();
    table.search_input("kop", start);
    table.search_input("kopi", start + Duration::from_millis(100));

    assert!(!table.tick(start + Duration::from_millis(300)).await);
    assert!(table.tick(start + Duration::from_millis(400)).await);

    let last = table.api().fetched().pop().unwrap();
    assert_eq!(last.page, 1);
    assert_eq!(last.search.as_deref(), Some("kopi"));
    assert_eq!(table.pagination().total, 1);
}

#[tokio::test]
async fn test_page_size_change() {
    let api = ScriptedApi::default()
        .with_page(page(1..=10, 60, 1, 10))
        .with_page(page(1..=25, 60, 1, 25));
    let mut table = DataTable::new(api, config());
    table.refresh().await;

    assert!(!table.set_page_size(30).await);
    assert!(table.set_page_size(25).await);

    let last = table.api().fetched().pop().unwrap();
    assert_eq!((last.page, last.limit), (1, 25));
    assert_eq!(table.pagination().page_count(), 3);
}

#[tokio::test]
async fn test_fixed_params_are_sent() {
    let api = ScriptedApi::default().with_page(page(1..=1, 1, 1, 10));
    let mut table = DataTable::new(api, config().fixed_param("cafeId", "4"));
    table.refresh().await;

    let request = &table.api().fetched()[0];
    assert_eq!(request.params, vec![("cafeId".to_string(), "4".to_string())]);
    assert_eq!(request.search, None);
}

#[tokio::test]
async fn test_delete_requires_permission_and_visible_row() {
    let api = ScriptedApi::default().with_page(page(1..=3, 3, 1, 10));
    let mut table = DataTable::new(api, config().can_delete(false));
    table.refresh().await;
    assert!(!table.request_delete(RowId::Number(1)));

    let api = ScriptedApi::default().with_page(page(1..=3, 3, 1, 10));
    let mut table = DataTable::new(api, config());
    table.refresh().await;
    assert!(!table.request_delete(RowId::Number(99)));
    assert!(table.request_delete(RowId::Number(3)));
    assert!(!table.request_delete(RowId::Number(1)));
}

#[tokio::test]
async fn test_sort_visible_rows() {
    let api = ScriptedApi::default().with_page(ResourcePage {
        data: vec![
            json!({ "id": 1, "name": "Tanamera" }),
            json!({ "id": 2, "name": "anomali" }),
            json!({ "id": 3, "name": "Kopi Tuku" }),
        ],
        total: 3,
        page: 1,
        limit: 10,
    });
    let mut table = DataTable::new(api, config());
    table.refresh().await;

    assert!(table.sort_by("name"));
    assert_eq!(ids(&table), vec![2, 3, 1]);
    assert!(table.sort_by("name"));
    assert_eq!(table.sort(), Some(("name", SortDirection::Descending)));
    assert_eq!(ids(&table), vec![1, 3, 2]);
    assert!(!table.sort_by("createdAt"));
}

#[tokio::test]
async fn test_cells_and_edit_link() {
    let api = ScriptedApi::default().with_page(page(7..=7, 1, 1, 10));
    let mut table = DataTable::new(api, config());
    table.refresh().await;

    let row = &table.rows()[0];
    assert_eq!(table.cells(row), vec!["7", "Cafe 7"]);
    assert_eq!(table.config().edit_link(row).as_deref(), Some("/admin/cafes/7"));
}
