use async_trait::async_trait;

use crate::core::query::{ResourcePage, ResourceQuery};
use crate::core::traits::resource::Resource;
use crate::core::Result;

/// Persistence operations behind every resource.
///
/// Implementations own all storage interaction; handlers only see this trait.
#[async_trait]
pub trait ResourceRepository<R: Resource>: Send + Sync {
    /// Page of records matching the query (a one-record page when `query.id` is set)
    async fn find(&self, query: &ResourceQuery<R::Filter>) -> Result<ResourcePage<R::Record>>;

    /// Insert a record, failing with `Conflict` on uniqueness violations
    async fn create(&self, payload: R::Create) -> Result<R::Record>;

    /// Apply a partial update, failing with `NotFound` when `id` has no row
    async fn update(&self, id: i64, payload: R::Update) -> Result<R::Record>;

    /// Delete by id, failing with `NotFound` when `id` has no row
    async fn delete(&self, id: i64) -> Result<()>;
}
