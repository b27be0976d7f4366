//! Recipe data access.
//!
//! [`RecipeStore`] is the seam between the HTTP routes and the database. Each
//! method is one database call; failures are always propagated as
//! [`StoreError`] and mapped to status codes by the routes.
//!
//! Titles are not unique. `find_by_title` and `update_by_title` act on the
//! first match in the backend's natural order.

mod memory;
mod model;
mod mongo;

use async_trait::async_trait;
use mongodb::bson::oid::ObjectId;

pub use memory::InMemoryRecipeStore;
pub use model::{ID_FIELD, Recipe, RecipeFields};
pub use mongo::MongoRecipeStore;

use crate::error::StoreError;

/// Result alias for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Persistence for recipe documents.
#[async_trait]
pub trait RecipeStore: Send + Sync {
    /// Persists a new recipe and returns it with its generated id.
    async fn create(&self, fields: RecipeFields) -> StoreResult<Recipe>;

    async fn list(&self) -> StoreResult<Vec<Recipe>>;

    async fn find_by_title(&self, title: &str) -> StoreResult<Option<Recipe>>;

    async fn find_by_author(&self, author: &str) -> StoreResult<Vec<Recipe>>;

    async fn find_by_difficulty(&self, difficulty: &str) -> StoreResult<Vec<Recipe>>;

    /// Merges `patch` into the recipe with `id` and returns the updated
    /// document, or `None` if no recipe has that id.
    async fn update_by_id(&self, id: &str, patch: RecipeFields) -> StoreResult<Option<Recipe>>;

    /// Same as [`update_by_id`](RecipeStore::update_by_id), keyed by title.
    async fn update_by_title(&self, title: &str, patch: RecipeFields) -> StoreResult<Option<Recipe>>;

    /// Removes the recipe with `id` and returns its last state.
    async fn delete_by_id(&self, id: &str) -> StoreResult<Option<Recipe>>;

    /// Succeeds when the backend is reachable.
    async fn ping(&self) -> StoreResult<()>;

    /// Releases the backend handle. Called once at shutdown.
    async fn close(&self);
}

/// Parses a 24-character hex ObjectId, the only id format either store issues.
pub(crate) fn parse_object_id(id: &str) -> StoreResult<ObjectId> {
    ObjectId::parse_str(id).map_err(|_| StoreError::InvalidId(id.to_owned()))
}
