//! Application context shared by every route handler.

use std::sync::Arc;

use tracing::info;

use crate::config::{Config, StorageBackend};
use crate::error::Error;
use crate::recipes::{InMemoryRecipeStore, MongoRecipeStore, RecipeStore};

/// Handles the routes need, constructed once at startup.
///
/// Cloning is cheap: the store sits behind an `Arc`.
#[derive(Clone)]
pub struct AppContext {
    store: Arc<dyn RecipeStore>,
}

impl AppContext {
    pub fn new(store: Arc<dyn RecipeStore>) -> Self {
        Self { store }
    }

    /// Opens the configured store. For MongoDB this connects and pings, so
    /// a bad connection string fails here rather than on the first request.
    pub async fn connect(config: &Config) -> Result<Self, Error> {
        let store: Arc<dyn RecipeStore> = match config.storage {
            StorageBackend::MongoDb => {
                let uri = config.mongodb_uri.as_deref().unwrap_or_default();
                Arc::new(
                    MongoRecipeStore::connect(uri, config.database_name.as_deref(), &config.collection)
                        .await?,
                )
            }
            StorageBackend::Memory => {
                info!("using in-memory recipe store; data will not persist");
                Arc::new(InMemoryRecipeStore::new())
            }
        };
        Ok(Self::new(store))
    }

    pub fn recipes(&self) -> &dyn RecipeStore {
        self.store.as_ref()
    }

    /// Closes the store. Call after the server has drained.
    pub async fn shutdown(self) {
        self.store.close().await;
    }
}
