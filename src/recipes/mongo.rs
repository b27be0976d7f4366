use async_trait::async_trait;
use futures_util::TryStreamExt;
use mongodb::bson::{self, doc, oid::ObjectId, Bson, Document};
use mongodb::options::{FindOneAndUpdateOptions, ReturnDocument};
use mongodb::{Client, Collection, Database};
use tracing::{debug, info};

use super::{parse_object_id, Recipe, RecipeFields, RecipeStore, StoreResult, ID_FIELD};
use crate::error::StoreError;

/// Database used when neither the configuration nor the connection string
/// names one.
pub const DEFAULT_DATABASE: &str = "recipe_book";

/// Recipes stored as documents in one MongoDB collection.
///
/// The `_id` is a MongoDB ObjectId, exposed to clients as its hex string.
#[derive(Clone, Debug)]
pub struct MongoRecipeStore {
    client: Client,
    database: Database,
    recipes: Collection<Document>,
}

impl MongoRecipeStore {
    /// Connects and verifies the server answers a `ping`.
    ///
    /// The database is `database` if given, else the one named in the
    /// connection string, else [`DEFAULT_DATABASE`].
    pub async fn connect(uri: &str, database: Option<&str>, collection: &str) -> StoreResult<Self> {
        let client = Client::with_uri_str(uri).await?;
        let database = match database {
            Some(name) => client.database(name),
            None => client.default_database().unwrap_or_else(|| client.database(DEFAULT_DATABASE)),
        };
        let store = Self {
            recipes: database.collection(collection),
            database,
            client,
        };
        store.ping().await?;
        info!(
            database = store.database.name(),
            collection = store.recipes.name(),
            "connected to MongoDB"
        );
        Ok(store)
    }

    async fn find_many(&self, filter: Document) -> StoreResult<Vec<Recipe>> {
        let cursor = self.recipes.find(filter, None).await?;
        let docs: Vec<Document> = cursor.try_collect().await?;
        docs.into_iter().map(decode).collect()
    }

    async fn update_one(&self, filter: Document, patch: RecipeFields) -> StoreResult<Option<Recipe>> {
        let Some(update) = set_update(&patch)? else {
            // `$set: {}` is rejected by the server; an empty patch is a read.
            return self.recipes.find_one(filter, None).await?.map(decode).transpose();
        };
        let options = FindOneAndUpdateOptions::builder()
            .return_document(ReturnDocument::After)
            .build();
        self.recipes
            .find_one_and_update(filter, update, options)
            .await?
            .map(decode)
            .transpose()
    }
}

#[async_trait]
impl RecipeStore for MongoRecipeStore {
    async fn create(&self, fields: RecipeFields) -> StoreResult<Recipe> {
        let id = ObjectId::new();
        let mut document = encode(&fields)?;
        document.insert(ID_FIELD, id);
        self.recipes.insert_one(&document, None).await?;
        debug!(id = %id, "recipe inserted");
        Ok(Recipe { id: id.to_hex(), fields })
    }

    async fn list(&self) -> StoreResult<Vec<Recipe>> {
        self.find_many(doc! {}).await
    }

    async fn find_by_title(&self, title: &str) -> StoreResult<Option<Recipe>> {
        self.recipes.find_one(doc! { "title": title }, None).await?.map(decode).transpose()
    }

    async fn find_by_author(&self, author: &str) -> StoreResult<Vec<Recipe>> {
        self.find_many(doc! { "author": author }).await
    }

    async fn find_by_difficulty(&self, difficulty: &str) -> StoreResult<Vec<Recipe>> {
        self.find_many(doc! { "difficulty": difficulty }).await
    }

    async fn update_by_id(&self, id: &str, patch: RecipeFields) -> StoreResult<Option<Recipe>> {
        let id = parse_object_id(id)?;
        self.update_one(doc! { "_id": id }, patch).await
    }

    async fn update_by_title(&self, title: &str, patch: RecipeFields) -> StoreResult<Option<Recipe>> {
        self.update_one(doc! { "title": title }, patch).await
    }

    async fn delete_by_id(&self, id: &str) -> StoreResult<Option<Recipe>> {
        let id = parse_object_id(id)?;
        self.recipes
            .find_one_and_delete(doc! { "_id": id }, None)
            .await?
            .map(decode)
            .transpose()
    }

    async fn ping(&self) -> StoreResult<()> {
        self.database.run_command(doc! { "ping": 1 }, None).await?;
        Ok(())
    }

    async fn close(&self) {
        self.client.clone().shutdown().await;
        info!("MongoDB client shut down");
    }
}

/// Recipe fields as a BSON document, without `_id`.
fn encode(fields: &RecipeFields) -> StoreResult<Document> {
    Ok(bson::to_document(fields)?)
}

/// `{ $set: { … } }` for every field in `patch`, or `None` for an empty patch.
///
/// `$set` reads `a.b` as a nested path and rejects `$`-prefixed names; the
/// routes turn such keys away before they reach the store.
fn set_update(patch: &RecipeFields) -> StoreResult<Option<Document>> {
    let set = encode(patch)?;
    Ok((!set.is_empty()).then(|| doc! { "$set": set }))
}

fn decode(mut document: Document) -> StoreResult<Recipe> {
    let id = match document.remove(ID_FIELD) {
        Some(Bson::ObjectId(oid)) => oid.to_hex(),
        Some(Bson::String(id)) => id,
        _ => return Err(StoreError::MissingId),
    };
    let fields = bson::from_document(document)?;
    Ok(Recipe { id, fields })
}
