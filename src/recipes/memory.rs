use async_trait::async_trait;
use mongodb::bson::oid::ObjectId;
use tokio::sync::RwLock;

use super::{parse_object_id, Recipe, RecipeFields, RecipeStore, StoreResult};

/// Process-local store, for running without MongoDB and for tests.
///
/// Keeps insertion order, issues ObjectId-format ids and rejects malformed
/// ids the same way the MongoDB store does. Contents are lost on exit.
#[derive(Debug, Default)]
pub struct InMemoryRecipeStore {
    recipes: RwLock<Vec<Recipe>>,
}

impl InMemoryRecipeStore {
    pub fn new() -> Self {
        Self::default()
    }

    async fn find_where(&self, pred: impl Fn(&RecipeFields) -> bool) -> Vec<Recipe> {
        self.recipes.read().await.iter().filter(|r| pred(&r.fields)).cloned().collect()
    }

    async fn update_where(
        &self,
        pred: impl Fn(&Recipe) -> bool,
        patch: RecipeFields,
    ) -> Option<Recipe> {
        let mut recipes = self.recipes.write().await;
        let recipe = recipes.iter_mut().find(|r| pred(r))?;
        recipe.fields.merge(patch);
        Some(recipe.clone())
    }
}

#[async_trait]
impl RecipeStore for InMemoryRecipeStore {
    async fn create(&self, fields: RecipeFields) -> StoreResult<Recipe> {
        let recipe = Recipe { id: ObjectId::new().to_hex(), fields };
        self.recipes.write().await.push(recipe.clone());
        Ok(recipe)
    }

    async fn list(&self) -> StoreResult<Vec<Recipe>> {
        Ok(self.recipes.read().await.clone())
    }

    async fn find_by_title(&self, title: &str) -> StoreResult<Option<Recipe>> {
        Ok(self.find_where(|f| f.title() == Some(title)).await.into_iter().next())
    }

    async fn find_by_author(&self, author: &str) -> StoreResult<Vec<Recipe>> {
        Ok(self.find_where(|f| f.author() == Some(author)).await)
    }

    async fn find_by_difficulty(&self, difficulty: &str) -> StoreResult<Vec<Recipe>> {
        Ok(self.find_where(|f| f.difficulty() == Some(difficulty)).await)
    }

    async fn update_by_id(&self, id: &str, patch: RecipeFields) -> StoreResult<Option<Recipe>> {
        let id = parse_object_id(id)?.to_hex();
        Ok(self.update_where(|r| r.id == id, patch).await)
    }

    async fn update_by_title(&self, title: &str, patch: RecipeFields) -> StoreResult<Option<Recipe>> {
        Ok(self.update_where(|r| r.fields.title() == Some(title), patch).await)
    }

    async fn delete_by_id(&self, id: &str) -> StoreResult<Option<Recipe>> {
        let id = parse_object_id(id)?.to_hex();
        let mut recipes = self.recipes.write().await;
        Ok(recipes.iter().position(|r| r.id == id).map(|pos| recipes.remove(pos)))
    }

    async fn ping(&self) -> StoreResult<()> {
        Ok(())
    }

    async fn close(&self) {}
}
