//! Recipe HTTP routes.
//!
//! Every handler extracts its input, runs one [`RecipeStore`] operation and
//! maps the outcome the same way:
//!
//! | Outcome | Status | Body |
//! |---|---|---|
//! | created | 201 | `{message, newRecipe}` |
//! | one recipe read | 200 | the recipe |
//! | recipes read | 200 | array of recipes |
//! | updated / deleted | 200 | `{message, updatedRecipe}` / `{message, deletedRecipe}` |
//! | nothing matched | 404 | `{error}` |
//! | body not a JSON object, or a `$…`/dotted key | 400 | `{error}` |
//! | store failure | 500 | `{error}`, detail only in the log |
//!
//! [`RecipeStore`]: crate::recipes::RecipeStore

use serde_json::json;
use tracing::{debug, error};

use crate::context::AppContext;
use crate::error::StoreError;
use crate::health;
use crate::recipes::{Recipe, RecipeFields};
use crate::{Request, Response, Router, Status};

const NO_RECIPES: &str = "No recipe found!";
const RECIPE_NOT_FOUND: &str = "Recipe not found!";
const INVALID_BODY: &str = "Invalid recipe body!";

const ADD_FAILED: &str = "Failed to add recipe!";
const FETCH_ALL_FAILED: &str = "Failed to fetch recipes!";
const FETCH_ONE_FAILED: &str = "Failed to fetch recipe!";
const UPDATE_FAILED: &str = "Failed to update recipe!";
const DELETE_FAILED: &str = "Failed to delete recipe!";

/// Registers every route against `ctx`.
///
/// `/recipes/author/…`, `/recipes/difficulty/…` and `/recipes/title/…` are
/// static prefixes, so the radix tree matches them ahead of the
/// single-segment `/recipes/{title}` and `/recipes/{id}` patterns.
pub fn router(ctx: AppContext) -> Router<AppContext> {
    Router::with_state(ctx)
        .get("/healthz", health::liveness)
        .get("/readyz", health::readiness)
        .post("/recipes", create_recipe)
        .get("/recipes", list_recipes)
        .get("/recipes/author/{name}", recipes_by_author)
        .get("/recipes/difficulty/{level}", recipes_by_difficulty)
        .get("/recipes/{title}", recipe_by_title)
        .post("/recipes/title/{title}", update_recipe_by_title)
        .post("/recipes/{id}", update_recipe_by_id)
        .delete("/recipes/{id}", delete_recipe)
}

// POST /recipes
async fn create_recipe(req: Request, ctx: AppContext) -> Response {
    let fields = match recipe_body(&req) {
        Ok(fields) => fields,
        Err(response) => return response,
    };
    match ctx.recipes().create(fields).await {
        Ok(recipe) => Response::builder().status(Status::Created).json(&json!({
            "message": "Recipe added successfully.",
            "newRecipe": recipe,
        })),
        Err(e) => failure(e, ADD_FAILED),
    }
}

// GET /recipes
async fn list_recipes(_req: Request, ctx: AppContext) -> Response {
    many(ctx.recipes().list().await)
}

// GET /recipes/{title}
async fn recipe_by_title(req: Request, ctx: AppContext) -> Response {
    let title = param(&req, "title");
    match ctx.recipes().find_by_title(title).await {
        Ok(Some(recipe)) => Response::json(&recipe),
        Ok(None) => Response::error(Status::NotFound, RECIPE_NOT_FOUND),
        Err(e) => failure(e, FETCH_ONE_FAILED),
    }
}

// GET /recipes/author/{name}
async fn recipes_by_author(req: Request, ctx: AppContext) -> Response {
    many(ctx.recipes().find_by_author(param(&req, "name")).await)
}

// GET /recipes/difficulty/{level}
async fn recipes_by_difficulty(req: Request, ctx: AppContext) -> Response {
    many(ctx.recipes().find_by_difficulty(param(&req, "level")).await)
}

// POST /recipes/{id}
async fn update_recipe_by_id(req: Request, ctx: AppContext) -> Response {
    let patch = match recipe_body(&req) {
        Ok(patch) => patch,
        Err(response) => return response,
    };
    updated(ctx.recipes().update_by_id(param(&req, "id"), patch).await)
}

// POST /recipes/title/{title}
async fn update_recipe_by_title(req: Request, ctx: AppContext) -> Response {
    let patch = match recipe_body(&req) {
        Ok(patch) => patch,
        Err(response) => return response,
    };
    updated(ctx.recipes().update_by_title(param(&req, "title"), patch).await)
}

// DELETE /recipes/{id}
async fn delete_recipe(req: Request, ctx: AppContext) -> Response {
    match ctx.recipes().delete_by_id(param(&req, "id")).await {
        Ok(Some(recipe)) => Response::json(&json!({
            "message": "Recipe deleted successfully.",
            "deletedRecipe": recipe,
        })),
        Ok(None) => Response::error(Status::NotFound, RECIPE_NOT_FOUND),
        Err(e) => failure(e, DELETE_FAILED),
    }
}

// ── Shared mapping ───────────────────────────────────────────────────────────

/// Route parameters are always present once the route matched.
fn param<'a>(req: &'a Request, name: &str) -> &'a str {
    req.param(name).unwrap_or_default()
}

/// The body as a JSON object. Top-level keys MongoDB would not store
/// literally are refused, so every backend keeps the same documents.
fn recipe_body(req: &Request) -> Result<RecipeFields, Response> {
    let fields = req.json::<RecipeFields>().map_err(|e| {
        debug!(path = req.path(), "rejected recipe body: {e}");
        Response::error(Status::BadRequest, INVALID_BODY)
    })?;
    if let Some(key) = fields.reserved_key() {
        debug!(path = req.path(), key, "rejected recipe body: reserved field name");
        return Err(Response::error(Status::BadRequest, INVALID_BODY));
    }
    Ok(fields.sanitized())
}

fn many(result: Result<Vec<Recipe>, StoreError>) -> Response {
    match result {
        Ok(recipes) if recipes.is_empty() => Response::error(Status::NotFound, NO_RECIPES),
        Ok(recipes) => Response::json(&recipes),
        Err(e) => failure(e, FETCH_ALL_FAILED),
    }
}

fn updated(result: Result<Option<Recipe>, StoreError>) -> Response {
    match result {
        Ok(Some(recipe)) => Response::json(&json!({
            "message": "Recipe updated successfully.",
            "updatedRecipe": recipe,
        })),
        Ok(None) => Response::error(Status::NotFound, RECIPE_NOT_FOUND),
        Err(e) => failure(e, UPDATE_FAILED),
    }
}

fn failure(err: StoreError, message: &str) -> Response {
    error!(error = %err, "{message}");
    Response::error(Status::InternalServerError, message)
}
