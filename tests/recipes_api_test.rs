//! End-to-end tests for the recipe routes.
//!
//! Requests go through `Router::dispatch`, the same entry point the server
//! uses, backed by the in-memory store or a store that always fails.

use std::sync::Arc;

use async_trait::async_trait;
use bytes::Bytes;
use http::StatusCode;
use http_body_util::BodyExt;
use recipe_book::recipes::{InMemoryRecipeStore, Recipe, RecipeFields, RecipeStore, StoreResult};
use recipe_book::{routes, AppContext, Router, StoreError};
use serde_json::{json, Value};

fn app() -> Router<AppContext> {
    routes::router(AppContext::new(Arc::new(InMemoryRecipeStore::new())))
}

async fn send(app: &Router<AppContext>, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let body = body.map(|b| Bytes::from(b.to_string())).unwrap_or_default();
    let req = http::Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(body)
        .expect("valid request");
    let res = app.dispatch(req).await;
    let status = res.status();
    let bytes = res.into_body().collect().await.expect("body").to_bytes();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into_owned()))
    };
    (status, value)
}

async fn create(app: &Router<AppContext>, body: Value) -> Value {
    let (status, res) = send(app, "POST", "/recipes", Some(body)).await;
    assert_eq!(status, StatusCode::CREATED);
    res["newRecipe"].clone()
}

async fn seed(app: &Router<AppContext>) -> (Value, Value, Value) {
    let soup = create(app, json!({ "title": "Tomato Soup", "author": "Ana", "difficulty": "easy" })).await;
    let stew = create(app, json!({ "title": "Beef Stew", "author": "Ana", "difficulty": "hard" })).await;
    let cake = create(app, json!({ "title": "Carrot Cake", "author": "Ben", "difficulty": "medium" })).await;
    (soup, stew, cake)
}

#[tokio::test]
async fn create_returns_201_with_persisted_recipe() {
    let app = app();
    let body = json!({
        "title": "Shakshuka",
        "author": "Ana",
        "difficulty": "easy",
        "prepTime": 10,
        "ingredients": ["eggs", "tomatoes"],
        "cuisine": "North African",
    });
    let (status, res) = send(&app, "POST", "/recipes", Some(body.clone())).await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(res["message"], "Recipe added successfully.");

    let mut recipe = res["newRecipe"].clone();
    let id = recipe["_id"].as_str().expect("id is a string").to_owned();
    assert!(!id.is_empty());

    recipe.as_object_mut().unwrap().remove("_id");
    assert_eq!(recipe, body);
}

#[tokio::test]
async fn create_ignores_client_supplied_id() {
    let app = app();
    let recipe = create(&app, json!({ "_id": "mine", "title": "Soup" })).await;
    assert_ne!(recipe["_id"], "mine");
}

#[tokio::test]
async fn create_with_malformed_body_is_400() {
    let app = app();
    let req = http::Request::builder()
        .method("POST")
        .uri("/recipes")
        .body(Bytes::from_static(b"{title: nope"))
        .unwrap();
    let res = app.dispatch(req).await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    let (status, body) = send(&app, "POST", "/recipes", Some(json!(["Soup"]))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({ "error": "Invalid recipe body!" }));
}

#[tokio::test]
async fn create_accepts_any_field_types() {
    let app = app();
    let bodies = [
        json!({ "title": "Cake", "ingredients": [{ "name": "flour", "qty": "200g" }] }),
        json!({ "prepTime": "15 min" }),
        json!({ "prepTime": 12.5 }),
        json!({ "title": 42 }),
        json!({ "instructions": "Mix and bake." }),
    ];

    for body in bodies {
        let (status, res) = send(&app, "POST", "/recipes", Some(body.clone())).await;
        assert_eq!(status, StatusCode::CREATED, "{body}");
        let mut recipe = res["newRecipe"].clone();
        recipe.as_object_mut().unwrap().remove("_id");
        assert_eq!(recipe, body);
    }

    let (status, listed) = send(&app, "GET", "/recipes", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(listed.as_array().unwrap().len(), 5);
}

#[tokio::test]
async fn operator_and_dotted_keys_are_400() {
    let app = app();
    let (soup, _, _) = seed(&app).await;
    let id = soup["_id"].as_str().unwrap();

    for body in [json!({ "$set": { "title": "x" } }), json!({ "nutrition.kcal": 300 })] {
        let (status, res) = send(&app, "POST", "/recipes", Some(body.clone())).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{body}");
        assert_eq!(res, json!({ "error": "Invalid recipe body!" }));

        let (status, _) = send(&app, "POST", &format!("/recipes/{id}"), Some(body)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    let (_, fetched) = send(&app, "GET", "/recipes/Tomato%20Soup", None).await;
    assert_eq!(fetched, soup);
}

#[tokio::test]
async fn list_is_404_when_empty_and_200_otherwise() {
    let app = app();
    let (status, body) = send(&app, "GET", "/recipes", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, json!({ "error": "No recipe found!" }));

    let (soup, stew, cake) = seed(&app).await;
    let (status, body) = send(&app, "GET", "/recipes", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!([soup, stew, cake]));
}

#[tokio::test]
async fn find_by_title() {
    let app = app();
    let (soup, _, _) = seed(&app).await;

    let (status, body) = send(&app, "GET", "/recipes/Tomato%20Soup", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, soup);

    let (status, body) = send(&app, "GET", "/recipes/Pancakes", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, json!({ "error": "Recipe not found!" }));
}

#[tokio::test]
async fn find_by_author_returns_all_and_only_theirs() {
    let app = app();
    let (soup, stew, _) = seed(&app).await;

    let (status, body) = send(&app, "GET", "/recipes/author/Ana", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!([soup, stew]));

    let (status, body) = send(&app, "GET", "/recipes/author/unknown-author", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, json!({ "error": "No recipe found!" }));
}

#[tokio::test]
async fn find_by_difficulty() {
    let app = app();
    let (_, stew, _) = seed(&app).await;

    let (status, body) = send(&app, "GET", "/recipes/difficulty/hard", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!([stew]));

    let (status, _) = send(&app, "GET", "/recipes/difficulty/impossible", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn update_by_id_merges_and_returns_new_state() {
    let app = app();
    let (soup, _, _) = seed(&app).await;
    let id = soup["_id"].as_str().unwrap();

    let (status, body) =
        send(&app, "POST", &format!("/recipes/{id}"), Some(json!({ "difficulty": "hard" }))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Recipe updated successfully.");

    let mut expected = soup.clone();
    expected["difficulty"] = json!("hard");
    assert_eq!(body["updatedRecipe"], expected);

    let (_, fetched) = send(&app, "GET", "/recipes/Tomato%20Soup", None).await;
    assert_eq!(fetched, expected);
}

#[tokio::test]
async fn update_with_null_overwrites_named_and_extra_fields() {
    let app = app();
    let soup = create(&app, json!({ "title": "Soup", "difficulty": "easy", "note": "x" })).await;
    let id = soup["_id"].as_str().unwrap();

    let (status, body) = send(
        &app,
        "POST",
        &format!("/recipes/{id}"),
        Some(json!({ "difficulty": null, "note": null })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body["updatedRecipe"],
        json!({ "_id": id, "title": "Soup", "difficulty": null, "note": null })
    );

    let (status, _) = send(&app, "GET", "/recipes/difficulty/easy", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn update_with_empty_patch_returns_current_state() {
    let app = app();
    let (soup, _, _) = seed(&app).await;
    let id = soup["_id"].as_str().unwrap();

    let (status, body) = send(&app, "POST", &format!("/recipes/{id}"), Some(json!({}))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["updatedRecipe"], soup);
}

#[tokio::test]
async fn update_by_title() {
    let app = app();
    let (_, _, cake) = seed(&app).await;

    let (status, body) = send(
        &app,
        "POST",
        "/recipes/title/Carrot%20Cake",
        Some(json!({ "author": "Cleo", "servings": 8 })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["updatedRecipe"]["_id"], cake["_id"]);
    assert_eq!(body["updatedRecipe"]["author"], "Cleo");
    assert_eq!(body["updatedRecipe"]["servings"], 8);
    assert_eq!(body["updatedRecipe"]["difficulty"], "medium");

    let (status, body) =
        send(&app, "POST", "/recipes/title/Pancakes", Some(json!({ "author": "Cleo" }))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, json!({ "error": "Recipe not found!" }));
}

#[tokio::test]
async fn update_unknown_or_malformed_id() {
    let app = app();
    seed(&app).await;

    let (status, _) = send(
        &app,
        "POST",
        "/recipes/0123456789abcdef01234567",
        Some(json!({ "difficulty": "hard" })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, body) =
        send(&app, "POST", "/recipes/not-an-id", Some(json!({ "difficulty": "hard" }))).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body, json!({ "error": "Failed to update recipe!" }));
}

#[tokio::test]
async fn delete_returns_snapshot_then_404() {
    let app = app();
    let (soup, _, _) = seed(&app).await;
    let id = soup["_id"].as_str().unwrap();

    let (status, body) = send(&app, "DELETE", &format!("/recipes/{id}"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Recipe deleted successfully.");
    assert_eq!(body["deletedRecipe"], soup);

    let (status, _) = send(&app, "GET", "/recipes/Tomato%20Soup", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, body) = send(&app, "DELETE", &format!("/recipes/{id}"), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, json!({ "error": "Recipe not found!" }));
}

#[tokio::test]
async fn responses_carry_cors_headers() {
    let app = app();
    let req = http::Request::builder()
        .method("OPTIONS")
        .uri("/recipes")
        .header("access-control-request-headers", "content-type")
        .body(Bytes::new())
        .unwrap();
    let res = app.dispatch(req).await;
    assert_eq!(res.status(), StatusCode::NO_CONTENT);
    assert_eq!(res.headers()["access-control-allow-origin"], "*");
    assert_eq!(res.headers()["access-control-allow-headers"], "content-type");
}

#[tokio::test]
async fn head_is_answered_by_get_routes_without_a_body() {
    let app = app();
    seed(&app).await;

    for uri in ["/recipes", "/recipes/Tomato%20Soup", "/healthz"] {
        let req = http::Request::builder().method("HEAD").uri(uri).body(Bytes::new()).unwrap();
        let res = app.dispatch(req).await;
        assert_eq!(res.status(), StatusCode::OK, "{uri}");
        assert_eq!(res.headers()["access-control-allow-origin"], "*");
        let body = res.into_body().collect().await.unwrap().to_bytes();
        assert!(body.is_empty(), "{uri}");
    }

    let req = http::Request::builder().method("HEAD").uri("/recipes/Pancakes").body(Bytes::new()).unwrap();
    assert_eq!(app.dispatch(req).await.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn health_probes() {
    let app = app();
    let (status, body) = send(&app, "GET", "/healthz", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, "ok");

    let (status, body) = send(&app, "GET", "/readyz", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, "ready");
}

// ── Store failures ────────────────────────────────────────────────────────────

/// Every operation fails, as if the database were unreachable.
struct BrokenStore;

#[async_trait]
impl RecipeStore for BrokenStore {
    async fn create(&self, _: RecipeFields) -> StoreResult<Recipe> {
        Err(StoreError::MissingId)
    }
    async fn list(&self) -> StoreResult<Vec<Recipe>> {
        Err(StoreError::MissingId)
    }
    async fn find_by_title(&self, _: &str) -> StoreResult<Option<Recipe>> {
        Err(StoreError::MissingId)
    }
    async fn find_by_author(&self, _: &str) -> StoreResult<Vec<Recipe>> {
        Err(StoreError::MissingId)
    }
    async fn find_by_difficulty(&self, _: &str) -> StoreResult<Vec<Recipe>> {
        Err(StoreError::MissingId)
    }
    async fn update_by_id(&self, _: &str, _: RecipeFields) -> StoreResult<Option<Recipe>> {
        Err(StoreError::MissingId)
    }
    async fn update_by_title(&self, _: &str, _: RecipeFields) -> StoreResult<Option<Recipe>> {
        Err(StoreError::MissingId)
    }
    async fn delete_by_id(&self, _: &str) -> StoreResult<Option<Recipe>> {
        Err(StoreError::MissingId)
    }
    async fn ping(&self) -> StoreResult<()> {
        Err(StoreError::MissingId)
    }
    async fn close(&self) {}
}

#[tokio::test]
async fn store_failures_map_to_500_with_route_messages() {
    let app = routes::router(AppContext::new(Arc::new(BrokenStore)));
    let id = "0123456789abcdef01234567";
    let patch = Some(json!({ "difficulty": "hard" }));

    let cases = [
        ("POST", "/recipes".to_owned(), Some(json!({ "title": "Soup" })), "Failed to add recipe!"),
        ("GET", "/recipes".to_owned(), None, "Failed to fetch recipes!"),
        ("GET", "/recipes/Soup".to_owned(), None, "Failed to fetch recipe!"),
        ("GET", "/recipes/author/Ana".to_owned(), None, "Failed to fetch recipes!"),
        ("GET", "/recipes/difficulty/easy".to_owned(), None, "Failed to fetch recipes!"),
        ("POST", format!("/recipes/{id}"), patch.clone(), "Failed to update recipe!"),
        ("POST", "/recipes/title/Soup".to_owned(), patch, "Failed to update recipe!"),
        ("DELETE", format!("/recipes/{id}"), None, "Failed to delete recipe!"),
    ];

    for (method, uri, body, message) in cases {
        let (status, res) = send(&app, method, &uri, body).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR, "{method} {uri}");
        assert_eq!(res, json!({ "error": message }), "{method} {uri}");
    }
}

#[tokio::test]
async fn readiness_fails_when_store_is_down() {
    let app = routes::router(AppContext::new(Arc::new(BrokenStore)));
    let (status, _) = send(&app, "GET", "/readyz", None).await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
}
