//! The recipe document shape.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Key under which the system-assigned identifier is stored and returned.
pub const ID_FIELD: &str = "_id";

/// A persisted recipe: the system-assigned id plus its fields.
///
/// Serializes flat, the way clients see it:
///
/// ```json
/// { "_id": "665f1c…", "title": "Shakshuka", "author": "Ana", "difficulty": "easy" }
/// ```
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct Recipe {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(flatten)]
    pub fields: RecipeFields,
}

/// Recipe fields: any JSON object, persisted as-is.
///
/// Used both for creating a recipe and as the partial patch of a merge
/// update. The conventional keys are `title`, `author`, `difficulty`,
/// `prepTime`, `cookTime`, `ingredients`, `instructions` and `imageUrl`,
/// but none is required and none has a fixed type. The accessors read the
/// ones the store queries on and return `None` when the stored value is not
/// a string.
#[derive(Clone, Debug, Default, Deserialize, PartialEq, Serialize)]
#[serde(transparent)]
pub struct RecipeFields(Map<String, Value>);

impl RecipeFields {
    pub fn title(&self) -> Option<&str> {
        self.text("title")
    }

    pub fn author(&self) -> Option<&str> {
        self.text("author")
    }

    /// Free text; "easy", "medium" and "hard" are a convention.
    pub fn difficulty(&self) -> Option<&str> {
        self.text("difficulty")
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    fn text(&self, key: &str) -> Option<&str> {
        self.0.get(key).and_then(Value::as_str)
    }

    /// Drops keys clients may not set. The database owns `_id`.
    pub fn sanitized(mut self) -> Self {
        self.0.remove(ID_FIELD);
        self
    }

    /// First top-level key MongoDB would read as an operator (`$…`) or a
    /// nested path (`a.b`) instead of a literal field name.
    pub fn reserved_key(&self) -> Option<&str> {
        self.0
            .keys()
            .map(String::as_str)
            .find(|key| key.starts_with('$') || key.contains('.'))
    }

    /// `true` when the patch would change nothing.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Overwrites every key present in `patch`, `null` included; absent keys
    /// are untouched.
    pub fn merge(&mut self, patch: RecipeFields) {
        self.0.extend(patch.0);
    }
}
