//! Error types.
//!
//! Application-level outcomes (404, 400, etc.) are expressed as HTTP
//! [`Response`](crate::Response) values, not as errors. [`StoreError`] covers
//! data-layer failures, which route handlers turn into `500` responses.
//! [`Error`] covers infrastructure failures: binding a port, accepting a
//! connection, or reaching the database at startup.

use thiserror::Error;

/// A failed recipe store operation.
///
/// Every [`RecipeStore`](crate::recipes::RecipeStore) method propagates its
/// failure as one of these; nothing is swallowed at the data layer.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The id is not a well-formed 24-character hex ObjectId.
    #[error("invalid recipe id `{0}`")]
    InvalidId(String),

    /// The database driver reported an error.
    #[error("database error: {0}")]
    Database(#[from] mongodb::error::Error),

    /// Recipe fields could not be converted into a BSON document.
    #[error("document encoding error: {0}")]
    Encode(#[from] mongodb::bson::ser::Error),

    /// A stored BSON document could not be read back as a recipe.
    #[error("document decoding error: {0}")]
    Decode(#[from] mongodb::bson::de::Error),

    /// A stored document has no usable `_id`.
    #[error("stored document has no usable `_id`")]
    MissingId,
}

/// The error type returned by the server and startup code.
#[derive(Debug, Error)]
pub enum Error {
    #[error("io: {0}")]
    Io(#[from] std::io::Error),

    #[error("store: {0}")]
    Store(#[from] StoreError),
}
