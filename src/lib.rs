//! # recipe-book
//!
//! A small JSON API for recipes, stored in MongoDB.
//!
//! ## Routes
//!
//! ```text
//! POST   /recipes                     create
//! GET    /recipes                     list all
//! GET    /recipes/{title}             find by title
//! GET    /recipes/author/{name}       find by author
//! GET    /recipes/difficulty/{level}  find by difficulty
//! POST   /recipes/{id}                merge-update by id
//! POST   /recipes/title/{title}       merge-update by title
//! DELETE /recipes/{id}                delete by id
//! GET    /healthz, /readyz            probes
//! ```
//!
//! ## Layers
//!
//! - [`recipes`]: the document shape and the [`RecipeStore`](recipes::RecipeStore)
//!   seam, with MongoDB and in-memory implementations.
//! - [`routes`]: one handler per route, one store call per handler, uniform
//!   status mapping.
//! - The HTTP plumbing underneath: a radix-tree [`Router`] over `matchit`,
//!   async handlers behind type erasure, and a hyper [`Server`] with graceful
//!   shutdown.
//!
//! ## Quick start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//!
//! use recipe_book::recipes::InMemoryRecipeStore;
//! use recipe_book::{routes, AppContext, Server};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), recipe_book::Error> {
//!     let ctx = AppContext::new(Arc::new(InMemoryRecipeStore::new()));
//!     Server::bind("127.0.0.1:3000".parse().unwrap())
//!         .serve(routes::router(ctx.clone()))
//!         .await?;
//!     ctx.shutdown().await;
//!     Ok(())
//! }
//! ```

mod context;
mod error;
mod handler;
mod method;
mod request;
mod response;
mod router;
mod server;
mod status;

pub mod config;
pub mod health;
pub mod middleware;
pub mod recipes;
pub mod routes;

pub use config::Config;
pub use context::AppContext;
pub use error::{Error, StoreError};
pub use handler::Handler;
pub use method::Method;
pub use request::Request;
pub use response::{IntoResponse, Response, ResponseBuilder};
pub use router::Router;
pub use server::Server;
pub use status::Status;
