//! Process configuration from environment variables.
//!
//! A `.env` file in the working directory is loaded first when present (see
//! [`load_dotenv`]); real environment variables take precedence over it.
//!
//! | Variable | Default |
//! |---|---|
//! | `PORT` | `3000` |
//! | `HOST` | `0.0.0.0` |
//! | `MONGODB_URI` (or `MONGODB`) | required for the `mongodb` backend |
//! | `DATABASE_NAME` | from the connection string, else `recipe_book` |
//! | `RECIPES_COLLECTION` | `recipes` |
//! | `STORAGE_BACKEND` | `mongodb` (or `memory`) |
//! | `RUST_LOG` | `info` |

use std::env;
use std::fmt;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::str::FromStr;

use anyhow::{bail, Context, Result};
use tracing::{debug, warn};

const DEFAULT_PORT: u16 = 3000;
const DEFAULT_HOST: &str = "0.0.0.0";
const DEFAULT_COLLECTION: &str = "recipes";
const DEFAULT_LOG_LEVEL: &str = "info";

/// Where recipes are persisted.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum StorageBackend {
    #[default]
    MongoDb,
    /// Process-local; contents are lost on exit.
    Memory,
}

impl FromStr for StorageBackend {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "mongodb" | "mongo" => Ok(Self::MongoDb),
            "memory" => Ok(Self::Memory),
            other => bail!("unknown storage backend `{other}` (expected `mongodb` or `memory`)"),
        }
    }
}

impl fmt::Display for StorageBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::MongoDb => "mongodb",
            Self::Memory => "memory",
        })
    }
}

/// Loads `.env` from the working directory into the process environment.
///
/// Call before [`Config::from_env`]. The outcome is returned rather than
/// logged, since tracing is configured from the values it loads.
pub fn load_dotenv() -> DotenvOutcome {
    DotenvOutcome(dotenvy::dotenv())
}

/// What [`load_dotenv`] found.
#[derive(Debug)]
pub struct DotenvOutcome(dotenvy::Result<PathBuf>);

impl DotenvOutcome {
    /// Logs the outcome. A missing file is normal and stays silent.
    pub fn log(&self) {
        match &self.0 {
            Ok(path) => debug!(path = %path.display(), "loaded .env"),
            Err(e) if e.not_found() => {}
            Err(e) => warn!("failed to load .env: {e}"),
        }
    }
}

/// Service configuration.
#[derive(Clone, Debug, PartialEq)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub storage: StorageBackend,
    /// MongoDB connection string.
    pub mongodb_uri: Option<String>,
    /// Overrides the database named in the connection string.
    pub database_name: Option<String>,
    pub collection: String,
    /// `tracing` filter directive, e.g. `info,recipe_book=debug`.
    pub rust_log: String,
}

impl Config {
    /// Reads the process environment.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary key lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let port = match var("PORT") {
            Some(raw) => raw.trim().parse().with_context(|| format!("Invalid PORT value `{raw}`"))?,
            None => DEFAULT_PORT,
        };
        let storage = match var("STORAGE_BACKEND") {
            Some(raw) => raw.parse().context("Invalid STORAGE_BACKEND value")?,
            None => StorageBackend::default(),
        };

        let config = Self {
            host: var("HOST").unwrap_or_else(|| DEFAULT_HOST.to_owned()),
            port,
            storage,
            mongodb_uri: var("MONGODB_URI").or_else(|| var("MONGODB")),
            database_name: var("DATABASE_NAME"),
            collection: var("RECIPES_COLLECTION").unwrap_or_else(|| DEFAULT_COLLECTION.to_owned()),
            rust_log: var("RUST_LOG").unwrap_or_else(|| DEFAULT_LOG_LEVEL.to_owned()),
        };
        config.validate()?;
        Ok(config)
    }

    /// Listening address from `host` and `port`.
    pub fn socket_addr(&self) -> Result<SocketAddr> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .with_context(|| format!("Invalid server address `{}:{}`", self.host, self.port))
    }

    /// Connection string with the password replaced by `***`, for logging.
    pub fn mongodb_uri_masked(&self) -> Option<String> {
        let uri = self.mongodb_uri.as_deref()?;
        let masked = uri.find('@').and_then(|at| {
            let colon = uri[..at].rfind(':')?;
            // `mongodb://host:port` has no credentials; its colon is the scheme's.
            if uri[..colon].ends_with("mongodb") || uri[..colon].ends_with("mongodb+srv") {
                return None;
            }
            let mut masked = uri.to_owned();
            masked.replace_range(colon + 1..at, "***");
            Some(masked)
        });
        Some(masked.unwrap_or_else(|| uri.to_owned()))
    }

    fn validate(&self) -> Result<()> {
        if self.port == 0 {
            bail!("PORT must be greater than 0");
        }
        if self.collection.trim().is_empty() {
            bail!("RECIPES_COLLECTION must not be empty");
        }
        if self.storage == StorageBackend::MongoDb && self.mongodb_uri.is_none() {
            bail!("MONGODB_URI must be set when STORAGE_BACKEND is `mongodb`");
        }
        Ok(())
    }
}
