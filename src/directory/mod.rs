//! External player directory supplying the default pool.
//!
//! The engine never talks to a directory: a supervisor task fetches the
//! pool through this trait and installs it into the shared cache.

pub mod bundled;
#[cfg(feature = "http-directory")]
pub mod http;

use std::error::Error;

use futures::future::BoxFuture;
use thiserror::Error;

use crate::state::pool::PoolEntry;

/// Result alias for directory operations.
pub type DirectoryResult<T> = Result<T, DirectoryError>;

/// Error raised by directory backends regardless of the underlying source.
#[derive(Debug, Error)]
pub enum DirectoryError {
    /// The directory could not be reached or parsed.
    #[error("directory unavailable: {message}")]
    Unavailable {
        /// What failed.
        message: String,
        /// Backend-specific cause.
        #[source]
        source: Box<dyn Error + Send + Sync>,
    },
}

impl DirectoryError {
    /// Construct an unavailable error from any backend failure.
    pub fn unavailable(message: String, source: impl Error + Send + Sync + 'static) -> Self {
        DirectoryError::Unavailable {
            message,
            source: Box::new(source),
        }
    }
}

/// Abstraction over the source of the default player pool.
pub trait PlayerDirectory: Send + Sync {
    /// Fetch the full default pool in provider order.
    fn fetch_pool(&self) -> BoxFuture<'static, DirectoryResult<Vec<PoolEntry>>>;
    /// Cheap reachability probe used by the health endpoint.
    fn health_check(&self) -> BoxFuture<'static, DirectoryResult<()>>;
}
