//! Shared application state: the per-draft rooms, the cached default
//! player pool, and the degraded-mode flag.

pub mod clock;
pub mod engine;
pub mod order;
pub mod pool;
pub mod queue;

use std::sync::Arc;

use dashmap::DashMap;
use indexmap::IndexMap;
use tokio::sync::{Mutex, RwLock, watch};
use uuid::Uuid;

use crate::{config::AppConfig, directory::PlayerDirectory, state::pool::PoolEntry};

pub use self::engine::{DraftEngine, DraftError, DraftStatus};

/// Cheaply cloneable handle to the application state.
pub type SharedState = Arc<AppState>;

/// One draft's concurrency domain.
///
/// The write half of the lock is the mutation gateway: every mutating
/// call for the draft runs inside it, so exactly one caller commits per
/// logical slot. Snapshot readers take the read half briefly and copy
/// what they need.
pub struct DraftRoom {
    engine: RwLock<DraftEngine>,
}

impl DraftRoom {
    /// Wrap a freshly created engine.
    pub fn new(engine: DraftEngine) -> Self {
        Self {
            engine: RwLock::new(engine),
        }
    }

    /// The guarded engine.
    pub fn engine(&self) -> &RwLock<DraftEngine> {
        &self.engine
    }
}

/// Central application state shared across request handlers.
pub struct AppState {
    config: AppConfig,
    drafts: DashMap<Uuid, Arc<DraftRoom>>,
    create_gate: Mutex<()>,
    directory: RwLock<Option<Arc<dyn PlayerDirectory>>>,
    default_pool: RwLock<Arc<IndexMap<String, PoolEntry>>>,
    degraded: watch::Sender<bool>,
}

impl AppState {
    /// Construct the state wrapped in an [`Arc`].
    ///
    /// The application starts in degraded mode until the directory
    /// supervisor installs a default pool.
    pub fn new(config: AppConfig) -> SharedState {
        let (degraded_tx, _rx) = watch::channel(true);
        Arc::new(Self {
            config,
            drafts: DashMap::new(),
            create_gate: Mutex::new(()),
            directory: RwLock::new(None),
            default_pool: RwLock::new(Arc::new(IndexMap::new())),
            degraded: degraded_tx,
        })
    }

    /// Immutable runtime configuration.
    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Look up the room for a draft id.
    pub fn room(&self, id: Uuid) -> Option<Arc<DraftRoom>> {
        self.drafts.get(&id).map(|entry| entry.clone())
    }

    /// Register a new draft room.
    pub fn insert_room(&self, id: Uuid, room: Arc<DraftRoom>) {
        self.drafts.insert(id, room);
    }

    /// Lock serializing draft creation. The one-draft-per-year check and
    /// the room insertion must happen under the same guard.
    pub fn create_gate(&self) -> &Mutex<()> {
        &self.create_gate
    }

    /// All registered rooms, in no particular order.
    pub fn rooms(&self) -> Vec<Arc<DraftRoom>> {
        self.drafts.iter().map(|entry| entry.clone()).collect()
    }

    /// Install the directory implementation used for health pings.
    pub async fn install_directory(&self, directory: Arc<dyn PlayerDirectory>) {
        let mut guard = self.directory.write().await;
        *guard = Some(directory);
    }

    /// Current directory handle, if one is installed.
    pub async fn directory(&self) -> Option<Arc<dyn PlayerDirectory>> {
        self.directory.read().await.clone()
    }

    /// Replace the cached default pool and leave degraded mode.
    pub async fn install_default_pool(&self, entries: Vec<PoolEntry>) {
        let pool: IndexMap<String, PoolEntry> = entries
            .into_iter()
            .map(|entry| (entry.id.clone(), entry))
            .collect();
        {
            let mut guard = self.default_pool.write().await;
            *guard = Arc::new(pool);
        }
        let _ = self.degraded.send(false);
    }

    /// Cached default pool, shared by every draft without a custom pool.
    pub async fn default_pool(&self) -> Arc<IndexMap<String, PoolEntry>> {
        self.default_pool.read().await.clone()
    }

    /// Flag the default directory as unreachable.
    pub fn mark_degraded(&self) {
        let _ = self.degraded.send(true);
    }

    /// Whether the default directory is currently unavailable.
    pub fn is_degraded(&self) -> bool {
        *self.degraded.borrow()
    }

    /// Subscribe to degraded-mode updates.
    pub fn degraded_watcher(&self) -> watch::Receiver<bool> {
        self.degraded.subscribe()
    }
}
