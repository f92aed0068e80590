use std::sync::Arc;

use storage::Store;
use tokio::sync::Mutex;

#[derive(Clone)]
pub struct AppState {
    pub store: Store,
    /// Held for the whole read-modify-write of a game submission, so two
    /// submissions never interleave on the shared leaderboard key.
    pub write_gate: Arc<Mutex<()>>,
}

impl AppState {
    pub fn new(store: Store) -> Self {
        Self {
            store,
            write_gate: Arc::new(Mutex::new(())),
        }
    }
}
