use crate::domain::ports::StateStore;
use crate::domain::snapshot::Checkpoint;
use crate::error::Result;
use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::RwLock;

/// A thread-safe in-memory checkpoint store.
///
/// Clones share the same slot, so a checkpoint saved through one handle is visible
/// through every other. Nothing survives the process.
#[derive(Default, Clone)]
pub struct InMemoryStateStore {
    checkpoint: Arc<RwLock<Option<Checkpoint>>>,
}

impl InMemoryStateStore {
    /// Creates a new, empty in-memory store.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl StateStore for InMemoryStateStore {
    async fn save(&self, checkpoint: Checkpoint) -> Result<()> {
        let mut slot = self.checkpoint.write().await;
        *slot = Some(checkpoint);
        Ok(())
    }

    async fn load(&self) -> Result<Option<Checkpoint>> {
        let slot = self.checkpoint.read().await;
        Ok(slot.clone())
    }
}
