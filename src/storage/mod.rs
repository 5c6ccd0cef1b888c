use async_trait::async_trait;

use crate::error::Result;
use crate::models::StoredState;

mod json_file;
mod lock;
pub use json_file::JsonFileStore;
pub use lock::InstanceLock;

#[async_trait]
pub trait StateStore: Send + Sync {
    /// Last persisted state; empty when nothing was ever saved.
    async fn load(&self) -> Result<StoredState>;
    /// Replaces the persisted state as a whole.
    async fn save(&self, state: &StoredState) -> Result<()>;
}
