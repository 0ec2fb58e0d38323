mod file;
mod memory;

pub use file::FileStorage;
pub use memory::MemoryStorage;

use anyhow::Result;

/// Durable key-value storage behind the token store. Implementations are
/// injected at construction so embedders can bring their own persistence
/// and tests can run against [`MemoryStorage`].
pub trait Storage: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>>;

    fn set(&self, key: &str, value: &str) -> Result<()>;

    fn remove(&self, key: &str) -> Result<()>;
}
