//! Storage provider implementations

mod file;
mod memory;

pub use file::FileStorageProvider;
pub use memory::MemoryStorageProvider;
