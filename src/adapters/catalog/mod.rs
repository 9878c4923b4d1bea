//! Catalog adapters - resource store implementations.

mod fs_resource_store;
mod in_memory_resource_store;

pub use fs_resource_store::FsResourceStore;
pub use in_memory_resource_store::InMemoryResourceStore;
