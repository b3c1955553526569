//! Node store backends.

pub mod memory;
pub mod node;

pub use memory::MemoryNodeStore;
pub use node::PgNodeStore;
