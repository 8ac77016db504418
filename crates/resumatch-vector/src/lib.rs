//! Vector index implementations: the durable LanceDB-backed store and an
//! in-memory stand-in with the same trait surface.

pub mod memory;
pub mod schema;
pub mod store;

pub use memory::MemoryIndex;
pub use store::LanceIndex;
