//! Engine implementations.

mod memory_engine;

pub use memory_engine::{FilterRecord, MemoryEngine, MemoryEngineStatistics, PropertyValue};
