use highslab_engine::{Engine, Hid, PropertyEngine};

use super::check_status;
use crate::{Error, property_list::ConfigOption};

/// The raw data chunk cache of a dataset.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Caching {
    num_slots: usize,
    cache_size: usize,
    preemption: f64,
}

impl Caching {
    /// The default preemption policy weight.
    pub const DEFAULT_PREEMPTION: f64 = 0.75;

    /// Create a new chunk cache with `num_slots` hash table slots holding up to `cache_size` bytes.
    ///
    /// `preemption` (`w0`) weighs how eagerly fully read or written chunks are evicted, from 0 (least
    /// recently used) to 1 (fully read or written chunks first).
    #[must_use]
    pub const fn new(num_slots: usize, cache_size: usize, preemption: f64) -> Self {
        Self {
            num_slots,
            cache_size,
            preemption,
        }
    }

    /// Create a new chunk cache with the [default preemption](Self::DEFAULT_PREEMPTION).
    #[must_use]
    pub const fn with_default_preemption(num_slots: usize, cache_size: usize) -> Self {
        Self::new(num_slots, cache_size, Self::DEFAULT_PREEMPTION)
    }

    /// The number of hash table slots.
    #[must_use]
    pub const fn num_slots(&self) -> usize {
        self.num_slots
    }

    /// The cache size in bytes.
    #[must_use]
    pub const fn cache_size(&self) -> usize {
        self.cache_size
    }

    /// The preemption policy weight.
    #[must_use]
    pub const fn preemption(&self) -> f64 {
        self.preemption
    }
}

impl ConfigOption for Caching {
    fn apply(&self, engine: &dyn Engine, plist: Hid) -> Result<(), Error> {
        let status =
            engine.set_chunk_cache(plist, self.num_slots, self.cache_size, self.preemption);
        Ok(check_status(
            engine,
            status,
            "Error setting dataset cache parameters",
        )?)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use highslab_engine::engines::{MemoryEngine, PropertyValue};

    use super::*;
    use crate::property_list::DatasetAccessProps;

    #[test]
    fn caching() {
        let memory = Arc::new(MemoryEngine::new());
        let engine: Arc<dyn Engine> = memory.clone();
        let mut dapl = DatasetAccessProps::new(&engine);
        dapl.add(&Caching::with_default_preemption(521, 1 << 20))
            .unwrap();
        assert_eq!(
            memory.plist_property(dapl.id(), "chunk_cache"),
            Some(PropertyValue::ChunkCache {
                slots: 521,
                bytes: 1 << 20,
                preemption: 0.75
            })
        );
        let error = dapl.add(&Caching::new(521, 1 << 20, 1.5)).unwrap_err();
        assert!(
            error
                .to_string()
                .starts_with("Error setting dataset cache parameters")
        );
    }
}
