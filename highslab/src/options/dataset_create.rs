use derive_more::{Deref, From};
use highslab_engine::{AllocTimeKind, Engine, FilterKind, Hid, LayoutKind, PropertyEngine};

use super::{check_filter, check_status};
use crate::{Error, guess_chunking_size, property_list::ConfigOption};

/// The chunk shape of a dataset.
///
/// The rank of the chunk shape is not checked against the dataset, the engine rejects a mismatch when
/// the dataset is created.
#[derive(Clone, Debug, PartialEq, Eq, Deref, From)]
pub struct Chunking(Vec<u64>);

impl Chunking {
    /// Create a new chunk shape.
    #[must_use]
    pub fn new(dims: impl Into<Vec<u64>>) -> Self {
        Self(dims.into())
    }

    /// Guess a chunk shape with [`guess_chunking_size`].
    #[must_use]
    pub fn guess(dims: &[u64], max_dims: &[u64], element_size: usize) -> Self {
        Self(guess_chunking_size(dims, max_dims, element_size))
    }

    /// The chunk shape.
    #[must_use]
    pub fn dimensions(&self) -> &[u64] {
        &self.0
    }
}

impl ConfigOption for Chunking {
    fn apply(&self, engine: &dyn Engine, plist: Hid) -> Result<(), Error> {
        let status = engine.set_chunk(plist, &self.0);
        Ok(check_status(engine, status, "Error setting chunk property")?)
    }
}

/// The deflate compression filter.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Deflate(u32);

impl Deflate {
    /// Create a new deflate filter with compression `level` (0-9).
    #[must_use]
    pub const fn new(level: u32) -> Self {
        Self(level)
    }

    /// The compression level.
    #[must_use]
    pub const fn level(&self) -> u32 {
        self.0
    }
}

impl ConfigOption for Deflate {
    fn apply(&self, engine: &dyn Engine, plist: Hid) -> Result<(), Error> {
        const MESSAGE: &str = "Error setting deflate property";
        check_filter(engine, FilterKind::Deflate, MESSAGE)?;
        Ok(check_status(engine, engine.set_deflate(plist, self.0), MESSAGE)?)
    }
}

/// The szip entropy coding option mask.
pub const SZIP_EC_OPTION_MASK: u32 = 4;

/// The szip nearest neighbour coding option mask.
pub const SZIP_NN_OPTION_MASK: u32 = 32;

/// The maximum number of szip pixels per block.
pub const SZIP_MAX_PIXELS_PER_BLOCK: u32 = 32;

/// The szip compression filter.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Szip {
    options_mask: u32,
    pixels_per_block: u32,
}

impl Default for Szip {
    fn default() -> Self {
        Self::new(SZIP_EC_OPTION_MASK, SZIP_MAX_PIXELS_PER_BLOCK)
    }
}

impl Szip {
    /// Create a new szip filter.
    ///
    /// `pixels_per_block` must be even and at most [`SZIP_MAX_PIXELS_PER_BLOCK`].
    #[must_use]
    pub const fn new(options_mask: u32, pixels_per_block: u32) -> Self {
        Self {
            options_mask,
            pixels_per_block,
        }
    }

    /// The coding method option mask.
    #[must_use]
    pub const fn options_mask(&self) -> u32 {
        self.options_mask
    }

    /// The number of pixels per block.
    #[must_use]
    pub const fn pixels_per_block(&self) -> u32 {
        self.pixels_per_block
    }
}

impl ConfigOption for Szip {
    fn apply(&self, engine: &dyn Engine, plist: Hid) -> Result<(), Error> {
        const MESSAGE: &str = "Error setting szip property";
        check_filter(engine, FilterKind::Szip, MESSAGE)?;
        let status = engine.set_szip(plist, self.options_mask, self.pixels_per_block);
        Ok(check_status(engine, status, MESSAGE)?)
    }
}

/// The byte shuffle filter.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct Shuffle;

impl ConfigOption for Shuffle {
    fn apply(&self, engine: &dyn Engine, plist: Hid) -> Result<(), Error> {
        const MESSAGE: &str = "Error setting shuffle property";
        check_filter(engine, FilterKind::Shuffle, MESSAGE)?;
        Ok(check_status(engine, engine.set_shuffle(plist), MESSAGE)?)
    }
}

/// The fletcher32 checksum filter.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct Fletcher32;

impl ConfigOption for Fletcher32 {
    fn apply(&self, engine: &dyn Engine, plist: Hid) -> Result<(), Error> {
        const MESSAGE: &str = "Error setting fletcher32 property";
        check_filter(engine, FilterKind::Fletcher32, MESSAGE)?;
        Ok(check_status(engine, engine.set_fletcher32(plist), MESSAGE)?)
    }
}

/// The raw data storage layout of a dataset.
///
/// [`Chunking`] implies [`LayoutKind::Chunked`].
#[derive(Copy, Clone, Debug, PartialEq, Eq, From)]
pub struct Layout(LayoutKind);

impl Layout {
    /// Create a new storage layout.
    #[must_use]
    pub const fn new(layout: LayoutKind) -> Self {
        Self(layout)
    }

    /// The storage layout.
    #[must_use]
    pub const fn layout(&self) -> LayoutKind {
        self.0
    }
}

impl ConfigOption for Layout {
    fn apply(&self, engine: &dyn Engine, plist: Hid) -> Result<(), Error> {
        let status = engine.set_layout(plist, self.0);
        Ok(check_status(engine, status, "Error setting layout")?)
    }
}

/// When storage is allocated for a dataset.
#[derive(Copy, Clone, Debug, PartialEq, Eq, From)]
pub struct AllocationTime(AllocTimeKind);

impl AllocationTime {
    /// Create a new allocation time.
    #[must_use]
    pub const fn new(alloc_time: AllocTimeKind) -> Self {
        Self(alloc_time)
    }

    /// The allocation time.
    #[must_use]
    pub const fn alloc_time(&self) -> AllocTimeKind {
        self.0
    }
}

impl ConfigOption for AllocationTime {
    fn apply(&self, engine: &dyn Engine, plist: Hid) -> Result<(), Error> {
        let status = engine.set_alloc_time(plist, self.0);
        Ok(check_status(engine, status, "Error setting allocation time")?)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use highslab_engine::engines::{FilterRecord, MemoryEngine, PropertyValue};
    use highslab_engine::{EngineCapabilities, EngineVersion};

    use super::*;
    use crate::property_list::{DatasetAccessProps, DatasetCreateProps};

    #[test]
    fn chunking_guess() {
        let chunking = Chunking::guess(&[1000, 1000], &[1000, 1000], 8);
        assert_eq!(chunking.dimensions(), &[63, 63]);
        assert_eq!(chunking.len(), 2);
        assert_eq!(Chunking::from(vec![63, 63]), chunking);
    }

    #[test]
    fn dataset_create_filters() {
        let memory = Arc::new(MemoryEngine::new());
        let engine: Arc<dyn Engine> = memory.clone();
        let mut dcpl = DatasetCreateProps::new(&engine);
        dcpl.add(&Chunking::new(vec![16, 16])).unwrap();
        dcpl.add(&Shuffle).unwrap();
        dcpl.add(&Deflate::new(6)).unwrap();
        dcpl.add(&Szip::default()).unwrap();
        dcpl.add(&Fletcher32).unwrap();
        dcpl.add(&AllocationTime::new(AllocTimeKind::Early)).unwrap();
        assert_eq!(
            memory.plist_filters(dcpl.id()).unwrap(),
            vec![
                FilterRecord {
                    filter: FilterKind::Shuffle,
                    client_data: vec![]
                },
                FilterRecord {
                    filter: FilterKind::Deflate,
                    client_data: vec![6]
                },
                FilterRecord {
                    filter: FilterKind::Szip,
                    client_data: vec![SZIP_EC_OPTION_MASK, SZIP_MAX_PIXELS_PER_BLOCK]
                },
                FilterRecord {
                    filter: FilterKind::Fletcher32,
                    client_data: vec![]
                },
            ]
        );
        assert_eq!(
            memory.plist_property(dcpl.id(), "alloc_time"),
            Some(PropertyValue::AllocTime(AllocTimeKind::Early))
        );

        let error = dcpl.add(&Szip::new(SZIP_NN_OPTION_MASK, 7)).unwrap_err();
        assert!(error.to_string().starts_with("Error setting szip property"));
    }

    #[test]
    fn dataset_create_filter_unavailable() {
        let memory = Arc::new(MemoryEngine::with_capabilities(EngineCapabilities::new(
            EngineVersion::new(1, 14, 0),
            false,
            [FilterKind::Shuffle],
        )));
        let engine: Arc<dyn Engine> = memory.clone();
        let mut dcpl = DatasetCreateProps::new(&engine);
        dcpl.add(&Shuffle).unwrap();
        let error = dcpl.add(&Deflate::new(1)).unwrap_err();
        assert_eq!(
            error.to_string(),
            "Error setting deflate property: the deflate filter is not available"
        );
        assert!(dcpl.add(&Fletcher32).is_err());
        assert_eq!(memory.plist_filters(dcpl.id()).unwrap().len(), 1);
    }

    #[test]
    fn dataset_create_layout() {
        let memory = Arc::new(MemoryEngine::new());
        let engine: Arc<dyn Engine> = memory.clone();
        let mut dcpl = DatasetCreateProps::new(&engine);
        dcpl.add(&Layout::new(LayoutKind::Compact)).unwrap();
        assert_eq!(
            memory.plist_property(dcpl.id(), "layout"),
            Some(PropertyValue::Layout(LayoutKind::Compact))
        );
        dcpl.add(&Chunking::new(vec![2])).unwrap();
        assert_eq!(
            memory.plist_property(dcpl.id(), "layout"),
            Some(PropertyValue::Layout(LayoutKind::Chunked))
        );

        let mut dapl = DatasetAccessProps::new(&engine);
        let error = dapl.add(&Chunking::new(vec![2])).unwrap_err();
        assert!(error.to_string().starts_with("Error setting chunk property"));
    }
}
