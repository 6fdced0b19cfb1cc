use highslab_engine::{Engine, FileSpaceStrategyKind, Hid, PropertyEngine};

use super::{check_paged_file_space, check_status};
use crate::{Error, property_list::ConfigOption};

/// The file space management strategy of a file.
///
/// Requires engine version 1.10.1 or later.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct FileSpaceStrategy {
    strategy: FileSpaceStrategyKind,
    persist: bool,
    threshold: u64,
}

impl FileSpaceStrategy {
    /// Create a new file space strategy.
    ///
    /// `persist` keeps free-space tracking across file closes; free sections smaller than
    /// `threshold` bytes are not tracked.
    #[must_use]
    pub const fn new(strategy: FileSpaceStrategyKind, persist: bool, threshold: u64) -> Self {
        Self {
            strategy,
            persist,
            threshold,
        }
    }

    /// The strategy.
    #[must_use]
    pub const fn strategy(&self) -> FileSpaceStrategyKind {
        self.strategy
    }

    /// Returns true if free space is persisted.
    #[must_use]
    pub const fn persist(&self) -> bool {
        self.persist
    }

    /// The free-space section threshold in bytes.
    #[must_use]
    pub const fn threshold(&self) -> u64 {
        self.threshold
    }
}

impl ConfigOption for FileSpaceStrategy {
    fn apply(&self, engine: &dyn Engine, plist: Hid) -> Result<(), Error> {
        check_paged_file_space(engine, "FileSpaceStrategy")?;
        let status =
            engine.set_file_space_strategy(plist, self.strategy, self.persist, self.threshold);
        Ok(check_status(
            engine,
            status,
            "Error setting file space strategy",
        )?)
    }
}

/// The file space page size of a file using paged aggregation.
///
/// Requires engine version 1.10.1 or later.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct FileSpacePageSize(u64);

impl FileSpacePageSize {
    /// Create a new file space page size of `page_size` bytes.
    #[must_use]
    pub const fn new(page_size: u64) -> Self {
        Self(page_size)
    }

    /// The page size in bytes.
    #[must_use]
    pub const fn page_size(&self) -> u64 {
        self.0
    }
}

impl ConfigOption for FileSpacePageSize {
    fn apply(&self, engine: &dyn Engine, plist: Hid) -> Result<(), Error> {
        check_paged_file_space(engine, "FileSpacePageSize")?;
        let status = engine.set_file_space_page_size(plist, self.0);
        Ok(check_status(
            engine,
            status,
            "Error setting file space page size",
        )?)
    }
}

/// The page buffer of a file access.
///
/// Requires engine version 1.10.1 or later. Unavailable with the `parallel` feature.
#[cfg(not(feature = "parallel"))]
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct PageBufferSize {
    page_buffer_size: usize,
    min_meta_percent: u32,
    min_raw_percent: u32,
}

#[cfg(not(feature = "parallel"))]
impl PageBufferSize {
    /// Create a new page buffer of `page_buffer_size` bytes.
    ///
    /// At least `min_meta_percent` percent of the pages are reserved for metadata and
    /// `min_raw_percent` percent for raw data.
    #[must_use]
    pub const fn new(page_buffer_size: usize, min_meta_percent: u32, min_raw_percent: u32) -> Self {
        Self {
            page_buffer_size,
            min_meta_percent,
            min_raw_percent,
        }
    }

    /// The page buffer size in bytes.
    #[must_use]
    pub const fn page_buffer_size(&self) -> usize {
        self.page_buffer_size
    }

    /// The minimum percentage of metadata pages.
    #[must_use]
    pub const fn min_meta_percent(&self) -> u32 {
        self.min_meta_percent
    }

    /// The minimum percentage of raw data pages.
    #[must_use]
    pub const fn min_raw_percent(&self) -> u32 {
        self.min_raw_percent
    }
}

#[cfg(not(feature = "parallel"))]
impl ConfigOption for PageBufferSize {
    fn apply(&self, engine: &dyn Engine, plist: Hid) -> Result<(), Error> {
        check_paged_file_space(engine, "PageBufferSize")?;
        let status = engine.set_page_buffer_size(
            plist,
            self.page_buffer_size,
            self.min_meta_percent,
            self.min_raw_percent,
        );
        Ok(check_status(engine, status, "Error setting page buffer size")?)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use highslab_engine::engines::{MemoryEngine, PropertyValue};
    use highslab_engine::{EngineCapabilities, EngineVersion};

    use super::*;
    use crate::CapabilityError;
    use crate::property_list::{FileCreateProps, GroupCreateProps};

    #[test]
    fn file_space_strategy() {
        let memory = Arc::new(MemoryEngine::new());
        let engine: Arc<dyn Engine> = memory.clone();
        let mut fcpl = FileCreateProps::new(&engine);
        fcpl.add(&FileSpaceStrategy::new(FileSpaceStrategyKind::Page, true, 1))
            .unwrap();
        fcpl.add(&FileSpacePageSize::new(4096)).unwrap();
        assert_eq!(
            memory.plist_property(fcpl.id(), "file_space_strategy"),
            Some(PropertyValue::FileSpaceStrategy {
                strategy: FileSpaceStrategyKind::Page,
                persist: true,
                threshold: 1
            })
        );
        assert_eq!(
            memory.plist_property(fcpl.id(), "file_space_page_size"),
            Some(PropertyValue::UInt(4096))
        );

        let error = fcpl.add(&FileSpacePageSize::new(100)).unwrap_err();
        assert!(
            error
                .to_string()
                .starts_with("Error setting file space page size")
        );
    }

    #[test]
    fn file_space_strategy_wrong_category() {
        let engine: Arc<dyn Engine> = Arc::new(MemoryEngine::new());
        let mut gcpl = GroupCreateProps::new(&engine);
        let error = gcpl
            .add(&FileSpaceStrategy::new(FileSpaceStrategyKind::Aggr, false, 0))
            .unwrap_err();
        assert!(matches!(error, Error::Property(_)));
        assert!(
            error
                .to_string()
                .starts_with("Error setting file space strategy")
        );
    }

    #[test]
    fn file_space_strategy_version() {
        let engine: Arc<dyn Engine> = Arc::new(MemoryEngine::with_capabilities(
            EngineCapabilities::new(EngineVersion::new(1, 10, 0), false, Vec::new()),
        ));
        let mut fcpl = FileCreateProps::new(&engine);
        let error = fcpl.add(&FileSpacePageSize::new(4096)).unwrap_err();
        assert!(matches!(
            error,
            Error::Capability(CapabilityError::Version {
                option: "FileSpacePageSize",
                ..
            })
        ));
    }

    #[cfg(not(feature = "parallel"))]
    #[test]
    fn page_buffer_size() {
        let memory = Arc::new(MemoryEngine::new());
        let engine: Arc<dyn Engine> = memory.clone();
        let mut fapl = crate::property_list::FileAccessProps::new(&engine);
        fapl.add(&PageBufferSize::new(1 << 20, 10, 20)).unwrap();
        assert_eq!(
            memory.plist_property(fapl.id(), "page_buffer_size"),
            Some(PropertyValue::PageBuffer {
                size: 1 << 20,
                min_meta_percent: 10,
                min_raw_percent: 20
            })
        );
        assert!(fapl.add(&PageBufferSize::new(1 << 20, 60, 60)).is_err());
    }
}
