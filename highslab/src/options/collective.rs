use highslab_engine::{Engine, Hid, PropertyEngine, TransferMode, is_failure};

use super::check_status;
use crate::{CapabilityError, Error, property_list::ConfigOption};

fn check_parallel(engine: &dyn Engine, operation: &'static str) -> Result<(), CapabilityError> {
    if engine.capabilities().parallel() {
        Ok(())
    } else {
        Err(CapabilityError::Parallel(operation))
    }
}

/// Whether metadata reads are collective.
///
/// Applies to file, group, dataset, datatype and link access property lists.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct CollectiveMetadataRead(bool);

impl CollectiveMetadataRead {
    /// Create a new collective metadata read option.
    #[must_use]
    pub const fn new(collective: bool) -> Self {
        Self(collective)
    }

    /// Returns true if metadata reads are collective.
    #[must_use]
    pub const fn is_collective(&self) -> bool {
        self.0
    }
}

impl ConfigOption for CollectiveMetadataRead {
    fn apply(&self, engine: &dyn Engine, plist: Hid) -> Result<(), Error> {
        check_parallel(engine, "CollectiveMetadataRead")?;
        if is_failure(engine.set_all_coll_metadata_ops(plist, self.0)) {
            return Err(CapabilityError::from_engine(
                engine,
                "Unable to request collective metadata reads",
            )
            .into());
        }
        Ok(())
    }
}

/// Whether metadata writes are collective.
///
/// Applies to file access property lists.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct CollectiveMetadataWrite(bool);

impl CollectiveMetadataWrite {
    /// Create a new collective metadata write option.
    #[must_use]
    pub const fn new(collective: bool) -> Self {
        Self(collective)
    }

    /// Returns true if metadata writes are collective.
    #[must_use]
    pub const fn is_collective(&self) -> bool {
        self.0
    }
}

impl ConfigOption for CollectiveMetadataWrite {
    fn apply(&self, engine: &dyn Engine, plist: Hid) -> Result<(), Error> {
        check_parallel(engine, "CollectiveMetadataWrite")?;
        if is_failure(engine.set_coll_metadata_write(plist, self.0)) {
            return Err(CapabilityError::from_engine(
                engine,
                "Unable to request collective metadata writes",
            )
            .into());
        }
        Ok(())
    }
}

/// Whether metadata reads and writes are collective.
///
/// Applies [`CollectiveMetadataRead`] then [`CollectiveMetadataWrite`].
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct CollectiveMetadata {
    read: CollectiveMetadataRead,
    write: CollectiveMetadataWrite,
}

impl CollectiveMetadata {
    /// Create a new collective metadata option for both reads and writes.
    #[must_use]
    pub const fn new(collective: bool) -> Self {
        Self {
            read: CollectiveMetadataRead::new(collective),
            write: CollectiveMetadataWrite::new(collective),
        }
    }

    /// Returns true if metadata reads are collective.
    #[must_use]
    pub const fn is_collective_read(&self) -> bool {
        self.read.is_collective()
    }

    /// Returns true if metadata writes are collective.
    #[must_use]
    pub const fn is_collective_write(&self) -> bool {
        self.write.is_collective()
    }
}

impl ConfigOption for CollectiveMetadata {
    fn apply(&self, engine: &dyn Engine, plist: Hid) -> Result<(), Error> {
        self.read.apply(engine, plist)?;
        self.write.apply(engine, plist)
    }
}

/// Whether raw data transfers are collective or independent.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct CollectiveIo(bool);

impl CollectiveIo {
    /// Create a new transfer mode option.
    #[must_use]
    pub const fn new(collective: bool) -> Self {
        Self(collective)
    }

    /// The transfer mode.
    #[must_use]
    pub const fn mode(&self) -> TransferMode {
        if self.0 {
            TransferMode::Collective
        } else {
            TransferMode::Independent
        }
    }
}

impl ConfigOption for CollectiveIo {
    fn apply(&self, engine: &dyn Engine, plist: Hid) -> Result<(), Error> {
        let status = engine.set_dxpl_mpio(plist, self.mode());
        Ok(check_status(
            engine,
            status,
            "Error setting collective transfer mode",
        )?)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use highslab_engine::engines::{MemoryEngine, PropertyValue};
    use highslab_engine::{EngineCapabilities, EngineVersion};

    use super::*;
    use crate::property_list::{DatasetTransferProps, FileAccessProps, GroupAccessProps};

    fn parallel_engine() -> Arc<MemoryEngine> {
        Arc::new(MemoryEngine::with_capabilities(EngineCapabilities::new(
            EngineVersion::new(1, 14, 3),
            true,
            Vec::new(),
        )))
    }

    #[test]
    fn collective_metadata() {
        let memory = parallel_engine();
        let engine: Arc<dyn Engine> = memory.clone();
        let mut fapl = FileAccessProps::new(&engine);
        fapl.add(&CollectiveMetadata::new(true)).unwrap();
        assert_eq!(
            memory.plist_property(fapl.id(), "all_coll_metadata_ops"),
            Some(PropertyValue::Bool(true))
        );
        assert_eq!(
            memory.plist_property(fapl.id(), "coll_metadata_write"),
            Some(PropertyValue::Bool(true))
        );

        // writes are only accepted on file access, the read is kept
        let mut gapl = GroupAccessProps::new(&engine);
        let error = gapl.add(&CollectiveMetadata::new(true)).unwrap_err();
        assert!(
            error
                .to_string()
                .starts_with("Unable to request collective metadata writes")
        );
        assert!(matches!(error, Error::Capability(CapabilityError::Engine(_))));
        assert_eq!(
            memory.plist_property(gapl.id(), "all_coll_metadata_ops"),
            Some(PropertyValue::Bool(true))
        );
    }

    #[test]
    fn collective_metadata_requires_parallel() {
        let engine: Arc<dyn Engine> = Arc::new(MemoryEngine::new());
        let mut fapl = FileAccessProps::new(&engine);
        let error = fapl.add(&CollectiveMetadataRead::new(true)).unwrap_err();
        assert!(matches!(
            error,
            Error::Capability(CapabilityError::Parallel("CollectiveMetadataRead"))
        ));
    }

    #[test]
    fn collective_io() {
        let memory = parallel_engine();
        let engine: Arc<dyn Engine> = memory.clone();
        let mut dxpl = DatasetTransferProps::new(&engine);
        dxpl.add(&CollectiveIo::new(true)).unwrap();
        assert_eq!(
            memory.plist_property(dxpl.id(), "dxpl_mpio"),
            Some(PropertyValue::TransferMode(TransferMode::Collective))
        );

        let engine: Arc<dyn Engine> = Arc::new(MemoryEngine::new());
        let mut dxpl = DatasetTransferProps::new(&engine);
        let error = dxpl.add(&CollectiveIo::new(false)).unwrap_err();
        assert!(
            error
                .to_string()
                .starts_with("Error setting collective transfer mode")
        );
    }
}
