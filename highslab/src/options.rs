//! Configuration options.
//!
//! Every option is an immutable value implementing [`ConfigOption`](crate::property_list::ConfigOption).
//! An option is applied once per [`PropertyList::add`](crate::property_list::PropertyList::add) and is
//! not retained by the property list.
//!
//! | Property list        | Options |
//! |----------------------|---------|
//! | [`FileCreateProps`](crate::property_list::FileCreateProps) | [`FileSpaceStrategy`], [`FileSpacePageSize`] |
//! | [`FileAccessProps`](crate::property_list::FileAccessProps) | `PageBufferSize`, `CollectiveMetadataRead`, `CollectiveMetadataWrite`, `CollectiveMetadata` |
//! | [`GroupCreateProps`](crate::property_list::GroupCreateProps) | [`EstimatedLinkInfo`] |
//! | [`DatasetCreateProps`](crate::property_list::DatasetCreateProps) | [`Chunking`], [`Deflate`], [`Szip`], [`Shuffle`], [`Fletcher32`], [`Layout`], [`AllocationTime`] |
//! | [`DatasetAccessProps`](crate::property_list::DatasetAccessProps) | [`Caching`], `CollectiveMetadataRead` |
//! | [`LinkCreateProps`](crate::property_list::LinkCreateProps) | [`CreateIntermediateGroup`] |
//! | [`DatasetTransferProps`](crate::property_list::DatasetTransferProps) | `CollectiveIo` |
//!
//! `PageBufferSize` is only available without the `parallel` feature.
//! The collective options are only available with the `parallel` feature.

#[cfg(feature = "parallel")]
mod collective;
mod dataset_access;
mod dataset_create;
mod file;
mod link;

#[cfg(feature = "parallel")]
pub use collective::{
    CollectiveIo, CollectiveMetadata, CollectiveMetadataRead, CollectiveMetadataWrite,
};
pub use dataset_access::Caching;
pub use dataset_create::{
    AllocationTime, Chunking, Deflate, Fletcher32, Layout, SZIP_EC_OPTION_MASK,
    SZIP_MAX_PIXELS_PER_BLOCK, SZIP_NN_OPTION_MASK, Shuffle, Szip,
};
#[cfg(not(feature = "parallel"))]
pub use file::PageBufferSize;
pub use file::{FileSpacePageSize, FileSpaceStrategy};
pub use highslab_engine::{AllocTimeKind, FileSpaceStrategyKind, LayoutKind};
pub use link::{CreateIntermediateGroup, EstimatedLinkInfo};

use highslab_engine::{Engine, FilterKind, PropertyEngine, Status, is_failure};

use crate::{CapabilityError, PropertyError};

/// Translate a failure `status` into a [`PropertyError`] with `message`.
fn check_status(engine: &dyn Engine, status: Status, message: &str) -> Result<(), PropertyError> {
    if is_failure(status) {
        Err(PropertyError::from_engine(engine, message))
    } else {
        Ok(())
    }
}

/// Fail with `message` if `filter` is unavailable.
fn check_filter(engine: &dyn Engine, filter: FilterKind, message: &str) -> Result<(), PropertyError> {
    if engine.filter_avail(filter) {
        Ok(())
    } else {
        Err(PropertyError::new(format!(
            "{message}: the {filter} filter is not available"
        )))
    }
}

/// Fail if the engine predates paged file space management.
fn check_paged_file_space(engine: &dyn Engine, option: &'static str) -> Result<(), CapabilityError> {
    let found = engine.capabilities().version();
    if found.at_least(1, 10, 1) {
        Ok(())
    } else {
        Err(CapabilityError::Version {
            option,
            required: highslab_engine::EngineVersion::new(1, 10, 1),
            found,
        })
    }
}
