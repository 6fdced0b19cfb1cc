//! Errors.

use derive_more::Display;
use highslab_engine::{Engine, EngineVersion, HyperslabError};
use thiserror::Error;

/// Append the most recent engine failure message to `message`.
fn with_engine_message(engine: &dyn Engine, message: &str) -> String {
    match engine.last_error_message() {
        Some(detail) => format!("{message}: {detail}"),
        None => message.to_string(),
    }
}

/// A property list configuration error.
///
/// Raised when a property list cannot be realized or when an option cannot be applied to it.
#[derive(Clone, Debug, Error)]
#[error("{message}")]
pub struct PropertyError {
    message: String,
}

impl PropertyError {
    /// Create a new property error.
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    /// Create a new property error carrying the most recent failure message of `engine`.
    #[must_use]
    pub fn from_engine(engine: &dyn Engine, message: &str) -> Self {
        Self::new(with_engine_message(engine, message))
    }

    /// The error message.
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }
}

/// A capability error.
///
/// Raised when an option requires something the engine does not provide.
#[derive(Clone, Debug, Error)]
#[non_exhaustive]
pub enum CapabilityError {
    /// The engine is older than required.
    #[error("{option} requires engine version {required} or later, found {found}")]
    Version {
        /// The option.
        option: &'static str,
        /// The minimum engine version.
        required: EngineVersion,
        /// The engine version.
        found: EngineVersion,
    },
    /// The engine was built without parallel support.
    #[error("{0} requires an engine with parallel support")]
    Parallel(&'static str),
    /// The engine rejected a capability request.
    #[error("{0}")]
    Engine(String),
}

impl CapabilityError {
    /// Create a new capability error carrying the most recent failure message of `engine`.
    #[must_use]
    pub fn from_engine(engine: &dyn Engine, message: &str) -> Self {
        Self::Engine(with_engine_message(engine, message))
    }
}

/// The direction of a transfer.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Display)]
pub enum TransferKind {
    /// From the dataset into a container.
    #[display("read")]
    Read,
    /// From a container into the dataset.
    #[display("write")]
    Write,
}

/// A dataspace or selection error.
#[derive(Clone, Debug, Error)]
#[non_exhaustive]
pub enum DataSpaceError {
    /// The rank of a container does not match the rank of the memory dataspace.
    #[error("Impossible to {operation} a container of rank {container} with a dataspace of rank {space}")]
    RankMismatch {
        /// The transfer direction.
        operation: TransferKind,
        /// The rank of the container.
        container: usize,
        /// The rank of the memory dataspace.
        space: usize,
    },
    /// The offset or count of a selection does not match the dataset rank.
    #[error(
        "Impossible to select a hyperslab with offset rank {offset} and count rank {count} in a dataset of rank {rank}"
    )]
    SelectionRank {
        /// The rank of the offset.
        offset: usize,
        /// The rank of the count.
        count: usize,
        /// The rank of the dataset.
        rank: usize,
    },
    /// The hyperslab does not lie within the dataset extent.
    #[error("Unable to select hyperslab: {0}")]
    HyperslabOutOfBounds(HyperslabError),
    /// The dataspace could not be created.
    #[error(transparent)]
    Create(#[from] highslab_engine::DataSpaceCreateError),
}

/// A transfer error.
#[derive(Clone, Debug, Error)]
#[non_exhaustive]
pub enum TransferError {
    /// A container level does not have the extent of its axis.
    #[error("Mismatch between container size ({actual}) and dataset size ({expected}) on axis {axis}")]
    DimensionMismatch {
        /// The axis.
        axis: usize,
        /// The extent of the axis.
        expected: usize,
        /// The length of the container level.
        actual: usize,
    },
    /// A memory extent does not fit in the address space.
    #[error("extent {0:?} is not addressable in memory")]
    Unaddressable(Vec<u64>),
    /// A string returned by the engine is not valid UTF-8.
    #[error("string {index} returned by the engine is not valid UTF-8")]
    InvalidUtf8 {
        /// The element index.
        index: usize,
    },
    /// The engine failed the transfer.
    #[error("{0}")]
    Engine(String),
}

impl TransferError {
    /// Create a new engine transfer error carrying the most recent failure message of `engine`.
    #[must_use]
    pub fn from_engine(engine: &dyn Engine, message: &str) -> Self {
        Self::Engine(with_engine_message(engine, message))
    }
}

/// A dataset creation or open error.
#[derive(Clone, Debug, Error)]
#[error("{message}")]
pub struct DatasetError {
    message: String,
}

impl DatasetError {
    /// Create a new dataset error.
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    /// Create a new dataset error carrying the most recent failure message of `engine`.
    #[must_use]
    pub fn from_engine(engine: &dyn Engine, message: &str) -> Self {
        Self::new(with_engine_message(engine, message))
    }
}

/// A `highslab` error.
#[derive(Clone, Debug, Error)]
#[non_exhaustive]
pub enum Error {
    /// A property list configuration error.
    #[error(transparent)]
    Property(#[from] PropertyError),
    /// A capability error.
    #[error(transparent)]
    Capability(#[from] CapabilityError),
    /// A dataspace or selection error.
    #[error(transparent)]
    DataSpace(#[from] DataSpaceError),
    /// A transfer error.
    #[error(transparent)]
    Transfer(#[from] TransferError),
    /// A dataset error.
    #[error(transparent)]
    Dataset(#[from] DatasetError),
}

#[cfg(test)]
mod tests {
    use highslab_engine::engines::MemoryEngine;
    use highslab_engine::{PropertyEngine, PropertyListClass};

    use super::*;

    #[test]
    fn error_engine_message() {
        let engine = MemoryEngine::new();
        let error = PropertyError::from_engine(&engine, "Error setting chunk property");
        assert_eq!(error.message(), "Error setting chunk property");

        engine.disable_class(PropertyListClass::LinkAccess);
        assert!(engine.plist_class_id(PropertyListClass::LinkAccess) < 0);
        let error = PropertyError::from_engine(&engine, "Unsupported property list type");
        assert_eq!(
            error.to_string(),
            "Unsupported property list type: the link access property list class is unsupported"
        );
    }

    #[test]
    fn error_display() {
        let error: Error = TransferError::DimensionMismatch {
            axis: 1,
            expected: 3,
            actual: 2,
        }
        .into();
        assert_eq!(
            error.to_string(),
            "Mismatch between container size (2) and dataset size (3) on axis 1"
        );
        let error = DataSpaceError::RankMismatch {
            operation: TransferKind::Read,
            container: 1,
            space: 2,
        };
        assert_eq!(
            error.to_string(),
            "Impossible to read a container of rank 1 with a dataspace of rank 2"
        );
    }
}
