use std::collections::BTreeSet;

use derive_more::Display;

use crate::FilterKind;

/// An engine library version.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Display)]
#[display("{major}.{minor}.{release}")]
pub struct EngineVersion {
    /// The major version.
    pub major: u32,
    /// The minor version.
    pub minor: u32,
    /// The release number.
    pub release: u32,
}

impl EngineVersion {
    /// Create a new engine version.
    #[must_use]
    pub const fn new(major: u32, minor: u32, release: u32) -> Self {
        Self {
            major,
            minor,
            release,
        }
    }

    /// Returns true if this version is at least `major.minor.release`.
    #[must_use]
    pub fn at_least(&self, major: u32, minor: u32, release: u32) -> bool {
        *self >= Self::new(major, minor, release)
    }
}

/// The capabilities of an engine build.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EngineCapabilities {
    version: EngineVersion,
    parallel: bool,
    filters: BTreeSet<FilterKind>,
}

impl EngineCapabilities {
    /// Create a new set of capabilities.
    #[must_use]
    pub fn new(
        version: EngineVersion,
        parallel: bool,
        filters: impl IntoIterator<Item = FilterKind>,
    ) -> Self {
        Self {
            version,
            parallel,
            filters: filters.into_iter().collect(),
        }
    }

    /// The engine version.
    #[must_use]
    pub const fn version(&self) -> EngineVersion {
        self.version
    }

    /// Returns true if the engine was built with distributed (collective) I/O support.
    #[must_use]
    pub const fn parallel(&self) -> bool {
        self.parallel
    }

    /// Returns true if `filter` is available.
    #[must_use]
    pub fn has_filter(&self, filter: FilterKind) -> bool {
        self.filters.contains(&filter)
    }

    /// The available filters.
    #[must_use]
    pub const fn filters(&self) -> &BTreeSet<FilterKind> {
        &self.filters
    }
}
