use highslab_engine::{Engine, Hid, PropertyEngine};

use super::check_status;
use crate::{Error, property_list::ConfigOption};

/// The estimated number of links in a group and their average name length.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct EstimatedLinkInfo {
    entries: u32,
    name_length: u32,
}

impl EstimatedLinkInfo {
    /// Create a new link estimate of `entries` links with names of `name_length` bytes on average.
    #[must_use]
    pub const fn new(entries: u32, name_length: u32) -> Self {
        Self {
            entries,
            name_length,
        }
    }

    /// The estimated number of links.
    #[must_use]
    pub const fn entries(&self) -> u32 {
        self.entries
    }

    /// The estimated average link name length.
    #[must_use]
    pub const fn name_length(&self) -> u32 {
        self.name_length
    }
}

impl ConfigOption for EstimatedLinkInfo {
    fn apply(&self, engine: &dyn Engine, plist: Hid) -> Result<(), Error> {
        let status = engine.set_est_link_info(plist, self.entries, self.name_length);
        Ok(check_status(engine, status, "Error setting estimated link info")?)
    }
}

/// Whether missing intermediate groups are created with a link.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct CreateIntermediateGroup(bool);

impl Default for CreateIntermediateGroup {
    fn default() -> Self {
        Self(true)
    }
}

impl CreateIntermediateGroup {
    /// Create a new intermediate group creation option.
    #[must_use]
    pub const fn new(create: bool) -> Self {
        Self(create)
    }

    /// Returns true if intermediate groups are created.
    #[must_use]
    pub const fn is_set(&self) -> bool {
        self.0
    }
}

impl ConfigOption for CreateIntermediateGroup {
    fn apply(&self, engine: &dyn Engine, plist: Hid) -> Result<(), Error> {
        let status = engine.set_create_intermediate_group(plist, self.0);
        Ok(check_status(
            engine,
            status,
            "Error setting property for create intermediate groups",
        )?)
    }
}
