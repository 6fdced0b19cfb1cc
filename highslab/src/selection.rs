//! Hyperslab selections.

use highslab_engine::{DataSpace, data_space::Hyperslab};

use crate::{Dataset, slice_io::SliceIo};

/// A hyperslab of a [`Dataset`], created by [`SliceIo::select`].
///
/// Containers transferred through a selection have the shape of the hyperslab count.
#[derive(Debug)]
pub struct Selection<'a> {
    dataset: &'a Dataset,
    mem_space: DataSpace,
    file_space: DataSpace,
}

impl<'a> Selection<'a> {
    pub(crate) fn new(dataset: &'a Dataset, mem_space: DataSpace, file_space: DataSpace) -> Self {
        Self {
            dataset,
            mem_space,
            file_space,
        }
    }

    /// The offset of the hyperslab.
    #[must_use]
    pub fn offset(&self) -> &[u64] {
        self.file_space
            .hyperslab()
            .map(Hyperslab::offset)
            .unwrap_or_default()
    }

    /// The number of elements of the hyperslab per axis.
    #[must_use]
    pub fn count(&self) -> &[u64] {
        self.mem_space.dimensions()
    }
}

impl SliceIo for Selection<'_> {
    fn dataset(&self) -> &Dataset {
        self.dataset
    }

    fn space(&self) -> &DataSpace {
        &self.file_space
    }

    fn mem_space(&self) -> &DataSpace {
        &self.mem_space
    }

    fn transfer_mem_space(&self) -> Option<&DataSpace> {
        Some(&self.mem_space)
    }
}
