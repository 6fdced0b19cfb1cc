//! Dataspaces.
//!
//! A [`DataSpace`] describes the logical shape of a dataset (its extent and maximum extent) and,
//! optionally, a rectangular [`Hyperslab`] selection within it.
//!
//! Engines iterate selections in C (row-major) order with [`DataSpace::contiguous_runs`].

mod contiguous_runs;

pub use contiguous_runs::ContiguousRuns;

use itertools::izip;
use thiserror::Error;

use crate::UNLIMITED;

/// A rectangular selection: an offset and a count along every axis.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Hyperslab {
    offset: Vec<u64>,
    count: Vec<u64>,
}

impl Hyperslab {
    /// The start of the selection.
    #[must_use]
    pub fn offset(&self) -> &[u64] {
        &self.offset
    }

    /// The number of selected elements along each axis.
    #[must_use]
    pub fn count(&self) -> &[u64] {
        &self.count
    }
}

/// A dataspace: an extent, a maximum extent and an optional hyperslab selection.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct DataSpace {
    dims: Vec<u64>,
    max_dims: Vec<u64>,
    selection: Option<Hyperslab>,
}

impl DataSpace {
    /// Create a new fixed-size dataspace with extent `dims`.
    ///
    /// All elements are selected.
    #[must_use]
    pub fn new(dims: Vec<u64>) -> Self {
        Self {
            max_dims: dims.clone(),
            dims,
            selection: None,
        }
    }

    /// Create a new dataspace with extent `dims` and maximum extent `max_dims`.
    ///
    /// A maximum of [`UNLIMITED`] allows an axis to grow without bound.
    ///
    /// # Errors
    /// Returns a [`DataSpaceCreateError`] if the ranks differ or an extent exceeds its maximum.
    pub fn new_with_max_dims(
        dims: Vec<u64>,
        max_dims: Vec<u64>,
    ) -> Result<Self, DataSpaceCreateError> {
        if dims.len() != max_dims.len() {
            return Err(DataSpaceCreateError::IncompatibleRank(
                dims.len(),
                max_dims.len(),
            ));
        }
        for (axis, (&dim, &max_dim)) in std::iter::zip(&dims, &max_dims).enumerate() {
            if max_dim != UNLIMITED && dim > max_dim {
                return Err(DataSpaceCreateError::ExceedsMaximum { axis, dim, max_dim });
            }
        }
        Ok(Self {
            dims,
            max_dims,
            selection: None,
        })
    }

    /// The number of axes.
    #[must_use]
    pub fn rank(&self) -> usize {
        self.dims.len()
    }

    /// The extent of every axis.
    #[must_use]
    pub fn dimensions(&self) -> &[u64] {
        &self.dims
    }

    /// The maximum extent of every axis.
    #[must_use]
    pub fn max_dimensions(&self) -> &[u64] {
        &self.max_dims
    }

    /// Returns true if any axis can grow beyond its current extent.
    #[must_use]
    pub fn is_resizable(&self) -> bool {
        std::iter::zip(&self.dims, &self.max_dims).any(|(dim, max_dim)| max_dim > dim)
    }

    /// The number of elements in the extent.
    ///
    /// Equal to the product of the extent.
    #[must_use]
    pub fn num_elements(&self) -> u64 {
        self.dims.iter().product()
    }

    /// The hyperslab selection, or [`None`] if everything is selected.
    #[must_use]
    pub fn hyperslab(&self) -> Option<&Hyperslab> {
        self.selection.as_ref()
    }

    /// The shape of the selected region.
    #[must_use]
    pub fn selected_shape(&self) -> &[u64] {
        self.selection
            .as_ref()
            .map_or(self.dims.as_slice(), |selection| selection.count.as_slice())
    }

    /// The number of selected elements.
    #[must_use]
    pub fn num_selected(&self) -> u64 {
        self.selected_shape().iter().product()
    }

    /// Replace the selection with the hyperslab starting at `offset` with `count` elements per axis.
    ///
    /// # Errors
    /// Returns a [`HyperslabError`] if the ranks of `offset` or `count` do not match the dataspace,
    /// or if the hyperslab does not lie within the extent.
    /// The existing selection is unchanged on error.
    pub fn select_hyperslab(&mut self, offset: &[u64], count: &[u64]) -> Result<(), HyperslabError> {
        if offset.len() != self.rank() || count.len() != self.rank() {
            return Err(HyperslabError::IncompatibleRank {
                offset: offset.len(),
                count: count.len(),
                rank: self.rank(),
            });
        }
        let in_bounds = izip!(offset, count, &self.dims).all(|(&offset, &count, &dim)| {
            offset.checked_add(count).is_some_and(|end| end <= dim)
        });
        if !in_bounds {
            return Err(HyperslabError::OutOfBounds {
                offset: offset.to_vec(),
                count: count.to_vec(),
                dims: self.dims.clone(),
            });
        }
        self.selection = Some(Hyperslab {
            offset: offset.to_vec(),
            count: count.to_vec(),
        });
        Ok(())
    }

    /// Select every element of the extent.
    pub fn select_all(&mut self) {
        self.selection = None;
    }

    /// Returns the linearised runs of contiguous selected elements in C order.
    ///
    /// See [`ContiguousRuns`].
    #[must_use]
    pub fn contiguous_runs(&self) -> ContiguousRuns {
        match &self.selection {
            Some(selection) => {
                ContiguousRuns::new(&self.dims, &selection.offset, &selection.count)
            }
            None => ContiguousRuns::new(&self.dims, &vec![0; self.rank()], &self.dims),
        }
    }
}

/// A dataspace creation error.
#[derive(Clone, Debug, Error)]
pub enum DataSpaceCreateError {
    /// The extent and maximum extent ranks differ.
    #[error("extent rank {0} does not match maximum extent rank {1}")]
    IncompatibleRank(usize, usize),
    /// An extent exceeds its maximum.
    #[error("extent {dim} on axis {axis} exceeds the maximum extent {max_dim}")]
    ExceedsMaximum {
        /// The axis.
        axis: usize,
        /// The extent.
        dim: u64,
        /// The maximum extent.
        max_dim: u64,
    },
}

/// A hyperslab selection error.
#[derive(Clone, Debug, Error)]
pub enum HyperslabError {
    /// The offset or count rank does not match the dataspace.
    #[error("hyperslab offset rank {offset} and count rank {count} do not match dataspace rank {rank}")]
    IncompatibleRank {
        /// The rank of the offset.
        offset: usize,
        /// The rank of the count.
        count: usize,
        /// The rank of the dataspace.
        rank: usize,
    },
    /// The hyperslab does not lie within the extent.
    #[error("hyperslab with offset {offset:?} and count {count:?} exceeds extent {dims:?}")]
    OutOfBounds {
        /// The offset.
        offset: Vec<u64>,
        /// The count.
        count: Vec<u64>,
        /// The extent.
        dims: Vec<u64>,
    },
}
