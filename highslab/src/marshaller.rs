//! Marshallers.
//!
//! A [`Marshaller`] converts a [`Container`](crate::container::Container) into the transfer buffer
//! of a single engine read or write, and completes a read by moving the buffer contents back into the
//! container.
//!
//! A transfer runs in three steps:
//!  1. [`Marshaller::new`] is constructed for the memory dataspace shape,
//!  2. [`Marshaller::transform_read`] or [`Marshaller::transform_write`] produces the buffer handed to
//!     the engine,
//!  3. after a successful read, [`Marshaller::process_result`] updates the container.
//!
//! A failed transfer never reaches step 3, so a failed read leaves the container as it was before
//! the transfer or as resized by step 2.

mod flat;
#[cfg(feature = "ndarray")]
mod matrix;
mod nested;
mod text;

use std::sync::Arc;

pub use flat::FlatMarshaller;
use highslab_engine::{Engine, TransferBuffer, TransferBufferMut};
#[cfg(feature = "ndarray")]
pub use matrix::MatrixMarshaller;
pub use nested::NestedMarshaller;
pub use text::{EngineAllocations, TextMarshaller};

use crate::TransferError;

/// Converts a container of type `C` to and from a transfer buffer.
pub trait Marshaller<C>: Sized {
    /// Create a marshaller for a memory dataspace of `shape`.
    ///
    /// `shape` has one extent per axis of the container.
    fn new(engine: &Arc<dyn Engine>, shape: &[usize]) -> Self;

    /// Prepare `container` to receive a read and return the buffer the engine fills.
    ///
    /// The container may be resized to `shape`.
    fn transform_read<'a>(&'a mut self, container: &'a mut C) -> TransferBufferMut<'a>;

    /// Return the buffer holding the elements of `container` for a write.
    ///
    /// # Errors
    /// Returns [`TransferError::DimensionMismatch`] if the extents of `container` differ from `shape`.
    fn transform_write<'a>(
        &'a mut self,
        container: &'a C,
    ) -> Result<TransferBuffer<'a>, TransferError>;

    /// Move the result of a successful read into `container`.
    ///
    /// # Errors
    /// Returns a [`TransferError`] if the buffer contents cannot be represented in `container`.
    ///
    /// # Safety
    /// The buffer returned by [`transform_read`](Marshaller::transform_read) must have been filled by a
    /// successful engine read. A text buffer then holds pointers owned by the engine, which are
    /// dereferenced and released.
    unsafe fn process_result(self, container: &mut C) -> Result<(), TransferError>;
}
