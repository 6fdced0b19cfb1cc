//! `highslab` is a binding layer for hierarchical, chunked, multidimensional dataset engines.
//!
//! It turns the raw, status-code based [`engine`] API into typed Rust:
//! - [`property_list`]: property lists of 15 categories, configured with the immutable options of
//!   [`options`] and created lazily in the engine,
//! - [`guess_chunking_size`]: a chunk shape heuristic for datasets of any rank,
//! - [`container`] and [`marshaller`]: flat vectors, nested vectors, [`ndarray`](https://docs.rs/ndarray)
//!   arrays and string vectors converted to and from engine transfer buffers,
//! - [`SliceIo`]: hyperslab selection and single-call reads and writes of a [`Dataset`] or
//!   [`Selection`].
//!
//! Every failure is reported through a typed error: [`PropertyError`], [`CapabilityError`],
//! [`DataSpaceError`], [`TransferError`] or [`DatasetError`], unified by [`Error`].
//! Where the engine reports a failure, its most recent message is appended to the error message.
//!
//! ## Example
#![cfg_attr(feature = "ndarray", doc = "```rust")]
#![cfg_attr(not(feature = "ndarray"), doc = "```rust,ignore")]
//! # use std::sync::Arc;
//! use highslab::engine::{DataSpace, Engine, engines::MemoryEngine};
//! use highslab::options::{Chunking, Deflate, Shuffle};
//! use highslab::property_list::DatasetCreateProps;
//! use highslab::{Dataset, SliceIo};
//!
//! let engine: Arc<dyn Engine> = Arc::new(MemoryEngine::new());
//!
//! // Chunk and compress a 1000x1000 dataset of f64
//! let mut dcpl = DatasetCreateProps::new(&engine);
//! dcpl.add(&Chunking::guess(&[1000, 1000], &[1000, 1000], size_of::<f64>()))?;
//! dcpl.add(&Shuffle)?;
//! dcpl.add(&Deflate::new(6))?;
//! let dataset = Dataset::create_for::<f64>(
//!     &engine,
//!     "temperature",
//!     &DataSpace::new(vec![1000, 1000]),
//!     &dcpl,
//! )?;
//!
//! // Write a 2x3 hyperslab
//! let selection = dataset.select(&[10, 20], &[2, 3])?;
//! selection.write(&vec![vec![1.0f64, 2.0, 3.0], vec![4.0, 5.0, 6.0]])?;
//!
//! // Read it back into an ndarray
//! let mut matrix = ndarray::Array2::<f64>::zeros((0, 0));
//! selection.read(&mut matrix)?;
//! assert_eq!(matrix, ndarray::array![[1.0, 2.0, 3.0], [4.0, 5.0, 6.0]]);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! ## Logging
//! `highslab` logs information and warnings using the [`log`] crate.
//! Failures to release engine objects or engine allocations are logged as warnings, never raised.
//! A logging implementation must be enabled to capture logs.
//! See the [`log`] crate documentation for more details.
//!
//! ## Crate Features
//! #### Default
//!  - `ndarray`: [`ndarray`](https://docs.rs/ndarray) arrays of rank 1 to 6 as matrix containers.
//!
//! #### Non-Default
//!  - `parallel`: the collective option set (`CollectiveMetadataRead`, `CollectiveMetadataWrite`,
//!    `CollectiveMetadata`, `CollectiveIo`) for engines with distributed I/O. Removes `PageBufferSize`.
//!
//! ## Licence
//! `highslab` is licensed under either of
//!  - the Apache License, Version 2.0 <http://www.apache.org/licenses/LICENSE-2.0> or
//!  - the MIT license <http://opensource.org/licenses/MIT>, at your option.
//!
//! Unless you explicitly state otherwise, any contribution intentionally submitted for inclusion in the work by you, as defined in the Apache-2.0 license, shall be dual licensed as above, without any additional terms or conditions.
#![cfg_attr(docsrs, feature(doc_cfg))]
#![warn(clippy::wildcard_enum_match_arm)]

mod chunking;
pub mod container;
mod dataset;
mod error;
mod handle;
pub mod marshaller;
pub mod options;
pub mod property_list;
mod selection;
mod slice_io;

pub use chunking::{
    CHUNK_BASE, CHUNK_MAX, CHUNK_MIN, UNLIMITED_AXIS_EXTENT, guess_chunking_size,
};
pub use dataset::Dataset;
pub use error::{
    CapabilityError, DataSpaceError, DatasetError, Error, PropertyError, TransferError,
    TransferKind,
};
pub use handle::Handle;
pub use highslab_engine as engine;
pub use selection::Selection;
pub use slice_io::SliceIo;
