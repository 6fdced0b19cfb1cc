//! The storage engine API for the [`highslab`](https://docs.rs/highslab/latest/highslab/index.html) crate.
//!
//! A storage engine owns the on-disk (or in-memory) representation of hierarchical, chunked datasets.
//! `highslab` never touches that representation directly: it talks to an engine through the raw,
//! status-code based [`Engine`] traits defined here, exactly like a binding to a native library would.
//!
//! This crate provides:
//!  - the raw identifier and status vocabulary ([`Hid`], [`Status`], [`PLIST_DEFAULT`], [`UNLIMITED`]),
//!  - the [`Engine`] traits and the enumerations their setters accept,
//!  - the [`DataSpace`] shape descriptor with rectangular hyperslab selection,
//!  - the [`TransferBuffer`] and [`TransferBufferMut`] views handed to dataset transfers,
//!  - [`MemoryEngine`](engines::MemoryEngine), a complete in-memory engine with a tracked allocator.
//!
//! ## Licence
//! `highslab_engine` is licensed under either of
//! - the Apache License, Version 2.0 <http://www.apache.org/licenses/LICENSE-2.0> or
//! - the MIT license <http://opensource.org/licenses/MIT>, at your option.
#![cfg_attr(docsrs, feature(doc_auto_cfg))]

mod capabilities;
pub mod data_space;
mod datatype;
mod engine_sync;
pub mod engines;
mod property;
mod transfer_buffer;

pub use capabilities::{EngineCapabilities, EngineVersion};
pub use data_space::{DataSpace, DataSpaceCreateError, HyperslabError};
pub use datatype::Datatype;
pub use engine_sync::{DatasetEngine, Engine, PropertyEngine};
pub use property::{
    AllocTimeKind, FileSpaceStrategyKind, FilterKind, LayoutKind, PropertyListClass, TransferMode,
};
pub use transfer_buffer::{TransferBuffer, TransferBufferMut};

/// An engine-side object identifier.
///
/// Identifiers returned by an engine are positive on success and negative on failure.
pub type Hid = i64;

/// A status code returned by an engine operation.
///
/// A negative status indicates failure.
pub type Status = i32;

/// The identifier standing for "default properties".
///
/// Passing it wherever a property list is expected requests the engine defaults.
pub const PLIST_DEFAULT: Hid = 0;

/// The maximum extent of an axis that can grow without bound.
pub const UNLIMITED: u64 = u64::MAX;

/// Returns true if `status` indicates failure.
#[must_use]
pub const fn is_failure(status: Status) -> bool {
    status < 0
}
