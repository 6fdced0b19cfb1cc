//! Container classification.
//!
//! Every container type that can be read from or written to a dataset implements [`Container`], which
//! declares its [`ContainerKind`], its rank and the [`Marshaller`] converting it to and from a flat
//! transfer buffer.
//!
//! | Container                         | Kind                      | Rank  | Marshaller |
//! |-----------------------------------|---------------------------|-------|------------|
//! | `Vec<T>`                          | [`ContainerKind::Flat`]   | 1     | [`FlatMarshaller`] |
//! | `Vec<Vec<T>>`, `Vec<Vec<Vec<T>>>`, ... | [`ContainerKind::Nested`] | depth | [`NestedMarshaller`] |
//! | `ndarray::Array<T, Ix1>` ... `Array<T, Ix6>` | [`ContainerKind::Matrix`] | dimensionality | [`MatrixMarshaller`](crate::marshaller::MatrixMarshaller) |
//! | `Vec<String>`                     | [`ContainerKind::Text`]   | 1     | [`TextMarshaller`] |
//!
//! `T` is any [`Scalar`]: `i8`, `i16`, `i32`, `i64`, `u8`, `u16`, `u32`, `u64`, `f32` or `f64`.
//! The matrix containers require the `ndarray` feature.

use derive_more::Display;
use highslab_engine::Datatype;

use crate::TransferError;
use crate::marshaller::{FlatMarshaller, Marshaller, NestedMarshaller, TextMarshaller};

/// The shape category of a container.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Display)]
pub enum ContainerKind {
    /// A contiguous sequence of scalars.
    #[display("flat")]
    Flat,
    /// Nested sequences of scalars, one nesting level per axis.
    #[display("nested")]
    Nested,
    /// A dense fixed-rank array.
    #[display("matrix")]
    Matrix,
    /// A sequence of variable-length strings.
    #[display("text")]
    Text,
}

/// A dataset element type.
pub trait Element {
    /// The engine datatype of the element.
    const DATATYPE: Datatype;
}

/// A fixed-size element type that can be reinterpreted as bytes.
pub trait Scalar: Element + bytemuck::Pod + Default {}

/// A container that can be transferred to and from a dataset.
pub trait Container: Sized {
    /// The shape category of the container.
    const KIND: ContainerKind;

    /// The number of axes of the container.
    const RANK: usize;

    /// The leaf element type.
    type Element: Element;

    /// The marshaller of the container.
    type Marshaller: Marshaller<Self>;
}

/// One level of a nested container.
///
/// Scalars are the innermost level with a depth of 0; every enclosing `Vec` adds one level.
pub trait NestedLevel: Default {
    /// The leaf element type.
    type Leaf: Scalar;

    /// The number of `Vec` levels.
    const DEPTH: usize;

    /// Append the leaves of this level to `values` in C order.
    ///
    /// `shape` holds the extents of this level and the levels below it; `axis` is the axis of this level.
    ///
    /// # Errors
    /// Returns [`TransferError::DimensionMismatch`] if the length of a level differs from its extent.
    fn flatten(
        &self,
        shape: &[usize],
        axis: usize,
        values: &mut Vec<Self::Leaf>,
    ) -> Result<(), TransferError>;

    /// Resize this level to `shape` and fill it from `values` in C order.
    fn unflatten(&mut self, shape: &[usize], values: &mut std::slice::Iter<'_, Self::Leaf>);
}

impl<L: NestedLevel> NestedLevel for Vec<L> {
    type Leaf = L::Leaf;

    const DEPTH: usize = L::DEPTH + 1;

    fn flatten(
        &self,
        shape: &[usize],
        axis: usize,
        values: &mut Vec<Self::Leaf>,
    ) -> Result<(), TransferError> {
        let expected = shape.first().copied().unwrap_or_default();
        if self.len() != expected {
            return Err(TransferError::DimensionMismatch {
                axis,
                expected,
                actual: self.len(),
            });
        }
        let inner = shape.get(1..).unwrap_or_default();
        for level in self {
            level.flatten(inner, axis + 1, values)?;
        }
        Ok(())
    }

    fn unflatten(&mut self, shape: &[usize], values: &mut std::slice::Iter<'_, Self::Leaf>) {
        self.resize_with(shape.first().copied().unwrap_or_default(), L::default);
        let inner = shape.get(1..).unwrap_or_default();
        for level in self {
            level.unflatten(inner, values);
        }
    }
}

impl<L: NestedLevel> Container for Vec<Vec<L>> {
    const KIND: ContainerKind = ContainerKind::Nested;
    const RANK: usize = Self::DEPTH;
    type Element = L::Leaf;
    type Marshaller = NestedMarshaller<Self>;
}

impl Element for String {
    const DATATYPE: Datatype = Datatype::VarLenString;
}

impl Container for Vec<String> {
    const KIND: ContainerKind = ContainerKind::Text;
    const RANK: usize = 1;
    type Element = String;
    type Marshaller = TextMarshaller;
}

macro_rules! impl_scalar {
    ($type:ty, $datatype:ident) => {
        impl Element for $type {
            const DATATYPE: Datatype = Datatype::$datatype;
        }

        impl Scalar for $type {}

        impl NestedLevel for $type {
            type Leaf = Self;

            const DEPTH: usize = 0;

            fn flatten(
                &self,
                _shape: &[usize],
                _axis: usize,
                values: &mut Vec<Self>,
            ) -> Result<(), TransferError> {
                values.push(*self);
                Ok(())
            }

            fn unflatten(&mut self, _shape: &[usize], values: &mut std::slice::Iter<'_, Self>) {
                if let Some(value) = values.next() {
                    *self = *value;
                }
            }
        }

        impl Container for Vec<$type> {
            const KIND: ContainerKind = ContainerKind::Flat;
            const RANK: usize = 1;
            type Element = $type;
            type Marshaller = FlatMarshaller;
        }
    };
}

impl_scalar!(i8, Int8);
impl_scalar!(i16, Int16);
impl_scalar!(i32, Int32);
impl_scalar!(i64, Int64);
impl_scalar!(u8, UInt8);
impl_scalar!(u16, UInt16);
impl_scalar!(u32, UInt32);
impl_scalar!(u64, UInt64);
impl_scalar!(f32, Float32);
impl_scalar!(f64, Float64);

#[cfg(feature = "ndarray")]
macro_rules! impl_matrix {
    ($dimension:ty, $rank:literal) => {
        impl<T: Scalar> Container for ndarray::Array<T, $dimension> {
            const KIND: ContainerKind = ContainerKind::Matrix;
            const RANK: usize = $rank;
            type Element = T;
            type Marshaller = crate::marshaller::MatrixMarshaller<T>;
        }
    };
}

#[cfg(feature = "ndarray")]
impl_matrix!(ndarray::Ix1, 1);
#[cfg(feature = "ndarray")]
impl_matrix!(ndarray::Ix2, 2);
#[cfg(feature = "ndarray")]
impl_matrix!(ndarray::Ix3, 3);
#[cfg(feature = "ndarray")]
impl_matrix!(ndarray::Ix4, 4);
#[cfg(feature = "ndarray")]
impl_matrix!(ndarray::Ix5, 5);
#[cfg(feature = "ndarray")]
impl_matrix!(ndarray::Ix6, 6);
