use derive_more::Display;

/// An element datatype understood by an engine.
///
/// Fixed size datatypes are stored in native byte order.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Display)]
#[non_exhaustive]
pub enum Datatype {
    /// `int8`
    #[display("int8")]
    Int8,
    /// `int16`
    #[display("int16")]
    Int16,
    /// `int32`
    #[display("int32")]
    Int32,
    /// `int64`
    #[display("int64")]
    Int64,
    /// `uint8`
    #[display("uint8")]
    UInt8,
    /// `uint16`
    #[display("uint16")]
    UInt16,
    /// `uint32`
    #[display("uint32")]
    UInt32,
    /// `uint64`
    #[display("uint64")]
    UInt64,
    /// `float32`
    #[display("float32")]
    Float32,
    /// `float64`
    #[display("float64")]
    Float64,
    /// A variable-length UTF-8 string.
    ///
    /// Transferred as one pointer per element.
    #[display("string")]
    VarLenString,
}

impl Datatype {
    /// Returns the size in bytes of one element, or [`None`] for variable-length datatypes.
    #[must_use]
    pub const fn fixed_size(&self) -> Option<usize> {
        match self {
            Self::Int8 | Self::UInt8 => Some(1),
            Self::Int16 | Self::UInt16 => Some(2),
            Self::Int32 | Self::UInt32 | Self::Float32 => Some(4),
            Self::Int64 | Self::UInt64 | Self::Float64 => Some(8),
            Self::VarLenString => None,
        }
    }

    /// Returns true if the datatype is variable-length.
    #[must_use]
    pub const fn is_variable_length(&self) -> bool {
        self.fixed_size().is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn datatype_sizes() {
        assert_eq!(Datatype::Int8.fixed_size(), Some(1));
        assert_eq!(Datatype::UInt16.fixed_size(), Some(2));
        assert_eq!(Datatype::Float32.fixed_size(), Some(4));
        assert_eq!(Datatype::Float64.fixed_size(), Some(8));
        assert_eq!(Datatype::VarLenString.fixed_size(), None);
        assert!(Datatype::VarLenString.is_variable_length());
        assert!(!Datatype::Int64.is_variable_length());
        assert_eq!(Datatype::UInt64.to_string(), "uint64");
    }
}
