use std::ffi::c_char;

/// A memory buffer supplied to a dataset write.
///
/// The buffer is only valid for the duration of the write.
#[derive(Debug)]
pub enum TransferBuffer<'a> {
    /// Fixed-size elements, packed contiguously in C order in native byte order.
    Fixed(&'a [u8]),
    /// One variable-length string per element, borrowed from the caller's storage.
    Text(Vec<&'a str>),
}

impl TransferBuffer<'_> {
    /// The number of bytes of a fixed buffer or the number of strings of a text buffer.
    #[must_use]
    pub fn len(&self) -> usize {
        match self {
            Self::Fixed(bytes) => bytes.len(),
            Self::Text(strings) => strings.len(),
        }
    }

    /// Returns true if the buffer holds nothing.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// A memory buffer populated by a dataset read.
#[derive(Debug)]
pub enum TransferBufferMut<'a> {
    /// Fixed-size elements, packed contiguously in C order in native byte order.
    Fixed(&'a mut [u8]),
    /// One pointer slot per element.
    ///
    /// On a successful read, the engine stores a NUL-terminated string allocated by the engine in each slot
    /// (or leaves it null). The caller takes ownership of every non-null pointer and must release each
    /// exactly once with [`Engine::free_memory`](crate::Engine::free_memory).
    Text(&'a mut [*mut c_char]),
}

impl TransferBufferMut<'_> {
    /// The number of bytes of a fixed buffer or the number of pointer slots of a text buffer.
    #[must_use]
    pub fn len(&self) -> usize {
        match self {
            Self::Fixed(bytes) => bytes.len(),
            Self::Text(pointers) => pointers.len(),
        }
    }

    /// Returns true if the buffer holds nothing.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
