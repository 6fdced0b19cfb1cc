use std::{
    ffi::{CStr, c_char},
    ptr,
    sync::Arc,
};

use highslab_engine::{Engine, TransferBuffer, TransferBufferMut, is_failure};

use super::Marshaller;
use crate::TransferError;

/// Strings allocated by an engine during a read.
///
/// Every non-null pointer is released exactly once with [`Engine::free_memory`] when the allocations are
/// dropped, including when converting them fails.
pub struct EngineAllocations {
    engine: Arc<dyn Engine>,
    pointers: Vec<*mut c_char>,
}

impl std::fmt::Debug for EngineAllocations {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EngineAllocations")
            .field("pointers", &self.pointers)
            .finish_non_exhaustive()
    }
}

impl EngineAllocations {
    /// Take ownership of `pointers` allocated by `engine`.
    ///
    /// # Safety
    /// Every non-null pointer must be a NUL-terminated string allocated by `engine` that has not been
    /// released, and must not be used by anything else afterwards.
    #[must_use]
    pub unsafe fn new(engine: Arc<dyn Engine>, pointers: Vec<*mut c_char>) -> Self {
        Self { engine, pointers }
    }

    /// The number of pointer slots.
    #[must_use]
    pub fn len(&self) -> usize {
        self.pointers.len()
    }

    /// Returns true if there are no pointer slots.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pointers.is_empty()
    }

    /// Copy the strings into owned storage. Null pointers are empty strings.
    ///
    /// # Errors
    /// Returns [`TransferError::InvalidUtf8`] if a string is not valid UTF-8.
    pub fn to_strings(&self) -> Result<Vec<String>, TransferError> {
        self.pointers
            .iter()
            .enumerate()
            .map(|(index, &pointer)| {
                if pointer.is_null() {
                    return Ok(String::new());
                }
                // SAFETY: non-null pointers are live NUL-terminated strings until drop
                let value = unsafe { CStr::from_ptr(pointer) };
                value
                    .to_str()
                    .map(str::to_string)
                    .map_err(|_| TransferError::InvalidUtf8 { index })
            })
            .collect()
    }
}

impl Drop for EngineAllocations {
    fn drop(&mut self) {
        for &pointer in self.pointers.iter().filter(|pointer| !pointer.is_null()) {
            // SAFETY: the pointer was allocated by the engine and is released once
            let status = unsafe { self.engine.free_memory(pointer) };
            if is_failure(status) {
                log::warn!(
                    "Unable to release a string allocated by the engine: {}",
                    self.engine
                        .last_error_message()
                        .unwrap_or_else(|| "unknown error".to_string())
                );
            }
        }
    }
}

/// The marshaller of text containers.
///
/// Reads receive one engine-allocated string per element. Writes borrow the container strings.
pub struct TextMarshaller {
    engine: Arc<dyn Engine>,
    len: usize,
    pointers: Vec<*mut c_char>,
}

impl std::fmt::Debug for TextMarshaller {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TextMarshaller")
            .field("len", &self.len)
            .finish_non_exhaustive()
    }
}

impl Marshaller<Vec<String>> for TextMarshaller {
    fn new(engine: &Arc<dyn Engine>, shape: &[usize]) -> Self {
        Self {
            engine: engine.clone(),
            len: shape.first().copied().unwrap_or_default(),
            pointers: Vec::new(),
        }
    }

    fn transform_read<'a>(&'a mut self, _container: &'a mut Vec<String>) -> TransferBufferMut<'a> {
        self.pointers = vec![ptr::null_mut(); self.len];
        TransferBufferMut::Text(&mut self.pointers)
    }

    fn transform_write<'a>(
        &'a mut self,
        container: &'a Vec<String>,
    ) -> Result<TransferBuffer<'a>, TransferError> {
        if container.len() != self.len {
            return Err(TransferError::DimensionMismatch {
                axis: 0,
                expected: self.len,
                actual: container.len(),
            });
        }
        Ok(TransferBuffer::Text(
            container.iter().map(String::as_str).collect(),
        ))
    }

    unsafe fn process_result(self, container: &mut Vec<String>) -> Result<(), TransferError> {
        // SAFETY: the slots were filled by a successful engine read
        let allocations = unsafe { EngineAllocations::new(self.engine, self.pointers) };
        *container = allocations.to_strings()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use highslab_engine::engines::MemoryEngine;

    use super::*;

    #[test]
    fn text_marshaller_write() {
        let engine: Arc<dyn Engine> = Arc::new(MemoryEngine::new());
        let strings = vec!["alpha".to_string(), String::new()];
        let mut marshaller = <TextMarshaller as Marshaller<Vec<String>>>::new(&engine, &[2]);
        let TransferBuffer::Text(values) = marshaller.transform_write(&strings).unwrap() else {
            panic!("expected a text buffer");
        };
        assert_eq!(values, vec!["alpha", ""]);

        let mut marshaller = <TextMarshaller as Marshaller<Vec<String>>>::new(&engine, &[3]);
        assert!(matches!(
            marshaller.transform_write(&strings),
            Err(TransferError::DimensionMismatch {
                axis: 0,
                expected: 3,
                actual: 2
            })
        ));
    }

    #[test]
    fn text_marshaller_read_null_slots() {
        let memory = Arc::new(MemoryEngine::new());
        let engine: Arc<dyn Engine> = memory.clone();
        let mut strings = vec!["stale".to_string()];
        let mut marshaller = <TextMarshaller as Marshaller<Vec<String>>>::new(&engine, &[3]);
        let TransferBufferMut::Text(pointers) = marshaller.transform_read(&mut strings) else {
            panic!("expected a text buffer");
        };
        assert_eq!(pointers.len(), 3);
        // SAFETY: every slot is null
        unsafe { marshaller.process_result(&mut strings) }.unwrap();
        assert_eq!(strings, vec![String::new(); 3]);
        assert_eq!(memory.statistics().frees, 0);
    }
}
