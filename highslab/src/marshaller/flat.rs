use std::sync::Arc;

use highslab_engine::{Engine, TransferBuffer, TransferBufferMut};

use super::Marshaller;
use crate::{TransferError, container::Scalar};

/// The marshaller of flat containers.
///
/// The vector storage is the transfer buffer.
#[derive(Debug)]
pub struct FlatMarshaller {
    len: usize,
}

impl<T: Scalar> Marshaller<Vec<T>> for FlatMarshaller {
    fn new(_engine: &Arc<dyn Engine>, shape: &[usize]) -> Self {
        Self {
            len: shape.first().copied().unwrap_or_default(),
        }
    }

    fn transform_read<'a>(&'a mut self, container: &'a mut Vec<T>) -> TransferBufferMut<'a> {
        container.resize(self.len, T::default());
        TransferBufferMut::Fixed(bytemuck::cast_slice_mut(container.as_mut_slice()))
    }

    fn transform_write<'a>(
        &'a mut self,
        container: &'a Vec<T>,
    ) -> Result<TransferBuffer<'a>, TransferError> {
        if container.len() != self.len {
            return Err(TransferError::DimensionMismatch {
                axis: 0,
                expected: self.len,
                actual: container.len(),
            });
        }
        Ok(TransferBuffer::Fixed(bytemuck::cast_slice(container)))
    }

    unsafe fn process_result(self, _container: &mut Vec<T>) -> Result<(), TransferError> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use highslab_engine::engines::MemoryEngine;

    use super::*;

    #[test]
    fn flat_marshaller() {
        let engine: Arc<dyn Engine> = Arc::new(MemoryEngine::new());

        let mut marshaller = <FlatMarshaller as Marshaller<Vec<u16>>>::new(&engine, &[3]);
        let mut container = vec![7u16];
        let TransferBufferMut::Fixed(bytes) = marshaller.transform_read(&mut container) else {
            panic!("expected a fixed buffer");
        };
        assert_eq!(bytes.len(), 6);
        assert_eq!(container, vec![7, 0, 0]);

        let mut marshaller = <FlatMarshaller as Marshaller<Vec<u16>>>::new(&engine, &[2]);
        assert!(matches!(
            marshaller.transform_write(&container),
            Err(TransferError::DimensionMismatch {
                axis: 0,
                expected: 2,
                actual: 3
            })
        ));
        let container = vec![1u16, 2];
        let TransferBuffer::Fixed(bytes) = marshaller.transform_write(&container).unwrap() else {
            panic!("expected a fixed buffer");
        };
        assert_eq!(bytes, bytemuck::cast_slice::<u16, u8>(&[1, 2]));
    }
}
