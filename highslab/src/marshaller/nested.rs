use std::{marker::PhantomData, sync::Arc};

use highslab_engine::{Engine, TransferBuffer, TransferBufferMut};

use super::Marshaller;
use crate::{TransferError, container::NestedLevel};

/// The marshaller of nested containers.
///
/// Leaves are staged in a contiguous scratch buffer in C order.
pub struct NestedMarshaller<C: NestedLevel> {
    shape: Vec<usize>,
    scratch: Vec<C::Leaf>,
    _container: PhantomData<C>,
}

impl<C: NestedLevel> std::fmt::Debug for NestedMarshaller<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NestedMarshaller")
            .field("shape", &self.shape)
            .finish_non_exhaustive()
    }
}

impl<C: NestedLevel> Marshaller<C> for NestedMarshaller<C> {
    fn new(_engine: &Arc<dyn Engine>, shape: &[usize]) -> Self {
        Self {
            shape: shape.to_vec(),
            scratch: Vec::new(),
            _container: PhantomData,
        }
    }

    fn transform_read<'a>(&'a mut self, _container: &'a mut C) -> TransferBufferMut<'a> {
        let num_elements = self.shape.iter().product();
        self.scratch = vec![C::Leaf::default(); num_elements];
        TransferBufferMut::Fixed(bytemuck::cast_slice_mut(&mut self.scratch))
    }

    fn transform_write<'a>(
        &'a mut self,
        container: &'a C,
    ) -> Result<TransferBuffer<'a>, TransferError> {
        let mut scratch = Vec::with_capacity(self.shape.iter().product());
        container.flatten(&self.shape, 0, &mut scratch)?;
        self.scratch = scratch;
        Ok(TransferBuffer::Fixed(bytemuck::cast_slice(&self.scratch)))
    }

    unsafe fn process_result(self, container: &mut C) -> Result<(), TransferError> {
        container.unflatten(&self.shape, &mut self.scratch.iter());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use highslab_engine::engines::MemoryEngine;

    use super::*;

    type Cube = Vec<Vec<Vec<i32>>>;

    #[test]
    fn nested_marshaller_write() {
        let engine: Arc<dyn Engine> = Arc::new(MemoryEngine::new());
        let cube: Cube = vec![vec![vec![1, 2], vec![3, 4]], vec![vec![5, 6], vec![7, 8]]];

        let mut marshaller = <NestedMarshaller<Cube> as Marshaller<Cube>>::new(&engine, &[2, 2, 2]);
        let TransferBuffer::Fixed(bytes) = marshaller.transform_write(&cube).unwrap() else {
            panic!("expected a fixed buffer");
        };
        assert_eq!(bytes, bytemuck::cast_slice::<i32, u8>(&[1, 2, 3, 4, 5, 6, 7, 8]));

        let mut marshaller = <NestedMarshaller<Cube> as Marshaller<Cube>>::new(&engine, &[2, 3, 2]);
        assert!(matches!(
            marshaller.transform_write(&cube),
            Err(TransferError::DimensionMismatch {
                axis: 1,
                expected: 3,
                actual: 2
            })
        ));
    }

    #[test]
    fn nested_marshaller_read() {
        let engine: Arc<dyn Engine> = Arc::new(MemoryEngine::new());
        let mut cube: Cube = vec![vec![vec![9; 4]]];
        let mut marshaller = <NestedMarshaller<Cube> as Marshaller<Cube>>::new(&engine, &[1, 2, 3]);
        let TransferBufferMut::Fixed(bytes) = marshaller.transform_read(&mut cube) else {
            panic!("expected a fixed buffer");
        };
        bytes.copy_from_slice(bytemuck::cast_slice(&[0i32, 1, 2, 3, 4, 5]));
        // SAFETY: the buffer is fixed size
        unsafe { marshaller.process_result(&mut cube) }.unwrap();
        assert_eq!(cube, vec![vec![vec![0, 1, 2], vec![3, 4, 5]]]);
    }
}
