use std::sync::Arc;

use highslab_engine::{Engine, TransferBuffer, TransferBufferMut};
use itertools::izip;
use ndarray::{Array, Dimension};

use super::Marshaller;
use crate::{TransferError, container::Scalar};

/// The marshaller of [`ndarray`] arrays.
///
/// Arrays in standard layout are transferred in place. Other arrays are written through a scratch copy in
/// logical order and replaced by an array in standard layout on read.
#[derive(Debug)]
pub struct MatrixMarshaller<T> {
    shape: Vec<usize>,
    scratch: Vec<T>,
}

impl<T: Scalar, D: Dimension> Marshaller<Array<T, D>> for MatrixMarshaller<T> {
    fn new(_engine: &Arc<dyn Engine>, shape: &[usize]) -> Self {
        Self {
            shape: shape.to_vec(),
            scratch: Vec::new(),
        }
    }

    fn transform_read<'a>(&'a mut self, container: &'a mut Array<T, D>) -> TransferBufferMut<'a> {
        if container.shape() != self.shape.as_slice() {
            let mut dim = D::zeros(self.shape.len());
            dim.slice_mut().copy_from_slice(&self.shape);
            *container = Array::from_elem(dim, T::default());
        } else if !container.is_standard_layout() {
            *container = container.as_standard_layout().into_owned();
        }
        TransferBufferMut::Fixed(bytemuck::cast_slice_mut(
            container.as_slice_mut().unwrap_or_default(),
        ))
    }

    fn transform_write<'a>(
        &'a mut self,
        container: &'a Array<T, D>,
    ) -> Result<TransferBuffer<'a>, TransferError> {
        for (axis, &expected, &actual) in izip!(0.., &self.shape, container.shape()) {
            if expected != actual {
                return Err(TransferError::DimensionMismatch {
                    axis,
                    expected,
                    actual,
                });
            }
        }
        if let Some(values) = container.as_slice() {
            return Ok(TransferBuffer::Fixed(bytemuck::cast_slice(values)));
        }
        self.scratch = container.iter().copied().collect();
        Ok(TransferBuffer::Fixed(bytemuck::cast_slice(&self.scratch)))
    }

    unsafe fn process_result(self, _container: &mut Array<T, D>) -> Result<(), TransferError> {
        Ok(())
    }
}
