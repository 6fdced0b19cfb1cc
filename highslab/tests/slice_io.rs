#![allow(missing_docs)]

use std::sync::Arc;

use highslab::engine::engines::MemoryEngine;
use highslab::engine::{DataSpace, Engine};
use highslab::property_list::{DatasetCreateProps, DatasetTransferProps};
use highslab::{
    DataSpaceError, Dataset, Error, SliceIo, TransferError, TransferKind, options::Chunking,
};

fn engine() -> (Arc<MemoryEngine>, Arc<dyn Engine>) {
    let memory = Arc::new(MemoryEngine::new());
    let engine: Arc<dyn Engine> = memory.clone();
    (memory, engine)
}

fn create<E: highslab::container::Element>(
    engine: &Arc<dyn Engine>,
    name: &str,
    dims: Vec<u64>,
) -> Dataset {
    let dcpl = DatasetCreateProps::new(engine);
    Dataset::create_for::<E>(engine, name, &DataSpace::new(dims), &dcpl).unwrap()
}

fn cube() -> Vec<Vec<Vec<i32>>> {
    (0..2)
        .map(|i| {
            (0..3)
                .map(|j| (0..4).map(|k| i * 100 + j * 10 + k).collect())
                .collect()
        })
        .collect()
}

#[test]
fn slice_io_nested_round_trip() {
    let (memory, engine) = engine();
    let dataset = create::<i32>(&engine, "cube", vec![2, 3, 4]);

    let written = cube();
    dataset.write(&written).unwrap();

    let mut read: Vec<Vec<Vec<i32>>> = Vec::new();
    dataset.read(&mut read).unwrap();
    assert_eq!(read, written);
    assert_eq!(memory.statistics().writes, 1);
    assert_eq!(memory.statistics().reads, 1);

    // containers must match the rank of the selection, not its element count
    let mut row = Vec::<i32>::new();
    let selection = dataset.select(&[1, 2, 0], &[1, 1, 4]).unwrap();
    assert!(matches!(
        selection.read(&mut row),
        Err(Error::DataSpace(DataSpaceError::RankMismatch {
            operation: TransferKind::Read,
            container: 1,
            space: 3
        }))
    ));
    let mut block: Vec<Vec<Vec<i32>>> = Vec::new();
    selection.read(&mut block).unwrap();
    assert_eq!(block, vec![vec![vec![120, 121, 122, 123]]]);
}

#[test]
fn slice_io_dimension_mismatch_before_transfer() {
    let (memory, engine) = engine();
    let dataset = create::<i32>(&engine, "cube", vec![2, 3, 4]);

    let mut ragged = cube();
    ragged[1][2].pop();
    assert!(matches!(
        dataset.write(&ragged),
        Err(Error::Transfer(TransferError::DimensionMismatch {
            axis: 2,
            expected: 4,
            actual: 3
        }))
    ));

    let mut short = cube();
    short.pop();
    assert!(matches!(
        dataset.write(&short),
        Err(Error::Transfer(TransferError::DimensionMismatch {
            axis: 0,
            expected: 2,
            actual: 1
        }))
    ));

    assert!(matches!(
        dataset.write(&vec![0i32; 24]),
        Err(Error::DataSpace(DataSpaceError::RankMismatch {
            operation: TransferKind::Write,
            container: 1,
            space: 3
        }))
    ));
    assert_eq!(memory.statistics().writes, 0);
}

#[test]
fn slice_io_flat_selection() {
    let (_memory, engine) = engine();
    let dataset = create::<u16>(&engine, "series", vec![10]);
    dataset.write(&(0..10).collect::<Vec<u16>>()).unwrap();

    let selection = dataset.select(&[3], &[4]).unwrap();
    let mut values = vec![0u16; 100];
    selection.read(&mut values).unwrap();
    assert_eq!(values, vec![3, 4, 5, 6]);

    selection.write(&vec![60u16, 50, 40, 30]).unwrap();
    let mut values = Vec::<u16>::new();
    dataset.read(&mut values).unwrap();
    assert_eq!(values, vec![0, 1, 2, 60, 50, 40, 30, 7, 8, 9]);

    assert!(matches!(
        selection.write(&vec![1u16, 2, 3]),
        Err(Error::Transfer(TransferError::DimensionMismatch {
            axis: 0,
            expected: 4,
            actual: 3
        }))
    ));
}

#[test]
fn slice_io_selection_errors() {
    let (_memory, engine) = engine();
    let dataset = create::<f64>(&engine, "grid", vec![4, 4]);
    assert!(matches!(
        dataset.select(&[0, 0, 0], &[1, 1, 1]),
        Err(DataSpaceError::SelectionRank {
            offset: 3,
            count: 3,
            rank: 2
        })
    ));
    assert!(matches!(
        dataset.select(&[2, 2], &[3, 1]),
        Err(DataSpaceError::HyperslabOutOfBounds(_))
    ));
}

#[test]
fn slice_io_transfer_failure() {
    let (memory, engine) = engine();
    let dataset = create::<f64>(&engine, "series", vec![3]);
    dataset.write(&vec![1.0f64, 2.0, 3.0]).unwrap();

    memory.set_fail_transfers(true);
    let mut values = vec![7.0f64, 8.0, 9.0];
    let error = dataset.read(&mut values).unwrap_err();
    assert_eq!(
        error.to_string(),
        "Error during read: transfer failure injected"
    );
    assert_eq!(values, vec![7.0, 8.0, 9.0]);

    let error = dataset.write(&values).unwrap_err();
    assert!(matches!(error, Error::Transfer(TransferError::Engine(_))));
    assert_eq!(
        error.to_string(),
        "Error during write: transfer failure injected"
    );

    memory.set_fail_transfers(false);
    let mut values = Vec::<f64>::new();
    dataset.read(&mut values).unwrap();
    assert_eq!(values, vec![1.0, 2.0, 3.0]);
}

#[test]
fn slice_io_datatype_mismatch() {
    let (_memory, engine) = engine();
    let dataset = create::<f64>(&engine, "series", vec![3]);
    let mut values = Vec::<f32>::new();
    let error = dataset.read(&mut values).unwrap_err();
    assert!(error.to_string().starts_with("Error during read: "));
}

#[test]
fn slice_io_chunked_transfer_properties() {
    let (_memory, engine) = engine();
    let mut dcpl = DatasetCreateProps::new(&engine);
    dcpl.add(&Chunking::guess(&[64, 64], &[64, 64], size_of::<i64>()))
        .unwrap();
    let dataset =
        Dataset::create_for::<i64>(&engine, "tiles", &DataSpace::new(vec![64, 64]), &dcpl)
            .unwrap();

    let dxpl = DatasetTransferProps::new(&engine);
    let selection = dataset.select(&[62, 0], &[2, 2]).unwrap();
    selection
        .write_with(&vec![vec![1i64, 2], vec![3, 4]], &dxpl)
        .unwrap();
    let mut corner: Vec<Vec<i64>> = Vec::new();
    selection.read_with(&mut corner, &dxpl).unwrap();
    assert_eq!(corner, vec![vec![1, 2], vec![3, 4]]);
}

#[cfg(feature = "ndarray")]
#[test]
fn slice_io_matrix() {
    use ndarray::{Array2, Array3, array};

    let (_memory, engine) = engine();
    let dataset = create::<f32>(&engine, "image", vec![3, 4]);

    let selection = dataset.select(&[1, 1], &[2, 3]).unwrap();
    selection
        .write(&array![[1f32, 2., 3.], [4., 5., 6.]])
        .unwrap();

    let mut image = Array2::<f32>::zeros((0, 0));
    dataset.read(&mut image).unwrap();
    assert_eq!(
        image,
        array![[0f32, 0., 0., 0.], [0., 1., 2., 3.], [0., 4., 5., 6.]]
    );

    // non-standard layouts are written in logical order
    let transposed = array![[1f32, 4.], [2., 5.], [3., 6.]].reversed_axes();
    selection.write(&transposed).unwrap();
    let mut window = Array2::<f32>::zeros((2, 3));
    selection.read(&mut window).unwrap();
    assert_eq!(window, array![[1f32, 2., 3.], [4., 5., 6.]]);

    let mut volume = Array3::<f32>::zeros((1, 1, 1));
    assert!(matches!(
        dataset.read(&mut volume),
        Err(Error::DataSpace(DataSpaceError::RankMismatch { .. }))
    ));

    assert!(matches!(
        selection.write(&Array2::<f32>::zeros((3, 2))),
        Err(Error::Transfer(TransferError::DimensionMismatch { axis: 0, .. }))
    ));
}
