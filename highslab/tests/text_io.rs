#![allow(missing_docs)]

use std::sync::Arc;

use highslab::engine::engines::MemoryEngine;
use highslab::engine::{DataSpace, Datatype, Engine};
use highslab::property_list::DatasetCreateProps;
use highslab::{Dataset, Error, SliceIo, TransferError};

fn text_dataset(len: u64) -> (Arc<MemoryEngine>, Dataset) {
    let memory = Arc::new(MemoryEngine::new());
    let engine: Arc<dyn Engine> = memory.clone();
    let dcpl = DatasetCreateProps::new(&engine);
    let dataset =
        Dataset::create_for::<String>(&engine, "labels", &DataSpace::new(vec![len]), &dcpl)
            .unwrap();
    assert_eq!(dataset.datatype(), Datatype::VarLenString);
    (memory, dataset)
}

#[test]
fn text_round_trip_releases_every_string() {
    let (memory, dataset) = text_dataset(3);
    let written = vec![
        "alpha".to_string(),
        "βeta".to_string(),
        "a much longer string for the third element".to_string(),
    ];
    dataset.write(&written).unwrap();

    let mut read = Vec::<String>::new();
    dataset.read(&mut read).unwrap();
    assert_eq!(read, written);
    assert_eq!(memory.statistics().frees, 3);
    assert_eq!(memory.outstanding_allocations(), 0);

    dataset.read(&mut read).unwrap();
    assert_eq!(memory.statistics().frees, 6);
    assert_eq!(memory.outstanding_allocations(), 0);
}

#[test]
fn text_selection_unwritten_elements_are_empty() {
    let (memory, dataset) = text_dataset(5);
    let selection = dataset.select(&[1], &[2]).unwrap();
    selection
        .write(&vec!["one".to_string(), String::new()])
        .unwrap();

    let mut read = Vec::<String>::new();
    dataset.read(&mut read).unwrap();
    assert_eq!(read, vec!["", "one", "", "", ""]);
    // only written elements are allocated, including the empty string
    assert_eq!(memory.statistics().frees, 2);
    assert_eq!(memory.outstanding_allocations(), 0);

    let mut read = vec!["stale".to_string(); 7];
    selection.read(&mut read).unwrap();
    assert_eq!(read, vec!["one", ""]);
}

#[test]
fn text_failed_read_releases_nothing() {
    let (memory, dataset) = text_dataset(2);
    dataset
        .write(&vec!["left".to_string(), "right".to_string()])
        .unwrap();

    memory.set_fail_transfers(true);
    let mut read = vec!["kept".to_string()];
    let error = dataset.read(&mut read).unwrap_err();
    assert!(matches!(error, Error::Transfer(TransferError::Engine(_))));
    assert_eq!(read, vec!["kept"]);
    assert_eq!(memory.statistics().frees, 0);
    assert_eq!(memory.outstanding_allocations(), 0);
}

#[test]
fn text_write_errors() {
    let (memory, dataset) = text_dataset(2);
    assert!(matches!(
        dataset.write(&vec!["only one".to_string()]),
        Err(Error::Transfer(TransferError::DimensionMismatch {
            axis: 0,
            expected: 2,
            actual: 1
        }))
    ));
    assert_eq!(memory.statistics().writes, 0);

    let error = dataset
        .write(&vec!["nul\0byte".to_string(), String::new()])
        .unwrap_err();
    assert_eq!(
        error.to_string(),
        "Error during write: strings with interior NUL bytes cannot be stored"
    );
    assert_eq!(memory.statistics().writes, 1);

    assert!(
        dataset
            .write(&vec![1.5f64, 2.5])
            .unwrap_err()
            .to_string()
            .starts_with("Error during write: ")
    );
}
