//! Reading and writing datasets and selections.
//!
//! [`SliceIo`] is implemented by [`Dataset`] and [`Selection`]. It selects hyperslabs and transfers
//! [`Container`]s with exactly one engine read or write per call.

use highslab_engine::{DataSpace, DatasetEngine, Hid, PLIST_DEFAULT, is_failure};

use crate::{
    DataSpaceError, Dataset, Error, Selection, TransferError, TransferKind,
    container::{Container, Element},
    marshaller::Marshaller,
    property_list::DatasetTransferProps,
};

/// Operations on anything that can be sliced, read and written.
pub trait SliceIo {
    /// The dataset.
    fn dataset(&self) -> &Dataset;

    /// The file dataspace, holding the selected region of the dataset.
    fn space(&self) -> &DataSpace;

    /// The memory dataspace, holding the shape of the containers to transfer.
    fn mem_space(&self) -> &DataSpace;

    /// The memory dataspace passed to the engine, [`None`] if the memory layout is the shape of the
    /// file selection.
    fn transfer_mem_space(&self) -> Option<&DataSpace>;

    /// Select the hyperslab starting at `offset` with `count` elements per axis.
    ///
    /// Hyperslabs are always selected relative to the whole dataset.
    ///
    /// # Errors
    /// Returns [`DataSpaceError::SelectionRank`] if the ranks of `offset` and `count` differ from the
    /// dataset rank, or [`DataSpaceError::HyperslabOutOfBounds`] if the hyperslab exceeds the extent.
    fn select(&self, offset: &[u64], count: &[u64]) -> Result<Selection<'_>, DataSpaceError> {
        let dataset = self.dataset();
        let rank = dataset.space().rank();
        if offset.len() != rank || count.len() != rank {
            return Err(DataSpaceError::SelectionRank {
                offset: offset.len(),
                count: count.len(),
                rank,
            });
        }
        let mut file_space = dataset.space().clone();
        file_space
            .select_hyperslab(offset, count)
            .map_err(DataSpaceError::HyperslabOutOfBounds)?;
        log::trace!(
            "selected hyperslab offset {offset:?} count {count:?} of dataset {}",
            dataset.name()
        );
        Ok(Selection::new(
            dataset,
            DataSpace::new(count.to_vec()),
            file_space,
        ))
    }

    /// Read the selected elements into `container`, resizing it to the shape of the memory dataspace.
    ///
    /// If the read fails, `container` keeps its prior contents or the default elements of its new shape.
    ///
    /// # Errors
    /// Returns an [`Error`] if the container rank differs from the memory dataspace rank or the engine
    /// read fails.
    fn read<C: Container>(&self, container: &mut C) -> Result<(), Error> {
        read_container(self, container, PLIST_DEFAULT)
    }

    /// Read the selected elements into `container` with the transfer properties `dxpl`.
    ///
    /// # Errors
    /// See [`SliceIo::read`].
    fn read_with<C: Container>(
        &self,
        container: &mut C,
        dxpl: &DatasetTransferProps,
    ) -> Result<(), Error> {
        read_container(self, container, dxpl.id())
    }

    /// Write `container` to the selected elements.
    ///
    /// # Errors
    /// Returns an [`Error`] if the container rank or extents differ from the memory dataspace, or the
    /// engine write fails. Extents are checked before the engine is called.
    fn write<C: Container>(&self, container: &C) -> Result<(), Error> {
        write_container(self, container, PLIST_DEFAULT)
    }

    /// Write `container` to the selected elements with the transfer properties `dxpl`.
    ///
    /// # Errors
    /// See [`SliceIo::write`].
    fn write_with<C: Container>(
        &self,
        container: &C,
        dxpl: &DatasetTransferProps,
    ) -> Result<(), Error> {
        write_container(self, container, dxpl.id())
    }
}

/// The memory shape of a transfer of `C` through `io`.
fn memory_shape<C: Container>(
    io: &(impl SliceIo + ?Sized),
    operation: TransferKind,
) -> Result<Vec<usize>, Error> {
    let mem_space = io.mem_space();
    if C::RANK != mem_space.rank() {
        return Err(DataSpaceError::RankMismatch {
            operation,
            container: C::RANK,
            space: mem_space.rank(),
        }
        .into());
    }
    let dims = mem_space.dimensions();
    dims.iter()
        .map(|&dim| usize::try_from(dim))
        .collect::<Result<Vec<_>, _>>()
        .map_err(|_| TransferError::Unaddressable(dims.to_vec()).into())
}

fn read_container<C: Container>(
    io: &(impl SliceIo + ?Sized),
    container: &mut C,
    dxpl: Hid,
) -> Result<(), Error> {
    let shape = memory_shape::<C>(io, TransferKind::Read)?;
    let dataset = io.dataset();
    let engine = dataset.engine();
    log::trace!(
        "reading {} container of shape {shape:?} from dataset {}",
        C::KIND,
        dataset.name()
    );
    let mut marshaller = <C::Marshaller as Marshaller<C>>::new(engine, &shape);
    let buffer = marshaller.transform_read(container);
    let status = engine.dataset_read(
        dataset.id(),
        <C::Element as Element>::DATATYPE,
        io.transfer_mem_space(),
        io.space(),
        dxpl,
        buffer,
    );
    if is_failure(status) {
        return Err(TransferError::from_engine(engine.as_ref(), "Error during read").into());
    }
    // SAFETY: the buffer was filled by a successful read
    unsafe { marshaller.process_result(container) }?;
    Ok(())
}

fn write_container<C: Container>(
    io: &(impl SliceIo + ?Sized),
    container: &C,
    dxpl: Hid,
) -> Result<(), Error> {
    let shape = memory_shape::<C>(io, TransferKind::Write)?;
    let dataset = io.dataset();
    let engine = dataset.engine();
    log::trace!(
        "writing {} container of shape {shape:?} to dataset {}",
        C::KIND,
        dataset.name()
    );
    let mut marshaller = <C::Marshaller as Marshaller<C>>::new(engine, &shape);
    let buffer = marshaller.transform_write(container)?;
    let status = engine.dataset_write(
        dataset.id(),
        <C::Element as Element>::DATATYPE,
        io.transfer_mem_space(),
        io.space(),
        dxpl,
        buffer,
    );
    if is_failure(status) {
        return Err(TransferError::from_engine(engine.as_ref(), "Error during write").into());
    }
    Ok(())
}
