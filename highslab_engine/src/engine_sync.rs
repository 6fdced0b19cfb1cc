use std::ffi::c_char;

use super::{
    AllocTimeKind, DataSpace, Datatype, EngineCapabilities, FileSpaceStrategyKind, FilterKind,
    Hid, LayoutKind, PropertyListClass, Status, TransferBuffer, TransferBufferMut, TransferMode,
};

/// Property list operations of an engine.
///
/// Setters return a negative [`Status`] if `plist` is not a live property list of a class accepting the
/// property, or if the value is rejected.
pub trait PropertyEngine: Send + Sync {
    /// Return the identifier of a property list class.
    ///
    /// Returns a negative identifier if the engine does not support `class`.
    fn plist_class_id(&self, class: PropertyListClass) -> Hid;

    /// Create a new property list from the class identified by `class_id`.
    ///
    /// Returns a negative identifier on failure.
    fn plist_create(&self, class_id: Hid) -> Hid;

    /// Set the file space management strategy of a file creation property list.
    fn set_file_space_strategy(
        &self,
        plist: Hid,
        strategy: FileSpaceStrategyKind,
        persist: bool,
        threshold: u64,
    ) -> Status;

    /// Set the file space page size of a file creation property list.
    fn set_file_space_page_size(&self, plist: Hid, page_size: u64) -> Status;

    /// Set the page buffer size of a file access property list.
    fn set_page_buffer_size(
        &self,
        plist: Hid,
        buffer_size: usize,
        min_meta_percent: u32,
        min_raw_percent: u32,
    ) -> Status;

    /// Request collective metadata reads on a file, group, dataset or link access property list.
    fn set_all_coll_metadata_ops(&self, plist: Hid, collective: bool) -> Status;

    /// Request collective metadata writes on a file access property list.
    fn set_coll_metadata_write(&self, plist: Hid, collective: bool) -> Status;

    /// Set the estimated number of links and their average name length of a group creation property list.
    fn set_est_link_info(&self, plist: Hid, entries: u32, name_length: u32) -> Status;

    /// Set the chunk shape of a dataset creation property list.
    ///
    /// This also sets the layout to [`LayoutKind::Chunked`].
    fn set_chunk(&self, plist: Hid, dims: &[u64]) -> Status;

    /// Set the storage layout of a dataset creation property list.
    fn set_layout(&self, plist: Hid, layout: LayoutKind) -> Status;

    /// Returns true if `filter` is available.
    fn filter_avail(&self, filter: FilterKind) -> bool;

    /// Append the deflate filter with compression `level` to a dataset creation property list.
    fn set_deflate(&self, plist: Hid, level: u32) -> Status;

    /// Append the szip filter to a dataset creation property list.
    fn set_szip(&self, plist: Hid, options_mask: u32, pixels_per_block: u32) -> Status;

    /// Append the shuffle filter to a dataset creation property list.
    fn set_shuffle(&self, plist: Hid) -> Status;

    /// Append the fletcher32 checksum filter to a dataset creation property list.
    fn set_fletcher32(&self, plist: Hid) -> Status;

    /// Set when storage is allocated on a dataset creation property list.
    fn set_alloc_time(&self, plist: Hid, alloc_time: AllocTimeKind) -> Status;

    /// Set the raw data chunk cache of a dataset access property list.
    fn set_chunk_cache(&self, plist: Hid, slots: usize, bytes: usize, preemption: f64) -> Status;

    /// Enable the creation of missing intermediate groups on a link creation property list.
    fn set_create_intermediate_group(&self, plist: Hid, create: bool) -> Status;

    /// Set the parallel transfer mode of a dataset transfer property list.
    fn set_dxpl_mpio(&self, plist: Hid, mode: TransferMode) -> Status;
}

/// Dataset operations of an engine.
pub trait DatasetEngine: Send + Sync {
    /// Create a dataset called `name` with elements of `datatype` and the extent of `space`.
    ///
    /// Returns a negative identifier on failure.
    fn dataset_create(
        &self,
        name: &str,
        datatype: Datatype,
        space: &DataSpace,
        dcpl: Hid,
        dapl: Hid,
    ) -> Hid;

    /// Open the dataset called `name`.
    ///
    /// Returns a negative identifier on failure.
    fn dataset_open(&self, name: &str, dapl: Hid) -> Hid;

    /// Write the extent and maximum extent of `dataset` into `dims` and `max_dims`.
    fn dataset_extent(&self, dataset: Hid, dims: &mut Vec<u64>, max_dims: &mut Vec<u64>)
    -> Status;

    /// Write the element datatype of `dataset` into `datatype`.
    fn dataset_datatype(&self, dataset: Hid, datatype: &mut Option<Datatype>) -> Status;

    /// Read the selection of `file_space` from `dataset` into `buffer`.
    ///
    /// `mem_space` describes the layout of `buffer`. [`None`] means the buffer has the shape of the
    /// selection of `file_space`. The number of selected elements of both spaces must match.
    ///
    /// No element of `buffer` is meaningful if the read fails.
    fn dataset_read(
        &self,
        dataset: Hid,
        mem_type: Datatype,
        mem_space: Option<&DataSpace>,
        file_space: &DataSpace,
        dxpl: Hid,
        buffer: TransferBufferMut<'_>,
    ) -> Status;

    /// Write `buffer` into the selection of `file_space` in `dataset`.
    ///
    /// See [`DatasetEngine::dataset_read`] for the meaning of `mem_space`.
    fn dataset_write(
        &self,
        dataset: Hid,
        mem_type: Datatype,
        mem_space: Option<&DataSpace>,
        file_space: &DataSpace,
        dxpl: Hid,
        buffer: TransferBuffer<'_>,
    ) -> Status;
}

/// A storage engine.
pub trait Engine: PropertyEngine + DatasetEngine {
    /// The capabilities of the engine.
    fn capabilities(&self) -> EngineCapabilities;

    /// Release the object identified by `id`.
    fn close(&self, id: Hid) -> Status;

    /// Release memory allocated by the engine and handed to the caller.
    ///
    /// # Safety
    /// `ptr` must have been returned by this engine in a [`TransferBufferMut::Text`] slot and must not
    /// have been released before.
    unsafe fn free_memory(&self, ptr: *mut c_char) -> Status;

    /// The message of the most recent failure, if any.
    fn last_error_message(&self) -> Option<String>;
}
