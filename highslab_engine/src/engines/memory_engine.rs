//! A synchronous in-memory engine.

use std::collections::{BTreeMap, BTreeSet, HashSet};
use std::ffi::{CString, c_char};

use parking_lot::Mutex;

use crate::{
    AllocTimeKind, DataSpace, DatasetEngine, Datatype, Engine, EngineCapabilities, EngineVersion,
    FileSpaceStrategyKind, FilterKind, Hid, LayoutKind, PLIST_DEFAULT, PropertyEngine,
    PropertyListClass, Status, TransferBuffer, TransferBufferMut, TransferMode,
};

use PropertyListClass as Class;

const CLASS_ID_BASE: Hid = 1 << 32;

/// The value of a property stored in a [`MemoryEngine`] property list.
#[derive(Clone, Debug, PartialEq)]
pub enum PropertyValue {
    /// A flag.
    Bool(bool),
    /// An unsigned integer.
    UInt(u64),
    /// A shape.
    Shape(Vec<u64>),
    /// A file space strategy.
    FileSpaceStrategy {
        /// The strategy.
        strategy: FileSpaceStrategyKind,
        /// Whether free space is persisted.
        persist: bool,
        /// The smallest free-space section size tracked.
        threshold: u64,
    },
    /// A page buffer configuration.
    PageBuffer {
        /// The buffer size in bytes.
        size: usize,
        /// The minimum percentage of metadata pages.
        min_meta_percent: u32,
        /// The minimum percentage of raw data pages.
        min_raw_percent: u32,
    },
    /// Estimated link information.
    LinkInfo {
        /// The estimated number of links.
        entries: u32,
        /// The estimated average link name length.
        name_length: u32,
    },
    /// A chunk cache configuration.
    ChunkCache {
        /// The number of hash table slots.
        slots: usize,
        /// The cache size in bytes.
        bytes: usize,
        /// The preemption policy weight.
        preemption: f64,
    },
    /// An allocation time.
    AllocTime(AllocTimeKind),
    /// A storage layout.
    Layout(LayoutKind),
    /// A parallel transfer mode.
    TransferMode(TransferMode),
}

/// A filter in a [`MemoryEngine`] filter pipeline.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FilterRecord {
    /// The filter.
    pub filter: FilterKind,
    /// The filter parameters.
    pub client_data: Vec<u32>,
}

/// Operation counters of a [`MemoryEngine`].
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct MemoryEngineStatistics {
    /// The number of property lists created.
    pub plists_created: usize,
    /// The number of dataset read calls.
    pub reads: usize,
    /// The number of dataset write calls.
    pub writes: usize,
    /// The number of successful [`Engine::free_memory`] calls.
    pub frees: usize,
    /// The number of successful [`Engine::close`] calls.
    pub closes: usize,
}

#[derive(Debug)]
struct PropertyListRecord {
    class: PropertyListClass,
    properties: BTreeMap<&'static str, PropertyValue>,
    filters: Vec<FilterRecord>,
}

#[derive(Debug)]
enum DatasetValues {
    Fixed(Vec<u8>),
    Text(Vec<Option<String>>),
}

#[derive(Debug)]
struct DatasetRecord {
    datatype: Datatype,
    space: DataSpace,
    properties: BTreeMap<&'static str, PropertyValue>,
    filters: Vec<FilterRecord>,
    values: DatasetValues,
}

#[derive(Debug)]
enum Object {
    PropertyList(PropertyListRecord),
    Dataset(String),
}

#[derive(Debug)]
struct MemoryEngineState {
    next_id: Hid,
    objects: BTreeMap<Hid, Object>,
    datasets: BTreeMap<String, DatasetRecord>,
    disabled_classes: BTreeSet<PropertyListClass>,
    /// Addresses of strings handed out by reads and not yet freed.
    allocations: HashSet<usize>,
    statistics: MemoryEngineStatistics,
    fail_transfers: bool,
    last_error: Option<String>,
}

impl MemoryEngineState {
    fn fail(&mut self, message: impl Into<String>) -> Status {
        let message = message.into();
        log::debug!("memory engine: {message}");
        self.last_error = Some(message);
        -1
    }

    fn insert_object(&mut self, object: Object) -> Hid {
        let id = self.next_id;
        self.next_id += 1;
        self.objects.insert(id, object);
        id
    }

    fn property_list(&self, plist: Hid) -> Option<&PropertyListRecord> {
        match self.objects.get(&plist) {
            Some(Object::PropertyList(list)) => Some(list),
            _ => None,
        }
    }

    fn property_list_mut(
        &mut self,
        plist: Hid,
        property: &str,
        accepted: &[PropertyListClass],
    ) -> Result<&mut PropertyListRecord, Status> {
        let Some(class) = self.property_list(plist).map(|list| list.class) else {
            return Err(self.fail(format!("identifier {plist} is not a property list")));
        };
        if !accepted.contains(&class) {
            return Err(self.fail(format!(
                "property `{property}` cannot be set on a {class} property list"
            )));
        }
        if let Some(Object::PropertyList(list)) = self.objects.get_mut(&plist) {
            Ok(list)
        } else {
            Err(-1)
        }
    }

    /// Check that `plist` is either the default or a live list of `class`.
    fn check_plist_class(&mut self, plist: Hid, class: PropertyListClass) -> Result<(), Status> {
        if plist == PLIST_DEFAULT {
            return Ok(());
        }
        match self.property_list(plist).map(|list| list.class) {
            Some(found) if found == class => Ok(()),
            Some(found) => Err(self.fail(format!(
                "expected a {class} property list, got a {found} property list"
            ))),
            None => Err(self.fail(format!("identifier {plist} is not a property list"))),
        }
    }

    fn dataset_name(&self, dataset: Hid) -> Option<&str> {
        match self.objects.get(&dataset) {
            Some(Object::Dataset(name)) => Some(name),
            _ => None,
        }
    }
}

/// A synchronous in-memory engine.
///
/// Every operation of the [`Engine`] traits is implemented, with the same validation a native engine
/// performs. Strings returned by text reads are tracked until they are released with
/// [`Engine::free_memory`], so leaks and double frees are observable through
/// [`MemoryEngine::outstanding_allocations`] and [`MemoryEngine::statistics`].
#[derive(Debug)]
pub struct MemoryEngine {
    capabilities: EngineCapabilities,
    state: Mutex<MemoryEngineState>,
}

impl Default for MemoryEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryEngine {
    /// Create a new memory engine with every filter available and without parallel support.
    #[must_use]
    pub fn new() -> Self {
        Self::with_capabilities(EngineCapabilities::new(
            EngineVersion::new(1, 14, 3),
            false,
            [
                FilterKind::Deflate,
                FilterKind::Szip,
                FilterKind::Shuffle,
                FilterKind::Fletcher32,
            ],
        ))
    }

    /// Create a new memory engine with the given capabilities.
    #[must_use]
    pub fn with_capabilities(capabilities: EngineCapabilities) -> Self {
        Self {
            capabilities,
            state: Mutex::new(MemoryEngineState {
                next_id: 1,
                objects: BTreeMap::new(),
                datasets: BTreeMap::new(),
                disabled_classes: BTreeSet::new(),
                allocations: HashSet::new(),
                statistics: MemoryEngineStatistics::default(),
                fail_transfers: false,
                last_error: None,
            }),
        }
    }

    /// Stop supporting property lists of `class`.
    pub fn disable_class(&self, class: PropertyListClass) {
        self.state.lock().disabled_classes.insert(class);
    }

    /// Make every subsequent dataset read and write fail (or succeed again).
    pub fn set_fail_transfers(&self, fail: bool) {
        self.state.lock().fail_transfers = fail;
    }

    /// Return the operation counters.
    #[must_use]
    pub fn statistics(&self) -> MemoryEngineStatistics {
        self.state.lock().statistics
    }

    /// Return the number of strings returned by reads that have not been freed.
    #[must_use]
    pub fn outstanding_allocations(&self) -> usize {
        self.state.lock().allocations.len()
    }

    /// Return the number of live objects (property lists and open datasets).
    #[must_use]
    pub fn live_objects(&self) -> usize {
        self.state.lock().objects.len()
    }

    /// Return the class of a live property list.
    #[must_use]
    pub fn plist_class(&self, plist: Hid) -> Option<PropertyListClass> {
        self.state.lock().property_list(plist).map(|list| list.class)
    }

    /// Return the value of `property` in a live property list.
    #[must_use]
    pub fn plist_property(&self, plist: Hid, property: &str) -> Option<PropertyValue> {
        self.state
            .lock()
            .property_list(plist)
            .and_then(|list| list.properties.get(property).cloned())
    }

    /// Return the filter pipeline of a live property list.
    #[must_use]
    pub fn plist_filters(&self, plist: Hid) -> Option<Vec<FilterRecord>> {
        self.state
            .lock()
            .property_list(plist)
            .map(|list| list.filters.clone())
    }

    /// Return the value of a creation `property` of the dataset called `name`.
    #[must_use]
    pub fn dataset_property(&self, name: &str, property: &str) -> Option<PropertyValue> {
        self.state
            .lock()
            .datasets
            .get(name)
            .and_then(|dataset| dataset.properties.get(property).cloned())
    }

    /// Return the filter pipeline of the dataset called `name`.
    #[must_use]
    pub fn dataset_filters(&self, name: &str) -> Option<Vec<FilterRecord>> {
        self.state
            .lock()
            .datasets
            .get(name)
            .map(|dataset| dataset.filters.clone())
    }

    fn set_property(
        &self,
        plist: Hid,
        property: &'static str,
        accepted: &[PropertyListClass],
        value: PropertyValue,
    ) -> Status {
        let mut state = self.state.lock();
        match state.property_list_mut(plist, property, accepted) {
            Ok(list) => {
                list.properties.insert(property, value);
                0
            }
            Err(status) => status,
        }
    }

    fn append_filter(&self, plist: Hid, filter: FilterKind, client_data: Vec<u32>) -> Status {
        let mut state = self.state.lock();
        if !self.capabilities.has_filter(filter) {
            return state.fail(format!("the {filter} filter is not available"));
        }
        match state.property_list_mut(plist, "filters", &[Class::DatasetCreate]) {
            Ok(list) => {
                list.filters.push(FilterRecord {
                    filter,
                    client_data,
                });
                0
            }
            Err(status) => status,
        }
    }

    fn require_parallel(&self, operation: &str) -> Result<(), Status> {
        if self.capabilities.parallel() {
            Ok(())
        } else {
            Err(self
                .state
                .lock()
                .fail(format!("{operation} requires a parallel engine")))
        }
    }
}

/// Copy the elements selected in `space` out of `values`, `width` items per element, in C order.
fn gather<T: Clone>(values: &[T], space: &DataSpace, width: usize) -> Vec<T> {
    let mut gathered = Vec::new();
    for (start, length) in space.contiguous_runs() {
        let start = to_usize(start) * width;
        let end = start + to_usize(length) * width;
        gathered.extend_from_slice(&values[start..end]);
    }
    gathered
}

/// Copy `source` into the elements selected in `space` of `values`, `width` items per element.
fn scatter<T: Clone>(values: &mut [T], space: &DataSpace, width: usize, source: &[T]) {
    let mut consumed = 0;
    for (start, length) in space.contiguous_runs() {
        let start = to_usize(start) * width;
        let length = to_usize(length) * width;
        values[start..start + length].clone_from_slice(&source[consumed..consumed + length]);
        consumed += length;
    }
}

fn to_usize(value: u64) -> usize {
    usize::try_from(value).unwrap_or(usize::MAX)
}

/// The validated participants of a transfer.
struct TransferPlan<'a> {
    name: String,
    /// Number of items in the memory buffer.
    buffer_items: usize,
    width: usize,
    mem_space: Option<&'a DataSpace>,
}

impl MemoryEngineState {
    fn plan_transfer<'a>(
        &mut self,
        dataset: Hid,
        mem_type: Datatype,
        mem_space: Option<&'a DataSpace>,
        file_space: &DataSpace,
        dxpl: Hid,
        text_buffer: bool,
    ) -> Result<TransferPlan<'a>, Status> {
        if self.fail_transfers {
            return Err(self.fail("transfer failure injected"));
        }
        let Some(name) = self.dataset_name(dataset).map(str::to_string) else {
            return Err(self.fail(format!("identifier {dataset} is not a dataset")));
        };
        self.check_plist_class(dxpl, Class::DatasetTransfer)?;
        let Some(record) = self.datasets.get(&name) else {
            return Err(self.fail(format!("dataset {name} no longer exists")));
        };
        let datatype = record.datatype;
        let dims = record.space.dimensions().to_vec();
        if datatype != mem_type {
            return Err(self.fail(format!(
                "no conversion path from {mem_type} to {datatype} for dataset {name}"
            )));
        }
        if datatype.is_variable_length() != text_buffer {
            return Err(self.fail(format!(
                "transfer buffer kind does not match the {datatype} elements of dataset {name}"
            )));
        }
        if file_space.dimensions() != dims.as_slice() {
            return Err(self.fail(format!(
                "file space extent {:?} does not match dataset {name} extent {dims:?}",
                file_space.dimensions()
            )));
        }
        if let Some(mem_space) = mem_space
            && mem_space.num_selected() != file_space.num_selected()
        {
            return Err(self.fail(format!(
                "memory selection of {} elements does not match file selection of {} elements",
                mem_space.num_selected(),
                file_space.num_selected()
            )));
        }
        let width = datatype.fixed_size().unwrap_or(1);
        let buffer_elements = mem_space.map_or_else(
            || file_space.num_selected(),
            DataSpace::num_elements,
        );
        Ok(TransferPlan {
            name,
            buffer_items: to_usize(buffer_elements).saturating_mul(width),
            width,
            mem_space,
        })
    }
}

impl PropertyEngine for MemoryEngine {
    fn plist_class_id(&self, class: PropertyListClass) -> Hid {
        let mut state = self.state.lock();
        if state.disabled_classes.contains(&class) {
            return Hid::from(state.fail(format!("the {class} property list class is unsupported")));
        }
        let index = Class::ALL
            .iter()
            .position(|candidate| *candidate == class)
            .unwrap_or_default();
        CLASS_ID_BASE + Hid::try_from(index).unwrap_or_default()
    }

    fn plist_create(&self, class_id: Hid) -> Hid {
        let mut state = self.state.lock();
        let class = class_id
            .checked_sub(CLASS_ID_BASE)
            .and_then(|index| usize::try_from(index).ok())
            .and_then(|index| Class::ALL.get(index).copied());
        let Some(class) = class else {
            return Hid::from(state.fail(format!("{class_id} is not a property list class")));
        };
        if state.disabled_classes.contains(&class) {
            return Hid::from(state.fail(format!("the {class} property list class is unsupported")));
        }
        state.statistics.plists_created += 1;
        state.insert_object(Object::PropertyList(PropertyListRecord {
            class,
            properties: BTreeMap::new(),
            filters: Vec::new(),
        }))
    }

    fn set_file_space_strategy(
        &self,
        plist: Hid,
        strategy: FileSpaceStrategyKind,
        persist: bool,
        threshold: u64,
    ) -> Status {
        self.set_property(
            plist,
            "file_space_strategy",
            &[Class::FileCreate],
            PropertyValue::FileSpaceStrategy {
                strategy,
                persist,
                threshold,
            },
        )
    }

    fn set_file_space_page_size(&self, plist: Hid, page_size: u64) -> Status {
        if page_size < 512 {
            return self
                .state
                .lock()
                .fail(format!("file space page size {page_size} is below 512"));
        }
        self.set_property(
            plist,
            "file_space_page_size",
            &[Class::FileCreate],
            PropertyValue::UInt(page_size),
        )
    }

    fn set_page_buffer_size(
        &self,
        plist: Hid,
        buffer_size: usize,
        min_meta_percent: u32,
        min_raw_percent: u32,
    ) -> Status {
        if min_meta_percent + min_raw_percent > 100 {
            return self.state.lock().fail(format!(
                "page buffer minimum percentages {min_meta_percent} and {min_raw_percent} exceed 100"
            ));
        }
        self.set_property(
            plist,
            "page_buffer_size",
            &[Class::FileAccess],
            PropertyValue::PageBuffer {
                size: buffer_size,
                min_meta_percent,
                min_raw_percent,
            },
        )
    }

    fn set_all_coll_metadata_ops(&self, plist: Hid, collective: bool) -> Status {
        if let Err(status) = self.require_parallel("collective metadata reads") {
            return status;
        }
        self.set_property(
            plist,
            "all_coll_metadata_ops",
            &[
                Class::FileAccess,
                Class::GroupAccess,
                Class::DatasetAccess,
                Class::DatatypeAccess,
                Class::LinkAccess,
            ],
            PropertyValue::Bool(collective),
        )
    }

    fn set_coll_metadata_write(&self, plist: Hid, collective: bool) -> Status {
        if let Err(status) = self.require_parallel("collective metadata writes") {
            return status;
        }
        self.set_property(
            plist,
            "coll_metadata_write",
            &[Class::FileAccess],
            PropertyValue::Bool(collective),
        )
    }

    fn set_est_link_info(&self, plist: Hid, entries: u32, name_length: u32) -> Status {
        self.set_property(
            plist,
            "est_link_info",
            &[Class::GroupCreate],
            PropertyValue::LinkInfo {
                entries,
                name_length,
            },
        )
    }

    fn set_chunk(&self, plist: Hid, dims: &[u64]) -> Status {
        if dims.is_empty() || dims.contains(&0) {
            return self
                .state
                .lock()
                .fail(format!("invalid chunk shape {dims:?}"));
        }
        let mut state = self.state.lock();
        match state.property_list_mut(plist, "chunk", &[Class::DatasetCreate]) {
            Ok(list) => {
                list.properties
                    .insert("chunk", PropertyValue::Shape(dims.to_vec()));
                list.properties
                    .insert("layout", PropertyValue::Layout(LayoutKind::Chunked));
                0
            }
            Err(status) => status,
        }
    }

    fn set_layout(&self, plist: Hid, layout: LayoutKind) -> Status {
        self.set_property(
            plist,
            "layout",
            &[Class::DatasetCreate],
            PropertyValue::Layout(layout),
        )
    }

    fn filter_avail(&self, filter: FilterKind) -> bool {
        self.capabilities.has_filter(filter)
    }

    fn set_deflate(&self, plist: Hid, level: u32) -> Status {
        if level > 9 {
            return self
                .state
                .lock()
                .fail(format!("deflate level {level} is not in 0..=9"));
        }
        self.append_filter(plist, FilterKind::Deflate, vec![level])
    }

    fn set_szip(&self, plist: Hid, options_mask: u32, pixels_per_block: u32) -> Status {
        if pixels_per_block == 0 || pixels_per_block > 32 || !pixels_per_block.is_multiple_of(2) {
            return self.state.lock().fail(format!(
                "szip pixels per block {pixels_per_block} must be even and in 2..=32"
            ));
        }
        self.append_filter(
            plist,
            FilterKind::Szip,
            vec![options_mask, pixels_per_block],
        )
    }

    fn set_shuffle(&self, plist: Hid) -> Status {
        self.append_filter(plist, FilterKind::Shuffle, Vec::new())
    }

    fn set_fletcher32(&self, plist: Hid) -> Status {
        self.append_filter(plist, FilterKind::Fletcher32, Vec::new())
    }

    fn set_alloc_time(&self, plist: Hid, alloc_time: AllocTimeKind) -> Status {
        self.set_property(
            plist,
            "alloc_time",
            &[Class::DatasetCreate],
            PropertyValue::AllocTime(alloc_time),
        )
    }

    fn set_chunk_cache(&self, plist: Hid, slots: usize, bytes: usize, preemption: f64) -> Status {
        if !(0.0..=1.0).contains(&preemption) {
            return self
                .state
                .lock()
                .fail(format!("chunk cache preemption {preemption} is not in [0, 1]"));
        }
        self.set_property(
            plist,
            "chunk_cache",
            &[Class::DatasetAccess],
            PropertyValue::ChunkCache {
                slots,
                bytes,
                preemption,
            },
        )
    }

    fn set_create_intermediate_group(&self, plist: Hid, create: bool) -> Status {
        self.set_property(
            plist,
            "create_intermediate_group",
            &[Class::LinkCreate],
            PropertyValue::Bool(create),
        )
    }

    fn set_dxpl_mpio(&self, plist: Hid, mode: TransferMode) -> Status {
        if let Err(status) = self.require_parallel("collective transfers") {
            return status;
        }
        self.set_property(
            plist,
            "dxpl_mpio",
            &[Class::DatasetTransfer],
            PropertyValue::TransferMode(mode),
        )
    }
}

impl DatasetEngine for MemoryEngine {
    fn dataset_create(
        &self,
        name: &str,
        datatype: Datatype,
        space: &DataSpace,
        dcpl: Hid,
        dapl: Hid,
    ) -> Hid {
        let mut state = self.state.lock();
        if state.datasets.contains_key(name) {
            return Hid::from(state.fail(format!("dataset {name} already exists")));
        }
        if let Err(status) = state.check_plist_class(dcpl, Class::DatasetCreate) {
            return Hid::from(status);
        }
        if let Err(status) = state.check_plist_class(dapl, Class::DatasetAccess) {
            return Hid::from(status);
        }
        let (properties, filters) = state
            .property_list(dcpl)
            .map(|list| (list.properties.clone(), list.filters.clone()))
            .unwrap_or_default();

        let chunked = matches!(
            properties.get("layout"),
            Some(PropertyValue::Layout(LayoutKind::Chunked))
        );
        if let Some(PropertyValue::Shape(chunk)) = properties.get("chunk")
            && chunk.len() != space.rank()
        {
            return Hid::from(state.fail(format!(
                "chunk rank {} does not match dataset rank {}",
                chunk.len(),
                space.rank()
            )));
        }
        if chunked && !properties.contains_key("chunk") {
            return Hid::from(state.fail(format!(
                "dataset {name} has a chunked layout without a chunk shape"
            )));
        }
        if space.is_resizable() && !chunked {
            return Hid::from(state.fail(format!(
                "dataset {name} has a resizable extent and must be chunked"
            )));
        }
        if !filters.is_empty() && !chunked {
            return Hid::from(state.fail(format!(
                "dataset {name} has filters and must be chunked"
            )));
        }

        let num_elements = to_usize(space.num_elements());
        let values = match datatype.fixed_size() {
            Some(size) => DatasetValues::Fixed(vec![0; num_elements.saturating_mul(size)]),
            None => DatasetValues::Text(vec![None; num_elements]),
        };
        let mut extent = space.clone();
        extent.select_all();
        state.datasets.insert(
            name.to_string(),
            DatasetRecord {
                datatype,
                space: extent,
                properties,
                filters,
                values,
            },
        );
        log::trace!("memory engine: created dataset {name} of {datatype}");
        state.insert_object(Object::Dataset(name.to_string()))
    }

    fn dataset_open(&self, name: &str, dapl: Hid) -> Hid {
        let mut state = self.state.lock();
        if let Err(status) = state.check_plist_class(dapl, Class::DatasetAccess) {
            return Hid::from(status);
        }
        if !state.datasets.contains_key(name) {
            return Hid::from(state.fail(format!("dataset {name} does not exist")));
        }
        state.insert_object(Object::Dataset(name.to_string()))
    }

    fn dataset_extent(
        &self,
        dataset: Hid,
        dims: &mut Vec<u64>,
        max_dims: &mut Vec<u64>,
    ) -> Status {
        let mut state = self.state.lock();
        let record = state
            .dataset_name(dataset)
            .and_then(|name| state.datasets.get(name));
        if let Some(record) = record {
            *dims = record.space.dimensions().to_vec();
            *max_dims = record.space.max_dimensions().to_vec();
            0
        } else {
            state.fail(format!("identifier {dataset} is not a dataset"))
        }
    }

    fn dataset_datatype(&self, dataset: Hid, datatype: &mut Option<Datatype>) -> Status {
        let mut state = self.state.lock();
        let record = state
            .dataset_name(dataset)
            .and_then(|name| state.datasets.get(name));
        if let Some(record) = record {
            *datatype = Some(record.datatype);
            0
        } else {
            state.fail(format!("identifier {dataset} is not a dataset"))
        }
    }

    fn dataset_read(
        &self,
        dataset: Hid,
        mem_type: Datatype,
        mem_space: Option<&DataSpace>,
        file_space: &DataSpace,
        dxpl: Hid,
        buffer: TransferBufferMut<'_>,
    ) -> Status {
        let mut state = self.state.lock();
        state.statistics.reads += 1;
        let text_buffer = matches!(buffer, TransferBufferMut::Text(_));
        let plan = match state.plan_transfer(
            dataset,
            mem_type,
            mem_space,
            file_space,
            dxpl,
            text_buffer,
        ) {
            Ok(plan) => plan,
            Err(status) => return status,
        };
        if buffer.len() != plan.buffer_items {
            return state.fail(format!(
                "read buffer holds {} items, expected {}",
                buffer.len(),
                plan.buffer_items
            ));
        }
        log::trace!(
            "memory engine: reading {} elements from dataset {}",
            file_space.num_selected(),
            plan.name
        );

        let state = &mut *state;
        let Some(record) = state.datasets.get(&plan.name) else {
            return -1;
        };
        match (&record.values, buffer) {
            (DatasetValues::Fixed(values), TransferBufferMut::Fixed(bytes)) => {
                let gathered = gather(values, file_space, plan.width);
                match plan.mem_space {
                    Some(mem_space) => scatter(bytes, mem_space, plan.width, &gathered),
                    None => bytes.copy_from_slice(&gathered),
                }
                0
            }
            (DatasetValues::Text(values), TransferBufferMut::Text(slots)) => {
                let pointers: Vec<*mut c_char> = gather(values, file_space, 1)
                    .into_iter()
                    .map(|value| {
                        value
                            .and_then(|value| CString::new(value).ok())
                            .map_or(std::ptr::null_mut(), |value| {
                                let pointer = value.into_raw();
                                state.allocations.insert(pointer.addr());
                                pointer
                            })
                    })
                    .collect();
                match plan.mem_space {
                    Some(mem_space) => scatter(slots, mem_space, 1, &pointers),
                    None => slots.copy_from_slice(&pointers),
                }
                0
            }
            // buffer kinds are checked when planning
            _ => -1,
        }
    }

    fn dataset_write(
        &self,
        dataset: Hid,
        mem_type: Datatype,
        mem_space: Option<&DataSpace>,
        file_space: &DataSpace,
        dxpl: Hid,
        buffer: TransferBuffer<'_>,
    ) -> Status {
        let mut state = self.state.lock();
        state.statistics.writes += 1;
        let text_buffer = matches!(buffer, TransferBuffer::Text(_));
        let plan = match state.plan_transfer(
            dataset,
            mem_type,
            mem_space,
            file_space,
            dxpl,
            text_buffer,
        ) {
            Ok(plan) => plan,
            Err(status) => return status,
        };
        if buffer.len() != plan.buffer_items {
            return state.fail(format!(
                "write buffer holds {} items, expected {}",
                buffer.len(),
                plan.buffer_items
            ));
        }
        if let TransferBuffer::Text(strings) = &buffer
            && strings.iter().any(|string| string.contains('\0'))
        {
            return state.fail("strings with interior NUL bytes cannot be stored");
        }
        log::trace!(
            "memory engine: writing {} elements to dataset {}",
            file_space.num_selected(),
            plan.name
        );

        let state = &mut *state;
        let Some(record) = state.datasets.get_mut(&plan.name) else {
            return -1;
        };
        match (&mut record.values, buffer) {
            (DatasetValues::Fixed(values), TransferBuffer::Fixed(bytes)) => {
                let dense = match plan.mem_space {
                    Some(mem_space) => gather(bytes, mem_space, plan.width),
                    None => bytes.to_vec(),
                };
                scatter(values, file_space, plan.width, &dense);
                0
            }
            (DatasetValues::Text(values), TransferBuffer::Text(strings)) => {
                let strings: Vec<Option<String>> = strings
                    .into_iter()
                    .map(|string| Some(string.to_string()))
                    .collect();
                let dense = match plan.mem_space {
                    Some(mem_space) => gather(&strings, mem_space, 1),
                    None => strings,
                };
                scatter(values, file_space, 1, &dense);
                0
            }
            _ => -1,
        }
    }
}

impl Engine for MemoryEngine {
    fn capabilities(&self) -> EngineCapabilities {
        self.capabilities.clone()
    }

    fn close(&self, id: Hid) -> Status {
        let mut state = self.state.lock();
        if state.objects.remove(&id).is_some() {
            state.statistics.closes += 1;
            0
        } else {
            state.fail(format!("identifier {id} is not open"))
        }
    }

    unsafe fn free_memory(&self, ptr: *mut c_char) -> Status {
        let mut state = self.state.lock();
        if ptr.is_null() {
            return 0;
        }
        if !state.allocations.remove(&ptr.addr()) {
            return state.fail(format!(
                "{ptr:?} was not allocated by this engine or was already freed"
            ));
        }
        // SAFETY: `ptr` was produced by `CString::into_raw` in a read and has not been freed
        drop(unsafe { CString::from_raw(ptr) });
        state.statistics.frees += 1;
        0
    }

    fn last_error_message(&self) -> Option<String> {
        self.state.lock().last_error.clone()
    }
}

impl Drop for MemoryEngine {
    fn drop(&mut self) {
        let state = self.state.get_mut();
        if !state.allocations.is_empty() {
            log::warn!(
                "memory engine dropped with {} unreleased string allocations",
                state.allocations.len()
            );
        }
    }
}
