//! Vocabulary accepted by the property list setters of an [`Engine`](crate::Engine).

use derive_more::Display;

/// A property list class.
///
/// Every property list is created from exactly one class, which determines the setters it accepts.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Display)]
pub enum PropertyListClass {
    /// Properties for object creation.
    #[display("object create")]
    ObjectCreate,
    /// Properties for file creation.
    #[display("file create")]
    FileCreate,
    /// Properties for file access.
    #[display("file access")]
    FileAccess,
    /// Properties for dataset creation.
    #[display("dataset create")]
    DatasetCreate,
    /// Properties for dataset access.
    #[display("dataset access")]
    DatasetAccess,
    /// Properties for raw data transfer.
    #[display("dataset transfer")]
    DatasetTransfer,
    /// Properties for group creation.
    #[display("group create")]
    GroupCreate,
    /// Properties for group access.
    #[display("group access")]
    GroupAccess,
    /// Properties for datatype creation.
    #[display("datatype create")]
    DatatypeCreate,
    /// Properties for datatype access.
    #[display("datatype access")]
    DatatypeAccess,
    /// Properties for character encoding.
    #[display("string create")]
    StringCreate,
    /// Properties for attribute creation.
    #[display("attribute create")]
    AttributeCreate,
    /// Properties for object copying.
    #[display("object copy")]
    ObjectCopy,
    /// Properties for link creation.
    #[display("link create")]
    LinkCreate,
    /// Properties for link traversal.
    #[display("link access")]
    LinkAccess,
}

impl PropertyListClass {
    /// All property list classes.
    pub const ALL: [Self; 15] = [
        Self::ObjectCreate,
        Self::FileCreate,
        Self::FileAccess,
        Self::DatasetCreate,
        Self::DatasetAccess,
        Self::DatasetTransfer,
        Self::GroupCreate,
        Self::GroupAccess,
        Self::DatatypeCreate,
        Self::DatatypeAccess,
        Self::StringCreate,
        Self::AttributeCreate,
        Self::ObjectCopy,
        Self::LinkCreate,
        Self::LinkAccess,
    ];
}

/// A file space management strategy.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Default, Display)]
pub enum FileSpaceStrategyKind {
    /// Free-space managers, aggregators and virtual file driver.
    #[default]
    #[display("fsm_aggr")]
    FsmAggr,
    /// Paged aggregation.
    #[display("page")]
    Page,
    /// Aggregators and virtual file driver.
    #[display("aggr")]
    Aggr,
    /// Virtual file driver only.
    #[display("none")]
    None,
}

/// When storage space is allocated for a dataset.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Default, Display)]
pub enum AllocTimeKind {
    /// The engine default for the storage layout.
    #[default]
    #[display("default")]
    Default,
    /// Allocate all space when the dataset is created.
    #[display("early")]
    Early,
    /// Allocate all space when data is first written.
    #[display("late")]
    Late,
    /// Allocate space incrementally as data is written.
    #[display("incremental")]
    Incremental,
}

/// The raw data storage layout of a dataset.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Default, Display)]
pub enum LayoutKind {
    /// Raw data is stored in the object header.
    #[display("compact")]
    Compact,
    /// Raw data is stored contiguously.
    #[default]
    #[display("contiguous")]
    Contiguous,
    /// Raw data is stored in fixed-size chunks.
    #[display("chunked")]
    Chunked,
}

/// A filter that may be applied to chunked raw data.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Display)]
pub enum FilterKind {
    /// The deflate (zlib) compression filter.
    #[display("deflate")]
    Deflate,
    /// The szip compression filter.
    #[display("szip")]
    Szip,
    /// The byte shuffle filter.
    #[display("shuffle")]
    Shuffle,
    /// The fletcher32 checksum filter.
    #[display("fletcher32")]
    Fletcher32,
}

/// The mode of a parallel raw data transfer.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Default, Display)]
pub enum TransferMode {
    /// Each process transfers independently.
    #[default]
    #[display("independent")]
    Independent,
    /// All processes take part in a barrier-synchronised transfer.
    #[display("collective")]
    Collective,
}
