use highslab_engine::PropertyListClass;

/// A property list category.
///
/// Every category maps to exactly one engine [`PropertyListClass`].
pub trait PropertyCategory {
    /// The engine class of property lists of this category.
    const CLASS: PropertyListClass;
}

macro_rules! property_category {
    ($category:ident, $alias:ident, $doc:literal) => {
        #[doc = concat!("The ", $doc, " property list category.")]
        #[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
        pub struct $category;

        impl PropertyCategory for $category {
            const CLASS: PropertyListClass = PropertyListClass::$category;
        }

        #[doc = concat!("Properties for ", $doc, ".")]
        pub type $alias = super::PropertyList<$category>;
    };
}

property_category!(ObjectCreate, ObjectCreateProps, "object creation");
property_category!(FileCreate, FileCreateProps, "file creation");
property_category!(FileAccess, FileAccessProps, "file access");
property_category!(DatasetCreate, DatasetCreateProps, "dataset creation");
property_category!(DatasetAccess, DatasetAccessProps, "dataset access");
property_category!(DatasetTransfer, DatasetTransferProps, "dataset transfer");
property_category!(GroupCreate, GroupCreateProps, "group creation");
property_category!(GroupAccess, GroupAccessProps, "group access");
property_category!(DatatypeCreate, DatatypeCreateProps, "datatype creation");
property_category!(DatatypeAccess, DatatypeAccessProps, "datatype access");
property_category!(StringCreate, StringCreateProps, "string creation");
property_category!(AttributeCreate, AttributeCreateProps, "attribute creation");
property_category!(ObjectCopy, ObjectCopyProps, "object copy");
property_category!(LinkCreate, LinkCreateProps, "link creation");
property_category!(LinkAccess, LinkAccessProps, "link access");
