//! Property lists.
//!
//! A [`PropertyList`] accumulates [`ConfigOption`]s of one [`PropertyCategory`] on a single engine
//! property list. The engine property list is created lazily by the first [`PropertyList::add`];
//! until then [`PropertyList::id`] is [`PLIST_DEFAULT`], which requests the engine defaults.
//!
//! Options are applied immediately and never rolled back: if an option fails to apply, every
//! option added before it remains in effect.

mod category;

use std::{marker::PhantomData, sync::Arc};

pub use category::{
    AttributeCreate, AttributeCreateProps, DatasetAccess, DatasetAccessProps, DatasetCreate,
    DatasetCreateProps, DatasetTransfer, DatasetTransferProps, DatatypeAccess,
    DatatypeAccessProps, DatatypeCreate, DatatypeCreateProps, FileAccess, FileAccessProps,
    FileCreate, FileCreateProps, GroupAccess, GroupAccessProps, GroupCreate, GroupCreateProps,
    LinkAccess, LinkAccessProps, LinkCreate, LinkCreateProps, ObjectCopy, ObjectCopyProps,
    ObjectCreate, ObjectCreateProps, PropertyCategory, StringCreate, StringCreateProps,
};
use derive_more::{Deref, DerefMut};
use highslab_engine::{Engine, Hid, PLIST_DEFAULT, PropertyEngine, Status, is_failure};

use crate::{Error, PropertyError, handle::Handle};

/// A configuration option that can be applied to a property list.
pub trait ConfigOption {
    /// Apply the option to the engine property list `plist`.
    ///
    /// # Errors
    /// Returns a [`PropertyError`](crate::PropertyError) if the engine rejects the option, or a
    /// [`CapabilityError`](crate::CapabilityError) if the engine lacks a capability the option requires.
    fn apply(&self, engine: &dyn Engine, plist: Hid) -> Result<(), Error>;
}

/// A property list of category `C`.
pub struct PropertyList<C: PropertyCategory> {
    engine: Arc<dyn Engine>,
    handle: Option<Handle>,
    _category: PhantomData<C>,
}

impl<C: PropertyCategory> std::fmt::Debug for PropertyList<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PropertyList")
            .field("class", &C::CLASS)
            .field("handle", &self.handle)
            .finish_non_exhaustive()
    }
}

impl<C: PropertyCategory> PropertyList<C> {
    /// Create a new, unrealized, property list for `engine`.
    #[must_use]
    pub fn new(engine: &Arc<dyn Engine>) -> Self {
        Self {
            engine: engine.clone(),
            handle: None,
            _category: PhantomData,
        }
    }

    /// The engine property list identifier, or [`PLIST_DEFAULT`] if no option has been added.
    #[must_use]
    pub fn id(&self) -> Hid {
        self.handle.as_ref().map_or(PLIST_DEFAULT, Handle::id)
    }

    /// Returns true if the engine property list has been created.
    #[must_use]
    pub fn is_realized(&self) -> bool {
        self.handle.is_some()
    }

    /// The engine of the property list.
    #[must_use]
    pub fn engine(&self) -> &Arc<dyn Engine> {
        &self.engine
    }

    /// Apply `option` to the property list, creating the engine property list if necessary.
    ///
    /// # Errors
    /// Returns a [`PropertyError`] if the engine property list cannot be created, or the error of
    /// [`ConfigOption::apply`].
    pub fn add(&mut self, option: &impl ConfigOption) -> Result<(), Error> {
        let plist = self.realize()?;
        option.apply(self.engine.as_ref(), plist)
    }

    /// Create the engine property list if it does not exist yet and return its identifier.
    fn realize(&mut self) -> Result<Hid, PropertyError> {
        if let Some(handle) = &self.handle {
            return Ok(handle.id());
        }
        let class_id = self.engine.plist_class_id(C::CLASS);
        if class_id < 0 {
            return Err(PropertyError::from_engine(
                self.engine.as_ref(),
                "Unsupported property list type",
            ));
        }
        let plist = self.engine.plist_create(class_id);
        if plist < 0 {
            return Err(PropertyError::from_engine(
                self.engine.as_ref(),
                "Unable to create property list",
            ));
        }
        log::debug!("created {} property list {plist}", C::CLASS);
        self.handle = Some(Handle::new(self.engine.clone(), plist));
        Ok(plist)
    }
}

/// A property list accepting arbitrary engine setters.
///
/// Dereferences to the underlying [`PropertyList`], so typed options can be mixed with raw setters.
#[derive(Debug, Deref, DerefMut)]
pub struct RawPropertyList<C: PropertyCategory>(PropertyList<C>);

impl<C: PropertyCategory> RawPropertyList<C> {
    /// Create a new, unrealized, raw property list for `engine`.
    #[must_use]
    pub fn new(engine: &Arc<dyn Engine>) -> Self {
        Self(PropertyList::new(engine))
    }

    /// Call the engine setter `setter` with the property list identifier and `args`, creating the
    /// engine property list if necessary.
    ///
    /// # Errors
    /// Returns a [`PropertyError`] if the engine property list cannot be created or `setter` returns a
    /// failure status.
    pub fn add<A>(
        &mut self,
        setter: impl FnOnce(&dyn Engine, Hid, A) -> Status,
        args: A,
    ) -> Result<(), PropertyError> {
        let plist = self.0.realize()?;
        let engine = self.0.engine.as_ref();
        if is_failure(setter(engine, plist, args)) {
            return Err(PropertyError::from_engine(
                engine,
                "Error setting raw property",
            ));
        }
        Ok(())
    }

    /// Unwrap the underlying property list.
    #[must_use]
    pub fn into_inner(self) -> PropertyList<C> {
        self.0
    }
}

#[cfg(test)]
mod tests {
    use highslab_engine::engines::MemoryEngine;
    use highslab_engine::{PropertyEngine, PropertyListClass};

    use super::*;
    use crate::options::{Chunking, Deflate};

    #[test]
    fn property_list_lazy_realization() {
        let memory = Arc::new(MemoryEngine::new());
        let engine: Arc<dyn Engine> = memory.clone();
        let mut dcpl = DatasetCreateProps::new(&engine);
        assert_eq!(dcpl.id(), PLIST_DEFAULT);
        assert!(!dcpl.is_realized());
        assert_eq!(memory.statistics().plists_created, 0);

        dcpl.add(&Chunking::new(vec![4, 4])).unwrap();
        let id = dcpl.id();
        assert!(id > 0);
        assert_eq!(memory.plist_class(id), Some(PropertyListClass::DatasetCreate));

        dcpl.add(&Deflate::new(5)).unwrap();
        assert_eq!(dcpl.id(), id);
        assert_eq!(memory.statistics().plists_created, 1);

        drop(dcpl);
        assert_eq!(memory.live_objects(), 0);
    }

    #[test]
    fn property_list_unsupported_category() {
        let memory = Arc::new(MemoryEngine::new());
        memory.disable_class(PropertyListClass::StringCreate);
        let engine: Arc<dyn Engine> = memory.clone();
        let mut props = StringCreateProps::new(&engine);
        let Err(Error::Property(error)) = props.add(&Deflate::new(1)) else {
            panic!("expected a property error");
        };
        assert!(error.message().starts_with("Unsupported property list type"));
        assert!(!props.is_realized());
    }

    #[test]
    fn property_list_no_rollback() {
        let memory = Arc::new(MemoryEngine::new());
        let engine: Arc<dyn Engine> = memory.clone();
        let mut dcpl = DatasetCreateProps::new(&engine);
        dcpl.add(&Chunking::new(vec![8])).unwrap();
        assert!(dcpl.add(&Deflate::new(42)).is_err());
        assert_eq!(
            memory.plist_property(dcpl.id(), "chunk"),
            Some(highslab_engine::engines::PropertyValue::Shape(vec![8]))
        );
    }

    #[test]
    fn raw_property_list() {
        let memory = Arc::new(MemoryEngine::new());
        let engine: Arc<dyn Engine> = memory.clone();
        let mut lcpl = RawPropertyList::<LinkCreate>::new(&engine);
        lcpl.add(
            |engine, plist, create| engine.set_create_intermediate_group(plist, create),
            true,
        )
        .unwrap();
        assert!(lcpl.is_realized());
        assert_eq!(
            memory.plist_property(lcpl.id(), "create_intermediate_group"),
            Some(highslab_engine::engines::PropertyValue::Bool(true))
        );

        let error = lcpl
            .add(|engine, plist, dims: &[u64]| engine.set_chunk(plist, dims), &[4][..])
            .unwrap_err();
        assert!(error.message().starts_with("Error setting raw property"));
    }
}
