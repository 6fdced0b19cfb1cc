//! Datasets.

use std::sync::Arc;

use highslab_engine::{
    DataSpace, DatasetEngine, Datatype, Engine, Hid, PLIST_DEFAULT, is_failure,
};

use crate::{
    DatasetError,
    container::Element,
    handle::Handle,
    property_list::{DatasetAccessProps, DatasetCreateProps},
    slice_io::SliceIo,
};

/// An open dataset.
///
/// The engine dataset is closed when the [`Dataset`] is dropped.
#[derive(Debug)]
pub struct Dataset {
    handle: Handle,
    name: String,
    datatype: Datatype,
    space: DataSpace,
}

impl Dataset {
    /// Create a dataset called `name` with elements of `datatype` and the extent of `space`.
    ///
    /// # Errors
    /// Returns a [`DatasetError`] if the engine cannot create the dataset, for example if `name` exists or
    /// `dcpl` is incompatible with `space`.
    pub fn create(
        engine: &Arc<dyn Engine>,
        name: &str,
        datatype: Datatype,
        space: &DataSpace,
        dcpl: &DatasetCreateProps,
    ) -> Result<Self, DatasetError> {
        let id = engine.dataset_create(name, datatype, space, dcpl.id(), PLIST_DEFAULT);
        if id < 0 {
            return Err(DatasetError::from_engine(
                engine.as_ref(),
                &format!("Unable to create dataset {name}"),
            ));
        }
        log::debug!("created dataset {name} of {datatype} with extent {:?}", space.dimensions());
        let mut space = space.clone();
        space.select_all();
        Ok(Self {
            handle: Handle::new(engine.clone(), id),
            name: name.to_string(),
            datatype,
            space,
        })
    }

    /// Create a dataset called `name` with elements of type `E` and the extent of `space`.
    ///
    /// # Errors
    /// See [`Dataset::create`].
    pub fn create_for<E: Element>(
        engine: &Arc<dyn Engine>,
        name: &str,
        space: &DataSpace,
        dcpl: &DatasetCreateProps,
    ) -> Result<Self, DatasetError> {
        Self::create(engine, name, E::DATATYPE, space, dcpl)
    }

    /// Open the dataset called `name`.
    ///
    /// # Errors
    /// Returns a [`DatasetError`] if the dataset does not exist or its extent or datatype cannot be
    /// retrieved.
    pub fn open(
        engine: &Arc<dyn Engine>,
        name: &str,
        dapl: &DatasetAccessProps,
    ) -> Result<Self, DatasetError> {
        let id = engine.dataset_open(name, dapl.id());
        if id < 0 {
            return Err(DatasetError::from_engine(
                engine.as_ref(),
                &format!("Unable to open dataset {name}"),
            ));
        }
        let handle = Handle::new(engine.clone(), id);

        let mut dims = Vec::new();
        let mut max_dims = Vec::new();
        if is_failure(engine.dataset_extent(id, &mut dims, &mut max_dims)) {
            return Err(DatasetError::from_engine(
                engine.as_ref(),
                &format!("Unable to get the extent of dataset {name}"),
            ));
        }
        let space = DataSpace::new_with_max_dims(dims, max_dims).map_err(|err| {
            DatasetError::new(format!("Invalid extent of dataset {name}: {err}"))
        })?;

        let mut datatype = None;
        let status = engine.dataset_datatype(id, &mut datatype);
        let Some(datatype) = datatype.filter(|_| !is_failure(status)) else {
            return Err(DatasetError::from_engine(
                engine.as_ref(),
                &format!("Unable to get the datatype of dataset {name}"),
            ));
        };

        log::debug!("opened dataset {name} of {datatype} with extent {:?}", space.dimensions());
        Ok(Self {
            handle,
            name: name.to_string(),
            datatype,
            space,
        })
    }

    /// The engine dataset identifier.
    #[must_use]
    pub fn id(&self) -> Hid {
        self.handle.id()
    }

    /// The engine of the dataset.
    #[must_use]
    pub fn engine(&self) -> &Arc<dyn Engine> {
        self.handle.engine()
    }

    /// The dataset name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The element datatype.
    #[must_use]
    pub fn datatype(&self) -> Datatype {
        self.datatype
    }

    /// The extent.
    #[must_use]
    pub fn dimensions(&self) -> &[u64] {
        self.space.dimensions()
    }

    /// The maximum extent.
    #[must_use]
    pub fn max_dimensions(&self) -> &[u64] {
        self.space.max_dimensions()
    }
}

impl SliceIo for Dataset {
    fn dataset(&self) -> &Dataset {
        self
    }

    fn space(&self) -> &DataSpace {
        &self.space
    }

    fn mem_space(&self) -> &DataSpace {
        &self.space
    }

    fn transfer_mem_space(&self) -> Option<&DataSpace> {
        None
    }
}
