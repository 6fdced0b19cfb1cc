use std::sync::Arc;

use highslab_engine::{Engine, Hid, is_failure};

/// An owned engine object identifier.
///
/// The object is released with [`Engine::close`] when the handle is dropped.
pub struct Handle {
    engine: Arc<dyn Engine>,
    id: Hid,
}

impl Handle {
    /// Take ownership of the engine object `id`.
    pub(crate) fn new(engine: Arc<dyn Engine>, id: Hid) -> Self {
        Self { engine, id }
    }

    /// The object identifier.
    #[must_use]
    pub fn id(&self) -> Hid {
        self.id
    }

    /// The engine owning the object.
    #[must_use]
    pub fn engine(&self) -> &Arc<dyn Engine> {
        &self.engine
    }
}

impl std::fmt::Debug for Handle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Handle").field("id", &self.id).finish()
    }
}

impl Drop for Handle {
    fn drop(&mut self) {
        if is_failure(self.engine.close(self.id)) {
            log::warn!(
                "Unable to release engine object {}: {}",
                self.id,
                self.engine
                    .last_error_message()
                    .unwrap_or_else(|| "unknown error".to_string())
            );
        }
    }
}
