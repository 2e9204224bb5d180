//! Thread-safe wrapper for sharing one store across threads.
//!
//! The core is single-threaded. [`SharedDicts`] puts the whole [`DictApi`]
//! behind a single mutex, so every registry and dictionary access is
//! serialized. Because a borrowed `&str` cannot outlive the lock guard,
//! [`SharedDicts::find`] returns an owned copy.

use crate::api::DictApi;
use crate::config::DictConfig;
use crate::model::Handle;
use std::sync::{Mutex, MutexGuard};

#[derive(Debug, Default)]
pub struct SharedDicts {
    inner: Mutex<DictApi>,
}

impl SharedDicts {
    pub fn new(api: DictApi) -> Self {
        Self {
            inner: Mutex::new(api),
        }
    }

    pub fn from_config(config: &DictConfig) -> Self {
        Self::new(DictApi::from_config(config))
    }

    // Every mutation is a single map call, so a poisoned guard still holds
    // consistent state.
    fn lock(&self) -> MutexGuard<'_, DictApi> {
        self.inner
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Runs `f` with exclusive access to the underlying facade.
    pub fn with<T>(&self, f: impl FnOnce(&mut DictApi) -> T) -> T {
        f(&mut self.lock())
    }

    pub fn new_dict(&self) -> Handle {
        self.lock().new_dict()
    }

    pub fn delete(&self, handle: Handle) {
        self.lock().delete(handle)
    }

    pub fn size(&self, handle: Handle) -> usize {
        self.lock().size(handle)
    }

    pub fn insert(&self, handle: Handle, key: Option<&str>, value: Option<&str>) {
        self.lock().insert(handle, key, value)
    }

    pub fn remove(&self, handle: Handle, key: Option<&str>) {
        self.lock().remove(handle, key)
    }

    pub fn find(&self, handle: Handle, key: Option<&str>) -> Option<String> {
        self.lock().find(handle, key).map(str::to_owned)
    }

    pub fn clear(&self, handle: Handle) {
        self.lock().clear(handle)
    }

    pub fn copy(&self, src: Handle, dst: Handle) {
        self.lock().copy(src, dst)
    }

    pub fn global_handle(&self) -> Handle {
        Handle::GLOBAL
    }
}
