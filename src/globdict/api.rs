//! # API Facade
//!
//! [`DictApi`] is the single entry point for dictionary operations. It checks
//! handles against the registry, then hands the work to the dictionary (or to
//! the [`policy`] rules when the global dictionary is involved).
//!
//! ## Total Operations
//!
//! Nothing here returns an error. Bad input degrades to a no-op or a sentinel:
//!
//! | Input                         | Effect                               |
//! |-------------------------------|--------------------------------------|
//! | unknown handle                | no-op, `size` 0                      |
//! | `delete` on the global handle | no-op                                |
//! | absent key or value (`None`)  | no-op, `find` returns `None`         |
//! | global dictionary at its cap  | insert dropped, even an overwrite    |
//!
//! `find` on an unknown handle still consults the global dictionary.
//!
//! ## Borrowed Results
//!
//! `find` hands back a `&str` borrowed from the owning dictionary, so the
//! compiler ends its validity at the next `&mut self` call. Callers that need
//! to hold on to a value across mutations copy it with `to_owned`.
//!
//! ## Generic Over DictRegistry
//!
//! `DictApi<R: DictRegistry>` defaults to [`InMemoryRegistry`].

use crate::config::DictConfig;
use crate::model::Handle;
use crate::policy;
use crate::store::memory::InMemoryRegistry;
use crate::store::DictRegistry;

pub use crate::allocator::IdPolicy;
pub use crate::model::MAX_GLOBAL_SIZE;

#[derive(Debug)]
pub struct DictApi<R: DictRegistry = InMemoryRegistry> {
    registry: R,
    max_global_size: usize,
}

impl DictApi<InMemoryRegistry> {
    pub fn from_config(config: &DictConfig) -> Self {
        Self::new(
            InMemoryRegistry::with_policy(config.id_policy),
            config.max_global_size,
        )
    }
}

impl Default for DictApi<InMemoryRegistry> {
    fn default() -> Self {
        Self::from_config(&DictConfig::default())
    }
}

impl<R: DictRegistry> DictApi<R> {
    pub fn new(registry: R, max_global_size: usize) -> Self {
        Self {
            registry,
            max_global_size,
        }
    }

    pub fn registry(&self) -> &R {
        &self.registry
    }

    pub fn max_global_size(&self) -> usize {
        self.max_global_size
    }

    pub fn global_handle(&self) -> Handle {
        Handle::GLOBAL
    }

    pub fn is_valid(&self, handle: Handle) -> bool {
        self.registry.is_valid(handle)
    }

    /// Creates an empty dictionary and returns its handle.
    pub fn new_dict(&mut self) -> Handle {
        let handle = self.registry.create();
        tracing::debug!(%handle, "dictionary created");
        handle
    }

    pub fn delete(&mut self, handle: Handle) {
        let removed = self.registry.delete(handle);
        tracing::debug!(%handle, removed, "delete");
    }

    pub fn size(&self, handle: Handle) -> usize {
        let size = self.registry.get(handle).map_or(0, |dict| dict.len());
        tracing::debug!(%handle, size, "size");
        size
    }

    pub fn insert(&mut self, handle: Handle, key: Option<&str>, value: Option<&str>) {
        tracing::debug!(%handle, ?key, ?value, "insert");
        let (Some(key), Some(value)) = (key, value) else {
            return;
        };
        let cap = self.max_global_size;
        let Some(dict) = self.registry.get_mut(handle) else {
            return;
        };
        if handle.is_global() {
            policy::insert_capped(dict, key, value, cap);
        } else {
            dict.insert(key, value);
        }
    }

    pub fn remove(&mut self, handle: Handle, key: Option<&str>) {
        tracing::debug!(%handle, ?key, "remove");
        let Some(key) = key else {
            return;
        };
        if let Some(dict) = self.registry.get_mut(handle) {
            dict.remove(key);
        }
    }

    /// Looks `key` up in `handle`'s dictionary, falling back to the global one.
    pub fn find(&self, handle: Handle, key: Option<&str>) -> Option<&str> {
        let found = key.and_then(|key| policy::find(&self.registry, handle, key));
        tracing::debug!(%handle, ?key, ?found, "find");
        found
    }

    pub fn clear(&mut self, handle: Handle) {
        tracing::debug!(%handle, "clear");
        if let Some(dict) = self.registry.get_mut(handle) {
            dict.clear();
        }
    }

    /// Replaces `dst`'s contents with a copy of `src`'s.
    ///
    /// Copying into the global dictionary is truncated at its cap. Copying a
    /// dictionary onto itself does nothing, including the global one.
    pub fn copy(&mut self, src: Handle, dst: Handle) {
        if src == dst {
            tracing::debug!(%src, %dst, "copy onto self ignored");
            return;
        }
        let cap = self.max_global_size;
        let Some((source, target)) = self.registry.get_pair_mut(src, dst) else {
            tracing::debug!(%src, %dst, "copy with unknown handle ignored");
            return;
        };
        let copied = if dst.is_global() {
            policy::copy_into_global(source, target, cap)
        } else {
            target.clone_from(source);
            target.len()
        };
        tracing::debug!(%src, %dst, copied, "copy");
    }
}
