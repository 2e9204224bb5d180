use super::DictRegistry;
use crate::allocator::{HandleAllocator, IdPolicy};
use crate::model::{Dictionary, Handle};
use std::collections::BTreeMap;

/// Process-local registry. Nothing is persisted.
///
/// The global dictionary lives in its own field rather than in the map, so it
/// cannot be removed by construction.
#[derive(Debug)]
pub struct InMemoryRegistry {
    global: Dictionary,
    dicts: BTreeMap<Handle, Dictionary>,
    allocator: HandleAllocator,
}

impl InMemoryRegistry {
    pub fn new() -> Self {
        Self::with_policy(IdPolicy::default())
    }

    pub fn with_policy(policy: IdPolicy) -> Self {
        Self {
            global: Dictionary::new(),
            dicts: BTreeMap::new(),
            allocator: HandleAllocator::new(policy),
        }
    }
}

impl Default for InMemoryRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl DictRegistry for InMemoryRegistry {
    fn create(&mut self) -> Handle {
        let dicts = &self.dicts;
        let handle = self
            .allocator
            .allocate(|h| h.is_global() || dicts.contains_key(&h));
        debug_assert!(!handle.is_global());
        self.dicts.insert(handle, Dictionary::new());
        handle
    }

    fn delete(&mut self, handle: Handle) -> bool {
        self.dicts.remove(&handle).is_some()
    }

    fn is_valid(&self, handle: Handle) -> bool {
        handle.is_global() || self.dicts.contains_key(&handle)
    }

    fn get(&self, handle: Handle) -> Option<&Dictionary> {
        if handle.is_global() {
            return Some(&self.global);
        }
        self.dicts.get(&handle)
    }

    fn get_mut(&mut self, handle: Handle) -> Option<&mut Dictionary> {
        if handle.is_global() {
            return Some(&mut self.global);
        }
        self.dicts.get_mut(&handle)
    }

    fn get_pair_mut(
        &mut self,
        src: Handle,
        dst: Handle,
    ) -> Option<(&Dictionary, &mut Dictionary)> {
        if src == dst {
            return None;
        }
        if src.is_global() {
            return self.dicts.get_mut(&dst).map(|t| (&self.global, t));
        }
        if dst.is_global() {
            return self.dicts.get(&src).map(|s| (s, &mut self.global));
        }

        let mut source = None;
        let mut target = None;
        for (handle, dict) in self.dicts.iter_mut() {
            if *handle == src {
                source = Some(dict);
            } else if *handle == dst {
                target = Some(dict);
            }
        }
        match (source, target) {
            (Some(s), Some(t)) => Some((&*s, t)),
            _ => None,
        }
    }

    fn handles(&self) -> Vec<Handle> {
        std::iter::once(Handle::GLOBAL)
            .chain(self.dicts.keys().copied())
            .collect()
    }

    fn id_policy(&self) -> IdPolicy {
        self.allocator.policy()
    }

    fn global(&self) -> &Dictionary {
        &self.global
    }
}

// --- Test Fixtures ---

#[cfg(any(test, feature = "test_utils"))]
pub mod fixtures {
    use super::*;

    pub struct RegistryFixture {
        pub registry: InMemoryRegistry,
        pub handles: Vec<Handle>,
    }

    impl Default for RegistryFixture {
        fn default() -> Self {
            Self::new()
        }
    }

    impl RegistryFixture {
        pub fn new() -> Self {
            Self {
                registry: InMemoryRegistry::new(),
                handles: Vec::new(),
            }
        }

        pub fn with_policy(policy: IdPolicy) -> Self {
            Self {
                registry: InMemoryRegistry::with_policy(policy),
                handles: Vec::new(),
            }
        }

        /// Adds a dictionary holding `count` entries `k0 -> v0`, `k1 -> v1`, ...
        pub fn with_dict(mut self, count: usize) -> Self {
            let handle = self.registry.create();
            if let Some(dict) = self.registry.get_mut(handle) {
                for i in 0..count {
                    dict.insert(&format!("k{}", i), &format!("v{}", i));
                }
            }
            self.handles.push(handle);
            self
        }

        pub fn with_global_entry(mut self, key: &str, value: &str) -> Self {
            if let Some(global) = self.registry.get_mut(Handle::GLOBAL) {
                global.insert(key, value);
            }
            self
        }
    }
}

#[cfg(test)]
mod tests {
    use super::fixtures::RegistryFixture;
    use super::*;

    #[test]
    fn test_starts_with_global_only() {
        let registry = InMemoryRegistry::new();
        assert_eq!(registry.handles(), vec![Handle::GLOBAL]);
        assert!(registry.is_valid(Handle::GLOBAL));
        assert!(registry.global().is_empty());
    }

    #[test]
    fn test_create_returns_distinct_live_handles() {
        let mut registry = InMemoryRegistry::new();
        let a = registry.create();
        let b = registry.create();
        assert_ne!(a, b);
        assert!(!a.is_global() && !b.is_global());
        assert!(registry.is_valid(a) && registry.is_valid(b));
        assert_eq!(registry.get(a).map(Dictionary::len), Some(0));
    }

    #[test]
    fn test_delete_makes_handle_absent() {
        let mut registry = InMemoryRegistry::new();
        let a = registry.create();
        assert!(registry.delete(a));
        assert!(!registry.is_valid(a));
        assert!(registry.get(a).is_none());
        assert!(!registry.delete(a));
    }

    #[test]
    fn test_global_cannot_be_deleted() {
        let mut fixture = RegistryFixture::new().with_global_entry("g", "v");
        assert!(!fixture.registry.delete(Handle::GLOBAL));
        assert!(fixture.registry.is_valid(Handle::GLOBAL));
        assert_eq!(fixture.registry.global().get("g"), Some("v"));
    }

    #[test]
    fn test_compact_reuses_deleted_id() {
        let mut registry = InMemoryRegistry::with_policy(IdPolicy::Compact);
        assert_eq!(registry.id_policy(), IdPolicy::Compact);
        let a = registry.create();
        let _b = registry.create();
        registry.delete(a);
        assert_eq!(registry.create(), a);
    }

    #[test]
    fn test_monotonic_skips_deleted_id() {
        let mut registry = InMemoryRegistry::with_policy(IdPolicy::Monotonic);
        assert_eq!(registry.id_policy(), IdPolicy::Monotonic);
        let a = registry.create();
        let b = registry.create();
        registry.delete(a);
        let c = registry.create();
        assert_ne!(c, a);
        assert!(c > b);
    }

    #[test]
    fn test_many_new_and_delete() {
        let mut registry = InMemoryRegistry::new();
        let ids: Vec<Handle> = (0..6).map(|_| registry.create()).collect();
        registry.delete(ids[2]);
        registry.delete(ids[3]);
        let reused = registry.create();
        assert_eq!(reused, ids[2]);

        for h in &ids {
            registry.delete(*h);
        }
        registry.delete(reused);
        assert_eq!(registry.handles(), vec![Handle::GLOBAL]);
    }

    #[test]
    fn test_pair_access() {
        let mut fixture = RegistryFixture::new().with_dict(2).with_dict(0);
        let (src, dst) = (fixture.handles[0], fixture.handles[1]);

        let (source, target) = fixture.registry.get_pair_mut(src, dst).unwrap();
        assert_eq!(source.len(), 2);
        target.insert("x", "y");
        assert_eq!(fixture.registry.get(dst).unwrap().get("x"), Some("y"));
    }

    #[test]
    fn test_pair_access_rejects_same_or_missing() {
        let mut fixture = RegistryFixture::new().with_dict(1);
        let h = fixture.handles[0];
        assert!(fixture.registry.get_pair_mut(h, h).is_none());
        assert!(fixture.registry.get_pair_mut(h, Handle::new(99)).is_none());
        assert!(fixture.registry.get_pair_mut(Handle::new(99), h).is_none());
    }
}
