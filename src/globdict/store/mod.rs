//! # Registry Layer
//!
//! The registry owns every dictionary and maps live handles to them. The
//! [`DictRegistry`] trait is the seam between the facade and storage:
//!
//! - [`memory::InMemoryRegistry`]: the process-local implementation, a sorted
//!   map of handle to [`Dictionary`].
//!
//! ## Invariants
//!
//! - [`Handle::GLOBAL`] is present from construction until drop and cannot be
//!   deleted.
//! - `create` never returns a handle that is already live, and never the
//!   global handle.
//! - Callers only ever borrow dictionaries. Ownership stays with the registry.
//!
//! A deleted handle is *absent*, not empty: `is_valid` reports `false` for it
//! until the allocator hands the id out again.

use crate::allocator::IdPolicy;
use crate::model::{Dictionary, Handle};

pub mod memory;

pub trait DictRegistry {
    /// Allocate a handle and bind an empty dictionary to it
    fn create(&mut self) -> Handle;

    /// Drop the dictionary behind `handle`. Returns whether anything was removed.
    /// The global handle and unknown handles are ignored.
    fn delete(&mut self, handle: Handle) -> bool;

    fn is_valid(&self, handle: Handle) -> bool;

    fn get(&self, handle: Handle) -> Option<&Dictionary>;

    fn get_mut(&mut self, handle: Handle) -> Option<&mut Dictionary>;

    /// Shared access to `src` alongside exclusive access to `dst`.
    /// Returns `None` when either is missing or when `src == dst`.
    fn get_pair_mut(
        &mut self,
        src: Handle,
        dst: Handle,
    ) -> Option<(&Dictionary, &mut Dictionary)>;

    /// Live handles in ascending order, the global handle included
    fn handles(&self) -> Vec<Handle>;

    fn id_policy(&self) -> IdPolicy;

    fn global(&self) -> &Dictionary;
}
