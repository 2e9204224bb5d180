//! # Global Fallback Policy
//!
//! Rules that involve the global dictionary:
//!
//! - **Lookup fallback**: a miss in a dictionary, or a lookup through a handle
//!   that is not live, is retried against the global dictionary.
//! - **Write cap**: the global dictionary never grows past its configured cap.
//!   Once it is full, every insert into it is dropped, including one that
//!   would only overwrite an existing key.
//! - **Truncating copy**: copying into the global dictionary clears it first,
//!   then copies entries until the source is exhausted or the cap is hit.
//!   Which entries survive truncation follows the source's iteration order,
//!   which is unspecified.

use crate::model::{Dictionary, Handle};
use crate::store::DictRegistry;

/// Looks `key` up in `handle`'s dictionary, then in the global dictionary.
pub fn find<'a, R: DictRegistry>(registry: &'a R, handle: Handle, key: &str) -> Option<&'a str> {
    if let Some(value) = registry.get(handle).and_then(|dict| dict.get(key)) {
        return Some(value);
    }
    if handle.is_global() {
        return None;
    }
    registry.global().get(key)
}

/// Inserts into the global dictionary unless it already holds `cap` entries.
/// Returns whether the entry was stored.
pub fn insert_capped(global: &mut Dictionary, key: &str, value: &str, cap: usize) -> bool {
    if global.len() >= cap {
        tracing::debug!(key, cap, "global dictionary full, insert dropped");
        return false;
    }
    global.insert(key, value);
    true
}

/// Replaces the global dictionary's contents with at most `cap` entries of
/// `src`. Returns the number of entries copied.
pub fn copy_into_global(src: &Dictionary, global: &mut Dictionary, cap: usize) -> usize {
    global.clear();
    let mut copied = 0;
    for (key, value) in src.iter().take(cap) {
        global.insert(key, value);
        copied += 1;
    }
    if copied < src.len() {
        tracing::debug!(
            copied,
            skipped = src.len() - copied,
            "copy into global dictionary truncated"
        );
    }
    copied
}
