//! # Handle Allocation
//!
//! Every registry owns one [`HandleAllocator`], and its [`IdPolicy`] is fixed
//! when the registry is built. Two policies exist:
//!
//! - [`IdPolicy::Compact`] (default): the smallest positive id not currently
//!   live. Deleting a dictionary frees its id for the next `create`.
//! - [`IdPolicy::Monotonic`]: a counter starting at 1. An id is never handed
//!   out twice, even after its dictionary is gone.
//!
//! Neither policy ever returns [`Handle::GLOBAL`].

use crate::model::Handle;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IdPolicy {
    #[default]
    Compact,
    Monotonic,
}

impl std::fmt::Display for IdPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            IdPolicy::Compact => write!(f, "compact"),
            IdPolicy::Monotonic => write!(f, "monotonic"),
        }
    }
}

impl FromStr for IdPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "compact" => Ok(IdPolicy::Compact),
            "monotonic" => Ok(IdPolicy::Monotonic),
            _ => Err(format!(
                "Unknown id policy: {} (expected compact or monotonic)",
                s
            )),
        }
    }
}

#[derive(Debug, Clone)]
pub struct HandleAllocator {
    policy: IdPolicy,
    next: u64,
}

impl HandleAllocator {
    pub fn new(policy: IdPolicy) -> Self {
        Self { policy, next: 1 }
    }

    pub fn policy(&self) -> IdPolicy {
        self.policy
    }

    /// Picks a handle for which `is_live` is false.
    pub fn allocate(&mut self, is_live: impl Fn(Handle) -> bool) -> Handle {
        match self.policy {
            IdPolicy::Compact => {
                let mut candidate = 1;
                while is_live(Handle::new(candidate)) {
                    candidate += 1;
                }
                Handle::new(candidate)
            }
            IdPolicy::Monotonic => {
                while is_live(Handle::new(self.next)) {
                    self.next += 1;
                }
                let handle = Handle::new(self.next);
                self.next += 1;
                handle
            }
        }
    }
}

impl Default for HandleAllocator {
    fn default() -> Self {
        Self::new(IdPolicy::default())
    }
}
