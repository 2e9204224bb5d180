//! # Globdict Architecture
//!
//! Globdict is an **in-process store of independent string dictionaries**.
//! Callers ask for a dictionary, get back an opaque [`model::Handle`], and
//! operate on it through a small set of total operations. One dictionary,
//! reachable through [`model::Handle::GLOBAL`], is shared by everyone: lookups
//! that miss in any dictionary fall back to it, and its size is capped.
//!
//! ## Layers
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │  CLI (main.rs, args.rs)                                     │
//! │  - Parses arguments, runs scripts, prints, exit codes       │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Script Layer (script.rs)                                   │
//! │  - Text statements to facade calls, no I/O                  │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  API Layer (api.rs, sync.rs)                                │
//! │  - new / delete / size / insert / remove / find / clear /   │
//! │    copy / global_handle                                     │
//! │  - Validates handles, consults the global fallback policy   │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Registry Layer (store/, allocator.rs)                      │
//! │  - DictRegistry trait, InMemoryRegistry                     │
//! │  - Handle allocation policy                                 │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! From `api.rs` inward nothing writes to stdout/stderr, exits the process, or
//! returns an error. Diagnostics go through `tracing` at debug level.
//!
//! ## Ownership
//!
//! The registry owns every [`model::Dictionary`]. Callers hold handles and
//! short-lived `&str` borrows from `find`. The store has no internal locking;
//! wrap it in [`sync::SharedDicts`] to share it between threads.
//!
//! ## Module Overview
//!
//! - [`api`]: The facade, entry point for all operations
//! - [`policy`]: Global fallback, write cap and truncating copy
//! - [`store`]: Registry abstraction and the in-memory implementation
//! - [`allocator`]: Handle allocation policies
//! - [`model`]: `Handle`, `Dictionary` and the global size constant
//! - [`sync`]: Mutex-guarded wrapper for multi-threaded callers
//! - [`script`]: Line-oriented command language over the facade
//! - [`config`]: Configuration management
//! - [`error`]: Error types

pub mod allocator;
pub mod api;
pub mod config;
pub mod error;
pub mod model;
pub mod policy;
pub mod script;
pub mod store;
pub mod sync;
