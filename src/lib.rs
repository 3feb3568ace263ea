// Copyright (c) 2025-present, fjall-rs
// This source code is licensed under both the Apache 2.0 and MIT License
// (found in the LICENSE-* files in the repository)

//! An immutable, contiguous, bucket-partitioned lookup table for key sets
//! that are fully known in advance.
//!
//! ##### About
//!
//! This crate exports a [`Set`] that answers membership queries over a fixed
//! key set (e.g. a keyword set, an enum-tag set, a whitelist) without runtime
//! allocation, pointer chasing, or collision-chain traversal.
//!
//! Construction happens exactly once: every key is assigned a bucket by a
//! caller-supplied hash function, a per-bucket offset table is derived, and
//! the keys are reordered into a single contiguous array, grouped by bucket.
//! A query is then one hash computation plus a bounded linear scan over one
//! bucket's slot range, which is small and cache-local.
//!
//! The hash is used purely for partitioning, never for identity, so there
//! are no false positives: `contains` compares keys by value equality.
//!
//! ```
//! use bucket_set::{hash64, Set};
//!
//! # fn main() -> bucket_set::Result<()> {
//! let keywords = vec!["if", "else", "while", "loop", "match"];
//! let set = Set::build(keywords, 8, |key: &&str| hash64(key.as_bytes()))?;
//!
//! assert!(set.contains(&"match"));
//! assert!(!set.contains(&"for"));
//! # Ok(())
//! # }
//! ```

#![deny(clippy::all, missing_docs, clippy::cargo)]
#![deny(clippy::unwrap_used)]
#![deny(clippy::indexing_slicing)]
#![warn(clippy::pedantic, clippy::nursery)]
#![warn(clippy::expect_used)]
#![allow(clippy::missing_const_for_fn)]
#![warn(clippy::multiple_crate_versions)]

mod error;
mod hash;
mod set;

pub use {
    error::{Error, Result},
    hash::hash64,
    set::{Set, MIN_BUCKET_COUNT},
};
