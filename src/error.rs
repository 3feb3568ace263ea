// Copyright (c) 2025-present, fjall-rs
// This source code is licensed under both the Apache 2.0 and MIT License
// (found in the LICENSE-* files in the repository)

/// Represents errors that can occur when constructing a set
#[derive(Debug)]
pub enum Error {
    /// Bucket count too low to meaningfully partition the key space (got, minimum is 3)
    InvalidBucketCount(usize),

    /// The key set contained the same key more than once
    DuplicateKey {
        /// Slot of the second occurrence in the final table
        slot: usize,
    },
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "BucketSetError: {self:?}")
    }
}

impl std::error::Error for Error {}

/// Set result
pub type Result<T> = std::result::Result<T, Error>;
