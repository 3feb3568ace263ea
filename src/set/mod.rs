// Copyright (c) 2025-present, fjall-rs
// This source code is licensed under both the Apache 2.0 and MIT License
// (found in the LICENSE-* files in the repository)

mod builder;

use crate::{Error, Result};

/// Minimum number of buckets needed to meaningfully partition a key set.
pub const MIN_BUCKET_COUNT: usize = 3;

/// An immutable, bucket-partitioned lookup table over a fixed key set.
///
/// Keys are grouped contiguously by bucket id, and appear within their
/// bucket in original insertion order. A membership query is one hash
/// computation plus a linear scan over a single bucket's slot range.
///
/// After construction the set is never mutated, so it can be read
/// concurrently by any number of readers without synchronization.
pub struct Set<T, H> {
    hasher: H,

    /// Start slot of each bucket's run, exclusive prefix sum of the
    /// bucket histogram
    offsets: Box<[usize]>,

    /// Keys reordered into their final, bucket-grouped layout
    table: Box<[T]>,
}

impl<T: PartialEq, H: Fn(&T) -> u64> Set<T, H> {
    /// Builds a set from the given keys, partitioned into `bucket_count`
    /// buckets using the given hash function.
    ///
    /// The hash function must be pure and deterministic; it is used for
    /// partitioning only, never for identity, so membership answers are
    /// exact.
    ///
    /// # Errors
    ///
    /// Returns `InvalidBucketCount` if `bucket_count` is less than
    /// [`MIN_BUCKET_COUNT`], and `DuplicateKey` if the same key occurs
    /// more than once.
    pub fn build(keys: Vec<T>, bucket_count: usize, hasher: H) -> Result<Self> {
        if bucket_count < MIN_BUCKET_COUNT {
            return Err(Error::InvalidBucketCount(bucket_count));
        }

        log::trace!(
            "building set with {} keys across {bucket_count} buckets",
            keys.len(),
        );

        let assignment = builder::bucket_assignment(&keys, bucket_count, &hasher);
        let offsets = builder::offset_table(&assignment, bucket_count);
        let slots = builder::slot_assignment(&assignment, &offsets);
        let reverse = builder::invert(&slots);
        let table = builder::materialize(keys, &reverse);

        if let Some(slot) = builder::find_duplicate(&table, &offsets) {
            return Err(Error::DuplicateKey { slot });
        }

        Ok(Self {
            hasher,
            offsets: offsets.into_boxed_slice(),
            table: table.into_boxed_slice(),
        })
    }

    /// Builds a set, deriving the bucket count from the number of keys.
    ///
    /// A `bucket_ratio` of 1.0 allocates one bucket per key, halving the
    /// ratio roughly doubles the expected scan length. The bucket count
    /// never drops below [`MIN_BUCKET_COUNT`].
    ///
    /// # Errors
    ///
    /// Returns `DuplicateKey` if the same key occurs more than once.
    ///
    /// # Panics
    ///
    /// Panics if `bucket_ratio` is negative.
    pub fn with_bucket_ratio(keys: Vec<T>, bucket_ratio: f32, hasher: H) -> Result<Self> {
        let bucket_count = builder::calculate_bucket_count(keys.len(), bucket_ratio);
        Self::build(keys, bucket_count, hasher)
    }

    /// Returns the stored key equal to the given key, if any.
    #[must_use]
    pub fn get(&self, key: &T) -> Option<&T> {
        let bucket = builder::bucket_of(key, self.bucket_count(), &self.hasher);
        let (start, end) = self.bucket_range(bucket);

        self.table
            .get(start..end)?
            .iter()
            .find(|&stored| stored == key)
    }

    /// Returns `true` if the key was part of the key set.
    #[must_use]
    pub fn contains(&self, key: &T) -> bool {
        self.get(key).is_some()
    }
}

impl<T, H> Set<T, H> {
    /// Returns the number of keys in the set.
    #[must_use]
    pub fn len(&self) -> usize {
        self.table.len()
    }

    /// Returns `true` if the set is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }

    /// Returns the number of buckets.
    #[must_use]
    pub fn bucket_count(&self) -> usize {
        self.offsets.len()
    }

    /// Returns an iterator over the keys in slot order (grouped by bucket).
    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.table.iter()
    }

    /// Returns the number of keys in the given bucket.
    ///
    /// # Panics
    ///
    /// Panics if `bucket` is not a valid bucket id.
    #[must_use]
    pub fn bucket_len(&self, bucket: usize) -> usize {
        assert!(bucket < self.bucket_count(), "bucket id out of range");

        let (start, end) = self.bucket_range(bucket);
        end - start
    }

    /// Returns the length of the most loaded bucket.
    ///
    /// An upper bound on the slots any single query scans; useful for
    /// judging hash quality and bucket sizing.
    #[must_use]
    pub fn largest_bucket_len(&self) -> usize {
        (0..self.bucket_count())
            .map(|bucket| self.bucket_len(bucket))
            .max()
            .unwrap_or_default()
    }

    /// Returns the raw bucket offset table.
    ///
    /// Only used for tests/benchmarks
    #[must_use]
    #[doc(hidden)]
    pub fn offsets(&self) -> &[usize] {
        &self.offsets
    }

    /// Returns the slot range `[start, end)` holding the bucket's keys.
    fn bucket_range(&self, bucket: usize) -> (usize, usize) {
        debug_assert!(bucket < self.bucket_count(), "bucket id out of range");

        // SAFETY: bucket ids are reduced modulo the bucket count
        #[allow(unsafe_code)]
        let start = *unsafe { self.offsets.get_unchecked(bucket) };

        // The table end caps the run of the highest bucket id; every other
        // run ends where the next bucket's run starts. This must compare
        // against the bucket count, not the key count.
        //
        // SAFETY: bucket + 1 < bucket count in the else branch
        #[allow(unsafe_code)]
        let end = if bucket == self.bucket_count() - 1 {
            self.table.len()
        } else {
            *unsafe { self.offsets.get_unchecked(bucket + 1) }
        };

        (start, end)
    }
}

impl<'a, T, H> IntoIterator for &'a Set<T, H> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<T, H> std::fmt::Debug for Set<T, H> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Set<len={}, buckets={}>", self.len(), self.bucket_count())
    }
}
