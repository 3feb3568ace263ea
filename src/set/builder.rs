// Copyright (c) 2025-present, fjall-rs
// This source code is licensed under both the Apache 2.0 and MIT License
// (found in the LICENSE-* files in the repository)

use super::MIN_BUCKET_COUNT;

/// Computes a bucket count from an item count and a bucket ratio.
///
/// A ratio of 1.0 allocates one bucket per key; lower ratios trade longer
/// scans for a smaller offset table.
#[allow(
    clippy::cast_precision_loss,
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss
)]
pub(super) fn calculate_bucket_count(item_count: usize, bucket_ratio: f32) -> usize {
    assert!(
        bucket_ratio.is_sign_positive(),
        "bucket_ratio may not be negative",
    );

    ((item_count as f32 * bucket_ratio) as usize).max(MIN_BUCKET_COUNT)
}

// NOTE: The modulo keeps the result strictly below the bucket count
#[allow(clippy::cast_possible_truncation)]
pub(super) fn bucket_of<T, H: Fn(&T) -> u64>(key: &T, bucket_count: usize, hasher: &H) -> usize {
    (hasher(key) % (bucket_count as u64)) as usize
}

/// Maps each key to its bucket id, index-aligned with the key array.
pub(super) fn bucket_assignment<T, H: Fn(&T) -> u64>(
    keys: &[T],
    bucket_count: usize,
    hasher: &H,
) -> Vec<usize> {
    keys.iter()
        .map(|key| bucket_of(key, bucket_count, hasher))
        .collect()
}

/// Builds the per-bucket start offset table.
///
/// `offsets[b]` is the number of keys whose bucket id is strictly less
/// than `b`, which is the exclusive prefix sum of the bucket histogram.
/// Empty buckets end up sharing the offset of the next non-empty bucket.
pub(super) fn offset_table(assignment: &[usize], bucket_count: usize) -> Vec<usize> {
    let mut offsets = vec![0; bucket_count];

    for &bucket in assignment {
        debug_assert!(bucket < bucket_count, "bucket id out of range");

        if let Some(count) = offsets.get_mut(bucket) {
            *count += 1;
        }
    }

    // Turn the histogram into its exclusive prefix sum, in place
    let mut acc = 0;
    for count in &mut offsets {
        let run_len = *count;
        *count = acc;
        acc += run_len;
    }

    offsets
}

/// Assigns each key its final slot.
///
/// Keys sharing a bucket occupy a contiguous slot run starting at the
/// bucket's offset, in their original relative order. The result is a
/// bijection onto `0..N`.
pub(super) fn slot_assignment(assignment: &[usize], offsets: &[usize]) -> Vec<usize> {
    // One cursor per bucket, starting at the bucket's first slot
    let mut cursors = offsets.to_vec();

    assignment
        .iter()
        .map(|&bucket| {
            // NOTE: bucket ids are always < bucket count
            #[allow(clippy::expect_used)]
            let cursor = cursors
                .get_mut(bucket)
                .expect("bucket id should be in range");

            let slot = *cursor;
            *cursor += 1;
            slot
        })
        .collect()
}

/// Inverts the slot assignment, yielding the original key index per slot.
pub(super) fn invert(slots: &[usize]) -> Vec<usize> {
    let mut reverse = vec![0; slots.len()];

    for (index, &slot) in slots.iter().enumerate() {
        debug_assert!(slot < reverse.len(), "slot out of range");

        if let Some(entry) = reverse.get_mut(slot) {
            *entry = index;
        }
    }

    reverse
}

/// Reorders the key array into its final, bucket-grouped layout.
pub(super) fn materialize<T>(keys: Vec<T>, reverse: &[usize]) -> Vec<T> {
    debug_assert_eq!(keys.len(), reverse.len());

    let mut keys: Vec<Option<T>> = keys.into_iter().map(Some).collect();

    reverse
        .iter()
        .map(|&index| {
            // NOTE: the slot assignment is a bijection, so every original
            // index is taken exactly once
            keys.get_mut(index)
                .and_then(Option::take)
                .expect("reverse table should be a permutation")
        })
        .collect()
}

/// Scans the final table for duplicate keys.
///
/// Duplicates hash identically, so they always share a bucket; only pairs
/// within the same bucket run need to be compared. Returns the slot of the
/// second occurrence, if any.
pub(super) fn find_duplicate<T: PartialEq>(table: &[T], offsets: &[usize]) -> Option<usize> {
    for (bucket, &start) in offsets.iter().enumerate() {
        let end = offsets.get(bucket + 1).copied().unwrap_or(table.len());
        let run = table.get(start..end).unwrap_or_default();

        for (rank, key) in run.iter().enumerate() {
            for (other_rank, other) in run.iter().enumerate().skip(rank + 1) {
                if other == key {
                    return Some(start + other_rank);
                }
            }
        }
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_log::test;

    // O(N * bucket_count) counting form, kept as the test oracle
    fn counting_offset_table(assignment: &[usize], bucket_count: usize) -> Vec<usize> {
        (0..bucket_count)
            .map(|bucket| assignment.iter().filter(|&&other| other < bucket).count())
            .collect()
    }

    #[test]
    fn offset_table_simple() {
        let assignment = [0, 2, 1, 2, 1];
        assert_eq!(vec![0, 1, 3], offset_table(&assignment, 3));
    }

    #[test]
    fn offset_table_empty_buckets() {
        let assignment = [0, 0, 3, 3];
        assert_eq!(vec![0, 2, 2, 2, 4], offset_table(&assignment, 5));
    }

    #[test]
    fn offset_table_no_keys() {
        let assignment = [];
        assert_eq!(vec![0, 0, 0], offset_table(&assignment, 3));
    }

    #[test]
    fn offset_table_matches_counting_form() {
        let assignment = [0, 2, 1, 2, 1, 4, 4, 0, 3, 1, 1, 0];

        for bucket_count in [5, 6, 10] {
            assert_eq!(
                counting_offset_table(&assignment, bucket_count),
                offset_table(&assignment, bucket_count),
            );
        }
    }

    #[test]
    fn slots_form_bijection() {
        let assignment = [1, 0, 1, 2, 1, 0, 4, 2];
        let offsets = offset_table(&assignment, 5);

        let mut slots = slot_assignment(&assignment, &offsets);
        slots.sort_unstable();

        assert_eq!((0..assignment.len()).collect::<Vec<_>>(), slots);
    }

    #[test]
    fn slots_are_stable_within_bucket() {
        let assignment = [1, 1, 0, 1, 0];
        let offsets = offset_table(&assignment, 3);
        let slots = slot_assignment(&assignment, &offsets);

        // Bucket 0 run starts at slot 0, bucket 1 run at slot 2
        assert_eq!(vec![2, 3, 0, 4, 1], slots);
    }

    #[test]
    fn invert_round_trip() {
        let slots = [0, 3, 1, 4, 2];
        let reverse = invert(&slots);

        assert_eq!(vec![0, 2, 4, 1, 3], reverse);

        for (index, &slot) in slots.iter().enumerate() {
            assert_eq!(Some(&index), reverse.get(slot));
        }
    }

    #[test]
    fn materialize_permutes() {
        let keys = vec!["a", "b", "c", "d"];
        let reverse = [2, 0, 3, 1];

        assert_eq!(vec!["c", "a", "d", "b"], materialize(keys, &reverse));
    }

    #[test]
    fn finds_duplicate_in_bucket_run() {
        // Layout: bucket 0 -> [5, 5], bucket 1 -> [7]
        let table = [5, 5, 7];
        let offsets = [0, 2, 3];

        assert_eq!(Some(1), find_duplicate(&table, &offsets));
    }

    #[test]
    fn no_false_duplicates() {
        let table = [5, 8, 7];
        let offsets = [0, 2, 3];

        assert_eq!(None, find_duplicate(&table, &offsets));
    }

    #[test]
    fn bucket_count_from_ratio() {
        assert_eq!(100, calculate_bucket_count(100, 1.0));
        assert_eq!(50, calculate_bucket_count(100, 0.5));

        // Never degenerates below the minimum
        assert_eq!(MIN_BUCKET_COUNT, calculate_bucket_count(100, 0.0));
        assert_eq!(MIN_BUCKET_COUNT, calculate_bucket_count(0, 1.0));
    }
}
