/// Hashes a byte key using XXH3.
///
/// Suitable as the partitioning hash for any byte-oriented key set.
#[must_use]
pub fn hash64(bytes: &[u8]) -> u64 {
    xxhash_rust::xxh3::xxh3_64(bytes)
}
