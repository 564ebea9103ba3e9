use sha1::{Digest, Sha1};

/// Number of hex characters kept from the digest.
pub const HASH_LEN: usize = 6;

/// Short identity of a canonical string: the first six hex characters of its
/// SHA-1 digest.
///
/// The input must already be normalized. Collisions inside one module's string
/// set are an accepted risk; the value is only ever used as a dictionary key.
pub fn string_hash(canonical: &str) -> String {
    let digest = Sha1::digest(canonical.as_bytes());
    let mut hash = hex::encode(digest);
    hash.truncate(HASH_LEN);
    hash
}
