//! Short SHA-256 digests used for record ids and key-set fingerprints

use sha2::{Digest, Sha256};

/// Number of hex characters kept from a digest
pub const SHORT_HASH_LEN: usize = 16;

/// Separator between key names when fingerprinting. Not valid in HTML text.
const KEY_SEPARATOR: char = '\u{1f}';

/// Hex-encoded SHA-256 of `input`, truncated to [`SHORT_HASH_LEN`] characters.
///
/// Used to derive a stable id for an institution from its name.
pub fn short_hash(input: &str) -> String {
    let digest = Sha256::digest(input.as_bytes());
    let mut encoded = hex::encode(digest);
    encoded.truncate(SHORT_HASH_LEN);
    encoded
}

/// Fingerprint of a set of field names.
///
/// Names are sorted before hashing so the result does not depend on
/// iteration order.
pub fn key_fingerprint<'a, I>(keys: I) -> String
where
    I: IntoIterator<Item = &'a str>,
{
    let mut keys: Vec<&str> = keys.into_iter().collect();
    keys.sort_unstable();
    keys.dedup();

    let mut joined = String::new();
    for (i, key) in keys.iter().enumerate() {
        if i > 0 {
            joined.push(KEY_SEPARATOR);
        }
        joined.push_str(key);
    }
    short_hash(&joined)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_hash_is_stable() {
        // sha256("abc") = ba7816bf8f01cfea414140de5dae2223...
        assert_eq!(short_hash("abc"), "ba7816bf8f01cfea");
        assert_eq!(short_hash("abc").len(), SHORT_HASH_LEN);
    }

    #[test]
    fn test_fingerprint_ignores_order() {
        assert_eq!(
            key_fingerprint(["id", "name", "score"]),
            key_fingerprint(["score", "id", "name"])
        );
    }

    #[test]
    fn test_fingerprint_distinguishes_concatenations() {
        // "ab"+"c" and "a"+"bc" must not collide
        assert_ne!(key_fingerprint(["ab", "c"]), key_fingerprint(["a", "bc"]));
    }

    #[test]
    fn test_fingerprint_of_empty_set() {
        assert_eq!(key_fingerprint(std::iter::empty()), short_hash(""));
    }
}
