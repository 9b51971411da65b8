//! Acquisition and decoding of the two transit-data inputs: the zipped
//! static schedule bundle and the protobuf realtime feeds.

pub mod bundle;
pub mod data_model;
pub mod fetch;
pub mod realtime;
mod serde;
pub mod tidy;

/// Generated GTFS-realtime message types (schema v2.0). The module is
/// vendored so builds do not need protoc.
pub mod transit_realtime;

use sha2::{Digest, Sha256};

/// SHA-256 of the bundle bytes as lowercase hex; the identity of a static
/// import.
pub fn content_hash(bytes: &[u8]) -> String {
    let digest = Sha256::digest(bytes);
    let mut hex = String::with_capacity(digest.len() * 2);
    for byte in digest {
        hex.push_str(&format!("{:02x}", byte));
    }
    hex
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn content_hash_matches_known_vector() {
        // SHA-256 of the empty input.
        assert_eq!(
            content_hash(b""),
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
    }

    #[test]
    fn content_hash_is_stable_per_input() {
        assert_eq!(content_hash(b"abc"), content_hash(b"abc"));
        assert_ne!(content_hash(b"abc"), content_hash(b"abd"));
    }
}
