use sha2::{Digest, Sha256};

/// Derive a deterministic card id from the trimmed source input.
///
/// The first 16 bits of the SHA-256 digest are formatted as a zero-padded
/// decimal, giving ids of the form `jp_0000` through `jp_65535`. Distinct
/// inputs can collide (65536 buckets); the store tolerates duplicates and
/// lookups take the first match.
pub fn generate_id(source_input: &str) -> String {
    let digest = Sha256::digest(source_input.as_bytes());
    let num = u16::from_be_bytes([digest[0], digest[1]]);
    format!("jp_{num:04}")
}
