use xxhash_rust::xxh3::xxh3_64;

/// Hex encoded xxh3 digest of `input`.
pub fn xxhash_hex(input: &[u8]) -> String {
  format!("{:016x}", xxh3_64(input))
}

/// Weak ETag for a compiled module, compared against `If-None-Match`.
pub fn etag(content: &str) -> String {
  format!("W/\"{}\"", xxhash_hex(content.as_bytes()))
}

#[test]
fn test_etag_is_stable() {
  assert_eq!(etag("export {}"), etag("export {}"));
  assert_ne!(etag("export {}"), etag("export default 1"));
  assert!(etag("a").starts_with("W/\""));
  assert_eq!(xxhash_hex(b"hello").len(), 16);
}
