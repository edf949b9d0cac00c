//! Random identifiers for sessions and gateway orders.

use rand::RngCore;

/// Returns `bytes` random bytes from the thread-local CSPRNG, hex-encoded.
#[must_use]
pub fn random_hex(bytes: usize) -> String {
    let mut buf = vec![0u8; bytes];
    rand::rng().fill_bytes(&mut buf);
    hex::encode(buf)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_random_hex_length() {
        assert_eq!(random_hex(32).len(), 64);
        assert_eq!(random_hex(8).len(), 16);
    }

    #[test]
    fn test_random_hex_differs() {
        assert_ne!(random_hex(32), random_hex(32));
    }
}
