//! The "digest engine" named interface from spec.md §6: a 32-byte content
//! hash over original bytes. Kept behind a trait so tests can swap in a
//! deterministic stub instead of linking a real hash.

use sha2::{Digest, Sha256};

pub trait DigestEngine {
    fn sha256(&self, bytes: &[u8]) -> [u8; 32];
}

/// Production digest engine, backed by `sha2`.
#[derive(Debug, Default, Clone, Copy)]
pub struct Sha256Engine;

impl DigestEngine for Sha256Engine {
    fn sha256(&self, bytes: &[u8]) -> [u8; 32]
    {
        let mut hasher = Sha256::new();
        hasher.update(bytes);
        hasher.finalize().into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_vector()
    {
        let digest = Sha256Engine.sha256(b"");
        let expected = [
            0xe3, 0xb0, 0xc4, 0x42, 0x98, 0xfc, 0x1c, 0x14, 0x9a, 0xfb, 0xf4, 0xc8, 0x99, 0x6f,
            0xb9, 0x24, 0x27, 0xae, 0x41, 0xe4, 0x64, 0x9b, 0x93, 0x4c, 0xa4, 0x95, 0x99, 0x1b,
            0x78, 0x52, 0xb8, 0x55,
        ];

        assert_eq!(digest, expected);
    }

    #[test]
    fn differs_for_different_inputs()
    {
        assert_ne!(Sha256Engine.sha256(b"cat"), Sha256Engine.sha256(b"dog"));
    }
}
