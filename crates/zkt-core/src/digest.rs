//! # SHA-256 Digests
//!
//! Every commitment in the overlay is a SHA-256 digest: custom token ids,
//! verification-key fingerprints, authenticated map nodes, mock proofs.
//! Multi-part inputs are always domain separated by a leading tag so that
//! no two commitment kinds can collide on the same preimage.

use sha2::{Digest, Sha256};

/// Compute SHA-256 over the concatenation of `parts`.
pub fn sha256(parts: &[&[u8]]) -> [u8; 32] {
    let mut acc = Sha256Accumulator::new();
    for part in parts {
        acc.update(part);
    }
    acc.finalize()
}

/// Incremental SHA-256 over raw byte segments.
#[derive(Debug, Clone, Default)]
pub struct Sha256Accumulator {
    hasher: Sha256,
}

impl Sha256Accumulator {
    /// Create an empty accumulator.
    pub fn new() -> Self {
        Self {
            hasher: Sha256::new(),
        }
    }

    /// Feed one segment.
    pub fn update(&mut self, data: &[u8]) {
        self.hasher.update(data);
    }

    /// Finish and return the raw 32-byte digest.
    pub fn finalize(self) -> [u8; 32] {
        let hash = self.hasher.finalize();
        let mut out = [0u8; 32];
        out.copy_from_slice(&hash);
        out
    }

    /// Finish and return the digest as lowercase hex.
    pub fn finalize_hex(self) -> String {
        crate::hex::encode(&self.finalize())
    }
}
