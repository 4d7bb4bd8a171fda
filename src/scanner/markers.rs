//! Probe marker generation

use rand::RngCore;

/// Bytes of randomness in a reflection marker (24 hex characters)
pub const REFLECTION_MARKER_BYTES: usize = 12;

/// Bytes of randomness on each side of a probed character
pub const CHAR_MARKER_HALF_BYTES: usize = 4;

/// Source of random hex strings used as probe values
pub trait MarkerSource: Send + Sync {
    /// Returns `len` random bytes, hex-encoded
    fn random_hex(&self, len: usize) -> String;
}

/// Thread-local RNG backed marker source
#[derive(Debug, Default, Clone, Copy)]
pub struct RandomMarkers;

impl MarkerSource for RandomMarkers {
    fn random_hex(&self, len: usize) -> String {
        let mut bytes = vec![0u8; len];
        rand::thread_rng().fill_bytes(&mut bytes);
        to_hex(&bytes)
    }
}

pub(crate) fn to_hex(bytes: &[u8]) -> String {
    bytes.iter().map(|b| format!("{b:02x}")).collect()
}

/// A fresh value for the two-stage reflection check
pub fn reflection_marker(source: &dyn MarkerSource) -> String {
    source.random_hex(REFLECTION_MARKER_BYTES)
}

/// `px<hex><c><hex>`: the character is only reported if it comes back between both halves
pub fn char_marker(source: &dyn MarkerSource, c: char) -> String {
    format!(
        "px{}{}{}",
        source.random_hex(CHAR_MARKER_HALF_BYTES),
        c,
        source.random_hex(CHAR_MARKER_HALF_BYTES)
    )
}
