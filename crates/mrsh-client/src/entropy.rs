//! Entropy seam for nonce generation
//!
//! The verification nonce is the sole defense against cross-connection
//! confusion on the stderr side channel, so it must come from a
//! cryptographically strong source and any failure of that source is
//! fatal to the attempt. There is no weaker fallback.

use rand::rngs::OsRng;
use rand::RngCore;
use thiserror::Error;

/// Entropy source failures
#[derive(Debug, Error)]
pub enum EntropyError {
    /// The system entropy source could not be read
    #[error("entropy source unavailable: {0}")]
    Unavailable(String),

    /// The source produced fewer bytes than requested
    #[error("entropy source returned too few bytes ({got} of {want})")]
    ShortRead {
        /// Bytes actually produced
        got: usize,
        /// Bytes requested
        want: usize,
    },
}

/// Source of random bytes for the verification nonce.
///
/// The production implementation is [`OsEntropy`]; tests substitute
/// deterministic or failing sources.
pub trait EntropySource {
    /// Fill `buf` completely with random bytes, or fail.
    fn fill(&mut self, buf: &mut [u8]) -> Result<(), EntropyError>;
}

/// System entropy via the operating system's secure generator
#[derive(Debug, Default, Clone, Copy)]
pub struct OsEntropy;

impl EntropySource for OsEntropy {
    fn fill(&mut self, buf: &mut [u8]) -> Result<(), EntropyError> {
        OsRng
            .try_fill_bytes(buf)
            .map_err(|e| EntropyError::Unavailable(e.to_string()))
    }
}
