//! Credential signing seam
//!
//! The handshake proves the caller's identity with an opaque signed token
//! produced by an external trust service (munge, in the original
//! deployment) from the credential plaintext. The client never interprets
//! the token and never sends an unsigned credential: a signing failure
//! aborts the attempt before any credential byte reaches the wire.

use thiserror::Error;

/// A signing-service failure, carrying the service's diagnostic text
#[derive(Debug, Error)]
#[error("{0}")]
pub struct SignError(pub String);

/// External credential signing service.
///
/// Called synchronously with the exact plaintext payload; returns the
/// signed token as bytes free of interior NULs (the token is written to
/// the wire NUL-terminated).
pub trait CredentialSigner {
    /// Sign `payload`, returning the opaque token or a fatal failure.
    fn sign(&self, payload: &[u8]) -> Result<Vec<u8>, SignError>;
}
