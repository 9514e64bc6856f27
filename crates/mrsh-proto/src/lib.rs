//! # Mrsh Protocol
//!
//! Wire-format definitions shared by the mrsh handshake client and its
//! tests: protocol constants, NUL/line framing helpers, the verification
//! nonce, and the credential plaintext payload handed to the signing
//! service.

#![warn(missing_docs)]

/// Protocol constants and byte-level framing helpers
pub mod wire;

/// Verification nonce binding the stderr channel to its session
pub mod nonce;

/// Credential plaintext payload assembly and parsing
pub mod credential;

/// Error types for wire-format operations
pub mod error;

pub use credential::{CredentialFields, CredentialPayload};
pub use error::ProtoError;
pub use nonce::Nonce;
pub use wire::{MRSH_PORT, NONCE_LEN, STATUS_OK};
