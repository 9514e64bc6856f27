//! # Mrsh Client
//!
//! Client side of the mrsh authenticated remote-command handshake.
//!
//! A single blocking call connects two TCP channels to a remote execution
//! daemon — a combined stdin/stdout channel and a daemon-initiated stderr
//! return channel — authenticates the caller with an externally signed
//! credential, binds the two channels together with a random verification
//! nonce, and hands both live streams to the caller.

#![warn(missing_docs)]

/// The handshake engine
pub mod client;

/// Entropy seam for nonce generation
pub mod entropy;

/// Handshake error taxonomy
pub mod error;

/// Established two-channel session
pub mod session;

/// Best-effort out-of-band signal relay
pub mod signal;

/// Credential signing seam
pub mod signer;

mod sigmask;

pub use client::{McmdClient, Target};
pub use entropy::{EntropyError, EntropySource, OsEntropy};
pub use error::McmdError;
pub use session::McmdSession;
pub use signal::mcmd_signal;
pub use signer::{CredentialSigner, SignError};
