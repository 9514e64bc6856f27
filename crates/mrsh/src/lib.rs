//! # Mrsh
//!
//! Authenticated remote-command transport over the mrsh protocol.
//!
//! The mrsh handshake connects two TCP channels to a remote execution
//! daemon, authenticates with an externally signed credential, and hands
//! back live stdin/stdout and stderr streams. This crate is the public
//! facade: the [`Rcmd`] transport contract, the crate-level error type,
//! and re-exports of the handshake client and wire-format layers.

#![warn(missing_docs)]

pub use mrsh_proto as proto;

/// Error types for mrsh operations
pub mod error;

/// The transport contract and its mrsh implementation
pub mod rcmd;

pub use error::MrshError;
pub use mrsh_client::{
    mcmd_signal, CredentialSigner, EntropySource, McmdClient, McmdError, McmdSession, OsEntropy,
    SignError, Target,
};
pub use rcmd::{MrshRcmd, Rcmd};

/// Result type alias for mrsh operations
pub type Result<T> = std::result::Result<T, MrshError>;
