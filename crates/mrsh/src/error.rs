//! Error types for mrsh operations

use thiserror::Error;

use mrsh_client::McmdError;
use mrsh_proto::ProtoError;

/// Main error type for mrsh operations
#[derive(Debug, Error)]
pub enum MrshError {
    /// Configuration or precondition errors (loopback target, invalid
    /// payload fields)
    #[error("configuration error: {0}")]
    Config(String),

    /// Local resource errors (entropy source, socket setup)
    #[error("resource error: {0}")]
    Resource(String),

    /// Connection establishment or loss
    #[error("connection error: {0}")]
    Connection(String),

    /// Authentication errors (signing failure, nonce mismatch)
    #[error("authentication error: {0}")]
    Auth(String),

    /// Failure reported by the remote daemon
    #[error("remote error: {0}")]
    Remote(String),

    /// Wire-protocol violations
    #[error("protocol error: {0}")]
    Protocol(String),

    /// Generic transport I/O failure
    #[error("transport error: {0}")]
    Transport(String),
}

impl From<McmdError> for MrshError {
    fn from(err: McmdError) -> Self {
        let msg = err.to_string();
        match err {
            McmdError::LocalhostRejected { .. } | McmdError::Payload { .. } => Self::Config(msg),
            McmdError::Entropy { .. } | McmdError::Socket { .. } => Self::Resource(msg),
            McmdError::Connect { .. } | McmdError::LostConnection { .. } => Self::Connection(msg),
            McmdError::Signing { .. } | McmdError::AuthRejected { .. } => Self::Auth(msg),
            McmdError::RemoteError { .. } => Self::Remote(msg),
            McmdError::Protocol { .. } => Self::Protocol(msg),
            McmdError::Io { .. } => Self::Transport(msg),
        }
    }
}

impl From<ProtoError> for MrshError {
    fn from(err: ProtoError) -> Self {
        Self::Protocol(err.to_string())
    }
}
