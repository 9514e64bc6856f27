//! Handshake error taxonomy
//!
//! Every failure resolves into a single terminal outcome for the whole
//! attempt; there is no partial success and no internal retry. Each
//! variant carries the target hostname plus whatever OS or
//! remote-supplied text is available, so the caller can render a precise
//! diagnostic per target.

use std::io;

use thiserror::Error;

use crate::entropy::EntropyError;
use crate::signer::SignError;
use mrsh_proto::ProtoError;

/// Handshake failures
#[derive(Debug, Error)]
pub enum McmdError {
    /// The target is the loopback name; the protocol only makes sense
    /// for genuinely remote peers
    #[error("{hostname}: mcmd: permission denied: cannot use localhost")]
    LocalhostRejected {
        /// Rejected target hostname
        hostname: String,
    },

    /// The system entropy source failed or ran short
    #[error("{hostname}: mcmd: {source}")]
    Entropy {
        /// Target hostname
        hostname: String,
        /// Underlying entropy failure
        source: EntropyError,
    },

    /// A local socket operation (create, bind, listen, accept, local
    /// address query) failed
    #[error("{hostname}: mcmd: {op} failed: {source}")]
    Socket {
        /// Target hostname
        hostname: String,
        /// The failing operation
        op: &'static str,
        /// Underlying OS error
        source: io::Error,
    },

    /// The TCP connection to the daemon could not be established
    #[error("{hostname}: mcmd: connect failed: {source}")]
    Connect {
        /// Target hostname
        hostname: String,
        /// Underlying OS error
        source: io::Error,
    },

    /// The daemon closed the connection mid-write (broken pipe),
    /// distinct from generic I/O failure
    #[error("{hostname}: mcmd: lost connection")]
    LostConnection {
        /// Target hostname
        hostname: String,
    },

    /// The credential payload could not be assembled
    #[error("{hostname}: mcmd: invalid credential payload: {source}")]
    Payload {
        /// Target hostname
        hostname: String,
        /// Underlying payload error
        source: ProtoError,
    },

    /// The external signing service refused to sign the credential
    #[error("{hostname}: mcmd: credential signing failed: {source}")]
    Signing {
        /// Target hostname
        hostname: String,
        /// Signing-service diagnostic
        source: SignError,
    },

    /// The daemon echoed a verification nonce that does not match ours;
    /// `message` is the remote-supplied error text, if any
    #[error("{hostname}: mcmd: verification failed: {message}")]
    AuthRejected {
        /// Target hostname
        hostname: String,
        /// Remote-supplied diagnostic read from the stderr channel
        message: String,
    },

    /// The daemon reported failure with a nonzero status byte
    #[error("{hostname}: mcmd: error from remote host: {message}")]
    RemoteError {
        /// Target hostname
        hostname: String,
        /// Remote-supplied diagnostic read from the primary channel
        message: String,
    },

    /// The peer violated the protocol (short read, malformed response,
    /// wrong address family on the connect-back)
    #[error("{hostname}: mcmd: protocol failure: {detail}")]
    Protocol {
        /// Target hostname
        hostname: String,
        /// What was malformed
        detail: String,
    },

    /// Generic I/O failure during the exchange
    #[error("{hostname}: mcmd: {op}: {source}")]
    Io {
        /// Target hostname
        hostname: String,
        /// The failing operation
        op: &'static str,
        /// Underlying OS error
        source: io::Error,
    },
}

impl McmdError {
    /// The target hostname this failure is about
    pub fn hostname(&self) -> &str {
        match self {
            Self::LocalhostRejected { hostname }
            | Self::Entropy { hostname, .. }
            | Self::Socket { hostname, .. }
            | Self::Connect { hostname, .. }
            | Self::LostConnection { hostname }
            | Self::Payload { hostname, .. }
            | Self::Signing { hostname, .. }
            | Self::AuthRejected { hostname, .. }
            | Self::RemoteError { hostname, .. }
            | Self::Protocol { hostname, .. }
            | Self::Io { hostname, .. } => hostname,
        }
    }

    /// Classify an I/O failure during a wire write: broken pipe becomes
    /// the distinct lost-connection kind.
    pub(crate) fn from_write(hostname: &str, op: &'static str, source: io::Error) -> Self {
        if source.kind() == io::ErrorKind::BrokenPipe {
            Self::LostConnection {
                hostname: hostname.to_string(),
            }
        } else {
            Self::Io {
                hostname: hostname.to_string(),
                op,
                source,
            }
        }
    }
}
