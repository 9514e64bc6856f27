//! Established two-channel session
//!
//! The result of a successful handshake: the primary stdin/stdout stream
//! and the daemon-initiated stderr stream. Both descriptors are owned by
//! the session; dropping it closes whatever the caller has not taken.

use std::net::TcpStream;

use crate::signal::mcmd_signal;

/// A live, authenticated mrsh session
#[derive(Debug)]
pub struct McmdSession {
    primary: TcpStream,
    stderr: TcpStream,
    stderr_port: u16,
}

impl McmdSession {
    pub(crate) fn new(primary: TcpStream, stderr: TcpStream, stderr_port: u16) -> Self {
        Self {
            primary,
            stderr,
            stderr_port,
        }
    }

    /// The combined stdin/stdout channel
    pub fn primary(&self) -> &TcpStream {
        &self.primary
    }

    /// Mutable access to the stdin/stdout channel
    pub fn primary_mut(&mut self) -> &mut TcpStream {
        &mut self.primary
    }

    /// The stderr return channel
    pub fn stderr(&self) -> &TcpStream {
        &self.stderr
    }

    /// Mutable access to the stderr channel
    pub fn stderr_mut(&mut self) -> &mut TcpStream {
        &mut self.stderr
    }

    /// The local port the daemon connected back to for stderr
    pub fn stderr_port(&self) -> u16 {
        self.stderr_port
    }

    /// Best-effort relay of `signum` to the remote side on the stderr
    /// channel, the daemon's signal path; see [`mcmd_signal`]
    pub fn signal(&self, signum: i32) {
        mcmd_signal(&self.stderr, signum);
    }

    /// Take ownership of both streams, consuming the session
    pub fn into_streams(self) -> (TcpStream, TcpStream) {
        (self.primary, self.stderr)
    }
}
