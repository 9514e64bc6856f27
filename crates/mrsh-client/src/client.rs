//! The handshake engine
//!
//! One blocking call per target: connect the primary channel, listen for
//! the daemon's stderr connect-back, send the signed credential, verify
//! the echoed nonce, and read the final status byte. Every socket opened
//! along the way is owned by the engine until it is either handed to the
//! caller inside a session or dropped on the failure path.

use std::io::Read;
use std::net::{Ipv4Addr, SocketAddr, SocketAddrV4, TcpListener, TcpStream};

use socket2::{Domain, Protocol, Socket, Type};
use tracing::debug;

use crate::entropy::{EntropySource, OsEntropy};
use crate::error::McmdError;
use crate::session::McmdSession;
use crate::sigmask::SignalGuard;
use crate::signer::CredentialSigner;
use mrsh_proto::wire::{self, MRSH_PORT, NONCE_LEN, STATUS_OK};
use mrsh_proto::{CredentialPayload, Nonce};

/// One handshake target, owned by the caller for the duration of the call
#[derive(Debug, Clone)]
pub struct Target {
    /// Resolved hostname, used for diagnostics and the loopback check
    pub hostname: String,
    /// Resolved IPv4 address of the target
    pub addr: Ipv4Addr,
    /// Remote username the command runs as
    pub username: String,
    /// Command line for the remote shell
    pub command: String,
}

/// The mrsh handshake client.
///
/// Generic over its two external collaborators: the credential signing
/// service and the entropy source. Holds no per-call state, so one client
/// may be shared across sequential calls; concurrent calls should use
/// independent clients (each call uses only its own descriptors and
/// nonce, and signal masking is per thread).
#[derive(Debug)]
pub struct McmdClient<S, E = OsEntropy> {
    signer: S,
    entropy: E,
    daemon_port: u16,
}

impl<S: CredentialSigner> McmdClient<S, OsEntropy> {
    /// Create a client over the system entropy source
    pub fn new(signer: S) -> Self {
        Self::with_entropy(signer, OsEntropy)
    }
}

impl<S: CredentialSigner, E: EntropySource> McmdClient<S, E> {
    /// Create a client with an explicit entropy source
    pub fn with_entropy(signer: S, entropy: E) -> Self {
        Self {
            signer,
            entropy,
            daemon_port: MRSH_PORT,
        }
    }

    /// Override the daemon port (the well-known port otherwise)
    pub fn with_daemon_port(mut self, port: u16) -> Self {
        self.daemon_port = port;
        self
    }

    /// Run the full connect-authenticate-verify sequence against one
    /// target, returning the established session.
    ///
    /// Blocking throughout, with no internal timeout; any deadline policy
    /// belongs to the caller. Safe to invoke concurrently from multiple
    /// threads: SIGURG and SIGPIPE are blocked on the calling thread for
    /// the duration and restored on every exit path.
    pub fn connect(&mut self, target: &Target) -> Result<McmdSession, McmdError> {
        let _guard = SignalGuard::block_handshake_signals().map_err(|e| McmdError::Io {
            hostname: target.hostname.clone(),
            op: "block handshake signals",
            source: e,
        })?;
        let host = target.hostname.as_str();

        if host == "localhost" {
            return Err(McmdError::LocalhostRejected {
                hostname: host.to_string(),
            });
        }

        // The nonce comes first: if the entropy source is broken we must
        // find out before any socket is opened.
        let mut raw = [0u8; NONCE_LEN];
        self.entropy.fill(&mut raw).map_err(|e| McmdError::Entropy {
            hostname: host.to_string(),
            source: e,
        })?;
        let nonce = Nonce::from_bytes(raw);

        debug!(hostname = host, "mcmd: connecting primary channel");
        let mut primary = self.connect_primary(target)?;

        let listener = self.bind_stderr_listener(host)?;
        let stderr_port = listener
            .local_addr()
            .map_err(|e| McmdError::Socket {
                hostname: host.to_string(),
                op: "getsockname (stderr)",
                source: e,
            })?
            .port();
        debug!(hostname = host, stderr_port, "mcmd: stderr listener ready");

        let payload = CredentialPayload::assemble(
            &target.username,
            target.addr,
            stderr_port,
            nonce,
            &target.command,
        )
        .map_err(|e| McmdError::Payload {
            hostname: host.to_string(),
            source: e,
        })?;

        let token = self.signer.sign(payload.as_bytes()).map_err(|e| McmdError::Signing {
            hostname: host.to_string(),
            source: e,
        })?;

        // Stderr port goes over in the clear so the daemon can still
        // report a bad credential on a known channel if decoding fails.
        wire::write_nul_terminated(&mut primary, stderr_port.to_string().as_bytes())
            .map_err(|e| McmdError::from_write(host, "write stderr port", e))?;
        wire::write_nul_terminated(&mut primary, &token)
            .map_err(|e| McmdError::from_write(host, "write signed credential", e))?;

        let (mut stderr, peer) = listener.accept().map_err(|e| McmdError::Socket {
            hostname: host.to_string(),
            op: "accept (stderr)",
            source: e,
        })?;
        // only the accepted connection is kept
        drop(listener);
        if !matches!(peer, SocketAddr::V4(_)) {
            return Err(McmdError::Protocol {
                hostname: host.to_string(),
                detail: "protocol failure in circuit setup".to_string(),
            });
        }
        debug!(hostname = host, peer = %peer, "mcmd: stderr connect-back accepted");

        self.verify_nonce(host, nonce, &mut stderr)?;
        self.read_status(host, &mut primary)?;

        debug!(hostname = host, "mcmd: handshake complete");
        Ok(McmdSession::new(primary, stderr, stderr_port))
    }

    /// Open the primary socket, bind it to a wildcard local endpoint, and
    /// connect to the daemon.
    fn connect_primary(&self, target: &Target) -> Result<TcpStream, McmdError> {
        let host = target.hostname.as_str();
        let sock_err = |op: &'static str, e: std::io::Error| McmdError::Socket {
            hostname: host.to_string(),
            op,
            source: e,
        };

        let socket = Socket::new(Domain::IPV4, Type::STREAM, Some(Protocol::TCP))
            .map_err(|e| sock_err("socket (primary)", e))?;
        socket
            .bind(&SocketAddrV4::new(Ipv4Addr::UNSPECIFIED, 0).into())
            .map_err(|e| sock_err("bind (primary)", e))?;
        socket
            .connect(&SocketAddrV4::new(target.addr, self.daemon_port).into())
            .map_err(|e| McmdError::Connect {
                hostname: host.to_string(),
                source: e,
            })?;
        Ok(socket.into())
    }

    /// Bind the stderr connect-back listener on an ephemeral port with a
    /// backlog of exactly one pending connection.
    fn bind_stderr_listener(&self, host: &str) -> Result<TcpListener, McmdError> {
        let sock_err = |op: &'static str, e: std::io::Error| McmdError::Socket {
            hostname: host.to_string(),
            op,
            source: e,
        };

        let socket = Socket::new(Domain::IPV4, Type::STREAM, Some(Protocol::TCP))
            .map_err(|e| sock_err("socket (stderr)", e))?;
        socket
            .bind(&SocketAddrV4::new(Ipv4Addr::UNSPECIFIED, 0).into())
            .map_err(|e| sock_err("bind (stderr)", e))?;
        socket.listen(1).map_err(|e| sock_err("listen (stderr)", e))?;
        Ok(socket.into())
    }

    /// Read the daemon's 4-byte nonce echo from the stderr channel and
    /// compare it with ours. On mismatch the remainder of the stream is
    /// the daemon's human-readable error report.
    fn verify_nonce(
        &self,
        host: &str,
        nonce: Nonce,
        stderr: &mut TcpStream,
    ) -> Result<(), McmdError> {
        let mut echo = [0u8; NONCE_LEN];
        stderr.read_exact(&mut echo).map_err(|e| {
            if e.kind() == std::io::ErrorKind::UnexpectedEof {
                McmdError::Protocol {
                    hostname: host.to_string(),
                    detail: "short read of verification number on stderr channel".to_string(),
                }
            } else {
                McmdError::Io {
                    hostname: host.to_string(),
                    op: "read verification number",
                    source: e,
                }
            }
        })?;

        if nonce.matches_echo(echo) {
            return Ok(());
        }

        debug!(hostname = host, ?echo, "mcmd: verification number mismatch");
        let message = wire::read_error_line(stderr).map_err(|e| McmdError::Io {
            hostname: host.to_string(),
            op: "read error from stderr channel",
            source: e,
        })?;
        Err(McmdError::AuthRejected {
            hostname: host.to_string(),
            message,
        })
    }

    /// Read the final status byte from the primary channel; anything but
    /// NUL is a remote-reported failure followed by one line of text.
    fn read_status(&self, host: &str, primary: &mut TcpStream) -> Result<(), McmdError> {
        let mut status = [0u8; 1];
        let n = primary.read(&mut status).map_err(|e| McmdError::Io {
            hostname: host.to_string(),
            op: "read status byte",
            source: e,
        })?;
        if n != 1 {
            return Err(McmdError::Protocol {
                hostname: host.to_string(),
                detail: "connection closed before status byte".to_string(),
            });
        }
        if status[0] == STATUS_OK {
            return Ok(());
        }

        let message = wire::read_error_line(primary).map_err(|e| McmdError::Io {
            hostname: host.to_string(),
            op: "read error from remote host",
            source: e,
        })?;
        Err(McmdError::RemoteError {
            hostname: host.to_string(),
            message,
        })
    }
}
