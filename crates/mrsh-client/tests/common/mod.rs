//! Shared harness for the handshake integration tests: collaborator
//! stubs and a scripted in-process daemon.
//!
//! The stub daemon accepts the primary connection, parses the cleartext
//! stderr port and the signed credential, connects back on the stderr
//! port, and then follows a per-test script.

use std::collections::VecDeque;
use std::io::{Read, Write};
use std::net::{Ipv4Addr, TcpListener, TcpStream};
use std::thread::{self, JoinHandle};

use anyhow::Result;
use mrsh_client::{CredentialSigner, EntropyError, EntropySource, SignError, Target};
use mrsh_proto::wire::read_until_nul;

pub fn init_tracing() {
    let _ = tracing_subscriber::fmt().try_init();
}

/// Signer stub: replaces the payload's NUL separators with colons so the
/// stub daemon can recover the fields from the "token".
pub struct ColonSigner;

impl CredentialSigner for ColonSigner {
    fn sign(&self, payload: &[u8]) -> Result<Vec<u8>, SignError> {
        Ok(payload
            .iter()
            .map(|&b| if b == 0 { b':' } else { b })
            .collect())
    }
}

/// Signer stub that always refuses
pub struct DenySigner;

impl CredentialSigner for DenySigner {
    fn sign(&self, _payload: &[u8]) -> Result<Vec<u8>, SignError> {
        Err(SignError("credential expired".to_string()))
    }
}

/// Deterministic entropy: hands out queued nonce values in order
pub struct QueueEntropy(pub VecDeque<u32>);

impl EntropySource for QueueEntropy {
    fn fill(&mut self, buf: &mut [u8]) -> Result<(), EntropyError> {
        let value = self
            .0
            .pop_front()
            .ok_or_else(|| EntropyError::Unavailable("queue exhausted".to_string()))?;
        buf.copy_from_slice(&value.to_ne_bytes());
        Ok(())
    }
}

pub fn target(name: &str) -> Target {
    Target {
        hostname: format!("node-{name}"),
        addr: Ipv4Addr::new(127, 0, 0, 1),
        username: "operator".to_string(),
        command: "uname -a".to_string(),
    }
}

pub enum Script {
    /// Echo the right nonce, report success, then emit output on both channels
    Success {
        stdout: &'static [u8],
        stderr: &'static [u8],
    },
    /// Echo a wrong nonce followed by an error line on the stderr channel
    WrongNonce { trailing: &'static [u8] },
    /// Echo the right nonce but reject the command on the primary channel
    RemoteError { line: &'static [u8] },
    /// Report success, then wait for one relayed signal byte on the
    /// stderr channel and drain whatever arrives on the primary channel
    AwaitSignal,
}

pub struct Report {
    pub nonce_decimal: String,
    /// The byte read off the stderr channel after the handshake, if the
    /// script waits for one
    pub signal_byte: Option<u8>,
    /// Everything the client sent on the primary channel after the
    /// handshake completed
    pub primary_trailing: Vec<u8>,
}

/// Spawn the stub daemon for exactly one handshake.
pub fn spawn_daemon(script: Script) -> Result<(u16, JoinHandle<Report>)> {
    let listener = TcpListener::bind("127.0.0.1:0")?;
    let port = listener.local_addr()?.port();

    let handle = thread::spawn(move || {
        let (mut primary, _) = listener.accept().unwrap();
        let port_field = read_until_nul(&mut primary, 64).unwrap();
        let token = read_until_nul(&mut primary, 8192).unwrap();

        let stderr_port: u16 = String::from_utf8(port_field).unwrap().parse().unwrap();
        let fields: Vec<&[u8]> = token.split(|b| *b == b':').collect();
        let nonce_decimal = String::from_utf8(fields[3].to_vec()).unwrap();
        let nonce: u32 = nonce_decimal.parse().unwrap();

        let mut stderr = TcpStream::connect(("127.0.0.1", stderr_port)).unwrap();
        let mut signal_byte = None;
        let mut primary_trailing = Vec::new();
        match script {
            Script::Success {
                stdout,
                stderr: err_out,
            } => {
                stderr.write_all(&nonce.to_be_bytes()).unwrap();
                primary.write_all(&[0]).unwrap();
                primary.write_all(stdout).unwrap();
                stderr.write_all(err_out).unwrap();
            }
            Script::WrongNonce { trailing } => {
                stderr
                    .write_all(&nonce.wrapping_add(1).to_be_bytes())
                    .unwrap();
                stderr.write_all(trailing).unwrap();
                stderr.write_all(b"\n").unwrap();
            }
            Script::RemoteError { line } => {
                stderr.write_all(&nonce.to_be_bytes()).unwrap();
                primary.write_all(&[1]).unwrap();
                primary.write_all(line).unwrap();
                primary.write_all(b"\n").unwrap();
            }
            Script::AwaitSignal => {
                stderr.write_all(&nonce.to_be_bytes()).unwrap();
                primary.write_all(&[0]).unwrap();
                let mut byte = [0u8; 1];
                stderr.read_exact(&mut byte).unwrap();
                signal_byte = Some(byte[0]);
                primary.read_to_end(&mut primary_trailing).unwrap();
            }
        }
        Report {
            nonce_decimal,
            signal_byte,
            primary_trailing,
        }
    });

    Ok((port, handle))
}
