//! Best-effort out-of-band signal relay
//!
//! After a session is established, the caller can nudge the remote side
//! (e.g. to interrupt the running command) by writing a single byte that
//! encodes the signal number on either established channel. Delivery is
//! best effort: there is no acknowledgement and no fallback if the write
//! fails.

use std::io::Write;
use std::net::TcpStream;

use tracing::{debug, warn};

/// Relay `signum` to the remote side of an established channel.
///
/// The stream is switched to non-blocking mode so the relay can never
/// stall the caller; failure to switch modes is logged but the write is
/// still attempted, and a failed or partial write is silently ignored.
pub fn mcmd_signal(stream: &TcpStream, signum: i32) {
    if let Err(e) = stream.set_nonblocking(true) {
        warn!("mcmd_signal: failed to set non-blocking mode: {e}");
    }
    let byte = [signum as u8];
    match (&mut &*stream).write(&byte) {
        Ok(1) => debug!("relayed signal {signum} to remote"),
        Ok(_) | Err(_) => {}
    }
}
