//! Scoped signal masking for the handshake
//!
//! SIGURG (TCP urgent data on the new sockets) and SIGPIPE (write to a
//! peer that closed its end) are blocked for the duration of the
//! handshake and restored on every exit path. Only the calling thread's
//! mask is touched, so concurrent handshakes on other threads are
//! unaffected.

use std::io;

use nix::sys::signal::{pthread_sigmask, SigSet, Signal, SigmaskHow};

/// Blocks SIGURG and SIGPIPE on the current thread; the previous mask is
/// restored when the guard is dropped.
#[derive(Debug)]
pub(crate) struct SignalGuard {
    prev: SigSet,
}

impl SignalGuard {
    pub(crate) fn block_handshake_signals() -> io::Result<Self> {
        let mut blockme = SigSet::empty();
        blockme.add(Signal::SIGURG);
        blockme.add(Signal::SIGPIPE);
        let mut prev = SigSet::empty();
        pthread_sigmask(SigmaskHow::SIG_BLOCK, Some(&blockme), Some(&mut prev))
            .map_err(io::Error::from)?;
        Ok(Self { prev })
    }
}

impl Drop for SignalGuard {
    fn drop(&mut self) {
        // restoring the saved mask cannot meaningfully fail here
        let _ = pthread_sigmask(SigmaskHow::SIG_SETMASK, Some(&self.prev), None);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mask_is_scoped_to_guard_lifetime() {
        let before = SigSet::thread_get_mask().unwrap();
        {
            let _guard = SignalGuard::block_handshake_signals().unwrap();
            let masked = SigSet::thread_get_mask().unwrap();
            assert!(masked.contains(Signal::SIGURG));
            assert!(masked.contains(Signal::SIGPIPE));
        }
        let after = SigSet::thread_get_mask().unwrap();
        assert_eq!(
            after.contains(Signal::SIGURG),
            before.contains(Signal::SIGURG)
        );
        assert_eq!(
            after.contains(Signal::SIGPIPE),
            before.contains(Signal::SIGPIPE)
        );
    }
}
