//! Verification nonce binding the stderr channel to its session
//!
//! The client draws four random bytes at the start of every handshake
//! attempt and sends their decimal rendering inside the signed credential.
//! The daemon echoes the value back in network byte order as the first
//! four bytes on the stderr connection; an echo that does not match is a
//! hard authentication failure.

use crate::wire::NONCE_LEN;

/// A one-time 32-bit verification value, fresh per handshake attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Nonce(u32);

impl Nonce {
    /// Build a nonce from raw entropy bytes
    pub fn from_bytes(bytes: [u8; NONCE_LEN]) -> Self {
        Self(u32::from_ne_bytes(bytes))
    }

    /// The nonce value
    pub fn value(self) -> u32 {
        self.0
    }

    /// Decimal rendering embedded in the credential payload
    pub fn to_decimal(self) -> String {
        self.0.to_string()
    }

    /// Check the daemon's network-byte-order echo against this nonce
    pub fn matches_echo(self, echo: [u8; NONCE_LEN]) -> bool {
        u32::from_be_bytes(echo) == self.0
    }
}

impl std::fmt::Display for Nonce {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_echo_is_network_order() {
        let nonce = Nonce::from_bytes(0x01020304u32.to_ne_bytes());
        assert!(nonce.matches_echo([0x01, 0x02, 0x03, 0x04]));
        assert!(!nonce.matches_echo([0x04, 0x03, 0x02, 0x01]));
    }

    #[test]
    fn test_decimal_rendering() {
        let nonce = Nonce::from_bytes(50111u32.to_ne_bytes());
        assert_eq!(nonce.to_decimal(), "50111");
        assert_eq!(nonce.to_string(), "50111");
    }
}
