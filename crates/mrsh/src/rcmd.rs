//! The transport contract and its mrsh implementation
//!
//! `Rcmd` is the stable seam the surrounding system drives: connect to
//! one resolved target and hand back the session's live channels, plus a
//! best-effort signal relay on an established channel. Alternate
//! transports (e.g. spawning a local helper process where no network
//! daemon exists) implement the same contract; only the mrsh transport
//! lives here.

use std::net::TcpStream;

use crate::Result;
use mrsh_client::{mcmd_signal, CredentialSigner, McmdClient, McmdSession, Target};

/// A transport that can run a command on one remote target
pub trait Rcmd {
    /// Connect and authenticate to `target`, returning live channels
    fn rcmd(&mut self, target: &Target) -> Result<McmdSession>;

    /// Best-effort out-of-band relay of `signum` on an established channel
    fn rcmd_signal(&self, stream: &TcpStream, signum: i32);
}

/// The mrsh implementation of [`Rcmd`]
#[derive(Debug)]
pub struct MrshRcmd<S> {
    client: McmdClient<S>,
}

impl<S: CredentialSigner> MrshRcmd<S> {
    /// Create the transport over a credential signing service
    pub fn new(signer: S) -> Self {
        Self {
            client: McmdClient::new(signer),
        }
    }
}

impl<S: CredentialSigner> Rcmd for MrshRcmd<S> {
    fn rcmd(&mut self, target: &Target) -> Result<McmdSession> {
        Ok(self.client.connect(target)?)
    }

    fn rcmd_signal(&self, stream: &TcpStream, signum: i32) {
        mcmd_signal(stream, signum);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::MrshError;
    use mrsh_client::SignError;
    use std::net::Ipv4Addr;

    struct NeverSigner;

    impl CredentialSigner for NeverSigner {
        fn sign(&self, _payload: &[u8]) -> std::result::Result<Vec<u8>, SignError> {
            panic!("signer must not be reached");
        }
    }

    #[test]
    fn test_loopback_is_a_config_error_through_the_trait() {
        let mut transport: Box<dyn Rcmd> = Box::new(MrshRcmd::new(NeverSigner));
        let target = Target {
            hostname: "localhost".to_string(),
            addr: Ipv4Addr::LOCALHOST,
            username: "operator".to_string(),
            command: "true".to_string(),
        };
        let err = transport.rcmd(&target).unwrap_err();
        assert!(matches!(err, MrshError::Config(_)));
    }
}
