//! Credential plaintext payload assembly and parsing
//!
//! The plaintext handed to the credential signing service is part of the
//! wire contract with the remote daemon and must be reproduced byte-exact:
//! five NUL-terminated fields in order, with one extra trailing NUL after
//! the command:
//!
//! ```text
//!                                          SIZE         EXAMPLE
//! remote_user_name                         variable     "mhaskell"
//! '\0'
//! dotted_decimal_address_of_this_client    7-15 bytes   "134.9.11.155"
//! '\0'
//! stderr_port_number                       1-5 bytes    "50111"
//! '\0'
//! client_produced_random_number            1-10 bytes   "3103972197"
//! '\0'
//! users_command                            variable     "ls -al"
//! '\0' '\0'
//! ```

use std::net::Ipv4Addr;

use bytes::{BufMut, Bytes, BytesMut};

use crate::error::ProtoError;
use crate::nonce::Nonce;

/// The assembled credential plaintext, ready for signing
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CredentialPayload {
    bytes: Bytes,
}

/// The five fields recovered from a credential plaintext
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CredentialFields {
    /// Remote username the command runs as
    pub username: String,
    /// Dotted-decimal address of the client host
    pub client_addr: String,
    /// Port the daemon connects back to for stderr, as decimal text
    pub stderr_port: u16,
    /// The verification nonce, as sent
    pub nonce: u32,
    /// The command line, verbatim
    pub command: String,
}

fn check_field(field: &'static str, value: &str) -> Result<(), ProtoError> {
    if value.is_empty() {
        return Err(ProtoError::EmptyField { field });
    }
    if value.as_bytes().contains(&0) {
        return Err(ProtoError::EmbeddedNul { field });
    }
    Ok(())
}

impl CredentialPayload {
    /// Assemble the plaintext from its parts.
    ///
    /// The username and command are caller-supplied and are rejected if
    /// empty or containing interior NUL bytes, which would corrupt the
    /// framing. The address is rendered in dotted-decimal form via
    /// [`Ipv4Addr`]'s formatter, which is reentrant and safe under
    /// concurrent calls.
    pub fn assemble(
        username: &str,
        client_addr: Ipv4Addr,
        stderr_port: u16,
        nonce: Nonce,
        command: &str,
    ) -> Result<Self, ProtoError> {
        check_field("username", username)?;
        check_field("command", command)?;

        let addr = client_addr.to_string();
        let port = stderr_port.to_string();
        let nonce = nonce.to_decimal();

        let mut buf = BytesMut::with_capacity(
            username.len() + addr.len() + port.len() + nonce.len() + command.len() + 6,
        );
        for field in [username, &addr, &port, &nonce, command] {
            buf.put_slice(field.as_bytes());
            buf.put_u8(0);
        }
        // trailing NUL after the command; the remote parser expects it
        buf.put_u8(0);

        Ok(Self { bytes: buf.freeze() })
    }

    /// The exact bytes to hand to the signing service
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Total payload length including both terminating NULs
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// Whether the payload is empty (never true for an assembled payload)
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Split a plaintext back into its five fields.
    ///
    /// Inverse of [`CredentialPayload::assemble`]; used by tests and by
    /// daemon-side tooling.
    pub fn split(bytes: &[u8]) -> Result<CredentialFields, ProtoError> {
        let Some((&last, body)) = bytes.split_last() else {
            return Err(ProtoError::MalformedPayload("empty payload".into()));
        };
        if last != 0 {
            return Err(ProtoError::MalformedPayload(
                "missing trailing NUL after command".into(),
            ));
        }
        if body.last() != Some(&0) {
            return Err(ProtoError::MalformedPayload(
                "command field is not NUL-terminated".into(),
            ));
        }

        let fields: Vec<&[u8]> = body[..body.len() - 1].split(|b| *b == 0).collect();
        if fields.len() != 5 {
            return Err(ProtoError::MalformedPayload(format!(
                "expected 5 fields, found {}",
                fields.len()
            )));
        }

        let text = |field: &'static str, raw: &[u8]| -> Result<String, ProtoError> {
            String::from_utf8(raw.to_vec())
                .map_err(|_| ProtoError::MalformedPayload(format!("field `{field}` is not UTF-8")))
        };
        let stderr_port_text = text("stderr_port", fields[2])?;
        let nonce_text = text("nonce", fields[3])?;

        Ok(CredentialFields {
            username: text("username", fields[0])?,
            client_addr: text("client_addr", fields[1])?,
            stderr_port: stderr_port_text.parse().map_err(|_| ProtoError::InvalidDecimal {
                field: "stderr_port",
                value: stderr_port_text.clone(),
            })?,
            nonce: nonce_text.parse().map_err(|_| ProtoError::InvalidDecimal {
                field: "nonce",
                value: nonce_text.clone(),
            })?,
            command: text("command", fields[4])?,
        })
    }
}
