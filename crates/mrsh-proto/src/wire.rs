//! Protocol constants and byte-level framing helpers
//!
//! The mrsh wire protocol frames its textual fields with NUL terminators
//! and its error diagnostics as single newline-terminated lines. The
//! helpers here operate on any blocking [`Read`]/[`Write`] so the same
//! framing is usable against sockets in the client and against in-memory
//! buffers in tests.

use std::io::{self, Read, Write};

/// Well-known TCP port the mrsh daemon listens on
pub const MRSH_PORT: u16 = 21212;

/// Length in bytes of the verification nonce on the wire
pub const NONCE_LEN: usize = 4;

/// Status byte sent by the daemon on the primary channel after it has
/// accepted the credential
pub const STATUS_OK: u8 = 0;

/// Upper bound on a single remote-supplied error line
pub const ERROR_LINE_MAX: usize = 2048;

/// Write `data` followed by a single NUL terminator, transferring the
/// full length or failing.
pub fn write_nul_terminated<W: Write>(writer: &mut W, data: &[u8]) -> io::Result<()> {
    writer.write_all(data)?;
    writer.write_all(&[0u8])
}

/// Read bytes up to (and consuming) the next NUL terminator.
///
/// Returns the bytes before the terminator. Hitting end-of-stream or the
/// `limit` before a NUL is seen is an [`io::ErrorKind::UnexpectedEof`] /
/// [`io::ErrorKind::InvalidData`] error respectively.
pub fn read_until_nul<R: Read>(reader: &mut R, limit: usize) -> io::Result<Vec<u8>> {
    let mut out = Vec::new();
    let mut byte = [0u8; 1];
    loop {
        if reader.read(&mut byte)? == 0 {
            return Err(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                "stream ended before NUL terminator",
            ));
        }
        if byte[0] == 0 {
            return Ok(out);
        }
        out.push(byte[0]);
        if out.len() > limit {
            return Err(io::Error::new(
                io::ErrorKind::InvalidData,
                "NUL-terminated field exceeds limit",
            ));
        }
    }
}

/// Read one line of human-readable error text, up to a newline,
/// end-of-stream, or [`ERROR_LINE_MAX`] bytes.
///
/// The newline is consumed but not returned; a trailing carriage return
/// is stripped. Bytes are read one at a time so nothing past the line is
/// consumed from the stream.
pub fn read_error_line<R: Read>(reader: &mut R) -> io::Result<String> {
    let mut out = Vec::new();
    let mut byte = [0u8; 1];
    while out.len() < ERROR_LINE_MAX {
        if reader.read(&mut byte)? == 0 {
            break;
        }
        if byte[0] == b'\n' {
            break;
        }
        out.push(byte[0]);
    }
    if out.last() == Some(&b'\r') {
        out.pop();
    }
    Ok(String::from_utf8_lossy(&out).into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn test_write_nul_terminated() {
        let mut buf = Vec::new();
        write_nul_terminated(&mut buf, b"50111").unwrap();
        assert_eq!(buf, b"50111\0");
    }

    #[test]
    fn test_read_until_nul() {
        let mut cursor = Cursor::new(b"50111\0rest".to_vec());
        let field = read_until_nul(&mut cursor, 64).unwrap();
        assert_eq!(field, b"50111");
        // the terminator is consumed, the remainder is not
        assert_eq!(cursor.position(), 6);
    }

    #[test]
    fn test_read_until_nul_eof() {
        let mut cursor = Cursor::new(b"unterminated".to_vec());
        let err = read_until_nul(&mut cursor, 64).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::UnexpectedEof);
    }

    #[test]
    fn test_read_until_nul_limit() {
        let mut cursor = Cursor::new(b"toolong\0".to_vec());
        let err = read_until_nul(&mut cursor, 3).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::InvalidData);
    }

    #[test]
    fn test_read_error_line_newline() {
        let mut cursor = Cursor::new(b"permission denied\nmore".to_vec());
        assert_eq!(read_error_line(&mut cursor).unwrap(), "permission denied");
    }

    #[test]
    fn test_read_error_line_eof_and_crlf() {
        let mut cursor = Cursor::new(b"cut short".to_vec());
        assert_eq!(read_error_line(&mut cursor).unwrap(), "cut short");

        let mut cursor = Cursor::new(b"windows daemon\r\n".to_vec());
        assert_eq!(read_error_line(&mut cursor).unwrap(), "windows daemon");
    }
}
