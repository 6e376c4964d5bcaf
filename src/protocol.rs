/*!
 * Redis RESP Protocol Implementation
 *
 * This module implements the client side of the Redis Serialization Protocol
 * (RESP): encoding commands as arrays of bulk strings, and decoding exactly
 * one reply frame at a time from a buffered stream. Decoding is byte-counted:
 * a line is read for the type prefix and length, then bulk payloads are read
 * by their declared size.
 */

use crate::error::{ProbeError, Result};
use bytes::{BufMut, Bytes, BytesMut};
use hashbrown::HashMap;
use std::io::{self, BufRead, Read};

/// Largest bulk payload we accept (Redis' own proto-max-bulk-len default)
const MAX_BULK_LEN: i64 = 512 * 1024 * 1024;
/// Longest type/length line we read before giving up on the peer
const MAX_LINE: u64 = 64 * 1024;
/// Deepest array nesting we decode
const MAX_DEPTH: usize = 512;

/// Fields of an INFO reply
pub type InfoMap = HashMap<String, String>;

/// One decoded reply frame
///
/// Null bulk strings and null arrays are kept distinct from empty ones.
#[derive(Debug, Clone, PartialEq)]
pub enum Reply {
    /// +OK
    Simple(String),
    /// :42
    Integer(i64),
    /// -ERR message
    Error(String),
    /// $<len> payload, `None` for $-1
    Bulk(Option<Bytes>),
    /// *<count> nested replies, `None` for *-1 and *0
    Array(Option<Vec<Reply>>),
}

impl Reply {
    /// Text form of a scalar reply
    ///
    /// Simple strings, non-null bulk strings and integers have one; errors,
    /// nulls and arrays do not.
    pub fn as_text(&self) -> Option<String> {
        match self {
            Reply::Simple(s) => Some(s.clone()),
            Reply::Integer(i) => Some(i.to_string()),
            Reply::Bulk(Some(b)) => Some(String::from_utf8_lossy(b).into_owned()),
            _ => None,
        }
    }

    /// Fail on the first error reply found, at any depth
    pub fn into_result(self) -> Result<Reply> {
        match self {
            Reply::Error(msg) => Err(ProbeError::Protocol(msg)),
            Reply::Array(Some(items)) => {
                let items = items
                    .into_iter()
                    .map(Reply::into_result)
                    .collect::<Result<Vec<_>>>()?;
                Ok(Reply::Array(Some(items)))
            }
            other => Ok(other),
        }
    }
}

//
// Request encoding
//

/// Encode a command and its arguments as one request frame
///
/// Format: *<argc>\r\n then $<len>\r\n<arg>\r\n for the command name and
/// each argument in order.
pub fn encode_command<A: AsRef<[u8]>>(command: &str, args: &[A]) -> BytesMut {
    let body: usize = args.iter().map(|a| a.as_ref().len() + 16).sum();
    let mut out = BytesMut::with_capacity(16 + command.len() + 16 + body);
    write_array_len(1 + args.len(), &mut out);
    write_bulk(command.as_bytes(), &mut out);
    for arg in args {
        write_bulk(arg.as_ref(), &mut out);
    }
    out
}

/// Append an array header (*<n>\r\n)
pub fn write_array_len(n: usize, out: &mut BytesMut) {
    out.put_u8(b'*');
    out.extend_from_slice(n.to_string().as_bytes());
    out.extend_from_slice(b"\r\n");
}

/// Append a bulk string ($<len>\r\n<data>\r\n)
pub fn write_bulk(b: &[u8], out: &mut BytesMut) {
    out.put_u8(b'$');
    out.extend_from_slice(b.len().to_string().as_bytes());
    out.extend_from_slice(b"\r\n");
    out.extend_from_slice(b);
    out.extend_from_slice(b"\r\n");
}

//
// Reply decoding
//

/// Read one reply, turning any error reply into `ProbeError::Protocol`
pub fn read_reply<R: BufRead>(reader: &mut R) -> Result<Reply> {
    decode_frame(reader)?.into_result()
}

/// Decode exactly one frame, recursing into arrays
///
/// Error replies come back as `Reply::Error`; use [`read_reply`] to have
/// them fail the call instead.
pub fn decode_frame<R: BufRead>(reader: &mut R) -> Result<Reply> {
    decode_nested(reader, 0)
}

fn decode_nested<R: BufRead>(reader: &mut R, depth: usize) -> Result<Reply> {
    if depth > MAX_DEPTH {
        return Err(ProbeError::UnknownProtocol("nesting too deep".into()));
    }
    let line = read_line(reader)?;
    let Some((&prefix, rest)) = line.split_first() else {
        return Err(ProbeError::UnknownProtocol("empty reply line".into()));
    };

    match prefix {
        b'+' => Ok(Reply::Simple(String::from_utf8_lossy(rest).into_owned())),
        b'-' => Ok(Reply::Error(String::from_utf8_lossy(rest).into_owned())),
        b':' => Ok(Reply::Integer(parse_decimal(rest)?)),
        b'$' => {
            let len = parse_decimal(rest)?;
            if len < 0 {
                return Ok(Reply::Bulk(None));
            }
            if len > MAX_BULK_LEN {
                return Err(ProbeError::UnknownProtocol(format!(
                    "bulk length {} too large",
                    len
                )));
            }
            let len = len as usize;
            // Payload plus its trailing \r\n; grows only as bytes arrive
            let mut buf = Vec::with_capacity(len.min(64 * 1024) + 2);
            reader.by_ref().take(len as u64 + 2).read_to_end(&mut buf)?;
            if buf.len() < len + 2 {
                return Err(unexpected_eof());
            }
            if &buf[len..] != b"\r\n" {
                return Err(ProbeError::UnknownProtocol(
                    "bulk payload not terminated by CRLF".into(),
                ));
            }
            buf.truncate(len);
            Ok(Reply::Bulk(Some(Bytes::from(buf))))
        }
        b'*' => {
            let n = parse_decimal(rest)?;
            if n <= 0 {
                return Ok(Reply::Array(None));
            }
            let mut items = Vec::with_capacity(n.min(1024) as usize);
            for _ in 0..n {
                items.push(decode_nested(reader, depth + 1)?);
            }
            Ok(Reply::Array(Some(items)))
        }
        other => Err(ProbeError::UnknownProtocol(format!(
            "unexpected reply prefix {:?}",
            other as char
        ))),
    }
}

/// Read one CRLF-terminated line, without the terminator
fn read_line<R: BufRead>(reader: &mut R) -> Result<Vec<u8>> {
    let mut line = Vec::with_capacity(64);
    let n = reader.by_ref().take(MAX_LINE).read_until(b'\n', &mut line)?;
    if line.last() != Some(&b'\n') {
        if n as u64 >= MAX_LINE {
            return Err(ProbeError::UnknownProtocol("reply line too long".into()));
        }
        return Err(unexpected_eof());
    }
    if !line.ends_with(b"\r\n") {
        return Err(ProbeError::UnknownProtocol("expected CRLF".into()));
    }
    line.truncate(line.len() - 2);
    Ok(line)
}

fn unexpected_eof() -> ProbeError {
    ProbeError::Connection(io::Error::new(
        io::ErrorKind::UnexpectedEof,
        "connection closed before reply was complete",
    ))
}

/// Parse a signed decimal RESP field (lengths and integers)
///
/// Covers the full i64 range, `i64::MIN` included.
fn parse_decimal(s: &[u8]) -> Result<i64> {
    std::str::from_utf8(s)
        .ok()
        .and_then(|s| s.parse::<i64>().ok())
        .ok_or_else(|| {
            ProbeError::UnknownProtocol(format!(
                "invalid number {:?}",
                String::from_utf8_lossy(s)
            ))
        })
}

/// Fold an INFO payload into its fields
///
/// Lines without a `:` (section headers, blank lines) are dropped; the rest
/// split on the first `:`. A repeated key keeps its last value.
pub fn parse_info(payload: &[u8]) -> InfoMap {
    String::from_utf8_lossy(payload)
        .lines()
        .filter_map(|line| line.split_once(':'))
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}
