/*!
 * Probe Error Types
 *
 * Every failure the RESP client or the check steps can hit. The check turns
 * each of these into a verdict before anything reaches the binary.
 */

use std::io;
use thiserror::Error;

/// Crate-wide result alias
pub type Result<T> = std::result::Result<T, ProbeError>;

#[derive(Debug, Error)]
pub enum ProbeError {
    /// Stream could not be opened, or failed while sending/receiving
    #[error("{0}")]
    Connection(#[from] io::Error),

    /// Peer answered with a `-` error reply
    #[error("{0}")]
    Protocol(String),

    /// Frame we could not make sense of
    #[error("unknown protocol: {0}")]
    UnknownProtocol(String),

    /// Sentinel had no usable address for the named master
    #[error("no master returned for {0}")]
    Resolution(String),

    /// Resolved host does not report itself as master
    #[error("role is {0} but should be master")]
    RoleMismatch(String),
}
