// Core modules for the Sentinel master check
pub mod error; // ProbeError + Result alias
pub mod config; // Endpoint + ProbeConfig defaults
pub mod protocol; // RESP request encoder + reply decoder + INFO parsing
pub mod client; // Dialer/TcpDialer + blocking RespClient
pub mod report; // Severity + CheckResult aggregation
pub mod sentinel; // run_check (two-hop resolve and verify)

// Re-export all public items from modules for easier access
pub use error::*;
pub use config::*;
pub use protocol::*;
pub use client::*;
pub use report::*;
pub use sentinel::*;
