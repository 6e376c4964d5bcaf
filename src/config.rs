/*!
 * Probe Configuration
 *
 * The resolved settings the binary hands to the check: which Sentinel to
 * ask, which master to ask about, and the socket timeout to apply.
 */

use std::fmt;
use std::time::Duration;

/// Default Sentinel host
pub const DEFAULT_SENTINEL_HOST: &str = "127.0.0.1";
/// Default Sentinel port
pub const DEFAULT_SENTINEL_PORT: u16 = 26379;
/// Default connect/read/write timeout in seconds (0 disables it)
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// A host:port pair, either the Sentinel or a resolved master
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Endpoint {
    pub host: String,
    pub port: u16,
}

impl Endpoint {
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self { host: host.into(), port }
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.host, self.port)
    }
}

#[derive(Debug, Clone)]
pub struct ProbeConfig {
    /// Logical master name registered with the Sentinel
    pub master: String,
    /// Sentinel to query
    pub sentinel: Endpoint,
    /// Socket timeout applied by the TCP dialer; `None` blocks forever
    pub timeout: Option<Duration>,
}

impl ProbeConfig {
    /// Config for `master` using the default Sentinel endpoint and timeout
    pub fn new(master: impl Into<String>) -> Self {
        Self {
            master: master.into(),
            sentinel: Endpoint::new(DEFAULT_SENTINEL_HOST, DEFAULT_SENTINEL_PORT),
            timeout: timeout_from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }

    pub fn with_sentinel(mut self, sentinel: Endpoint) -> Self {
        self.sentinel = sentinel;
        self
    }

    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }
}

/// Seconds to an optional timeout, 0 meaning none
pub fn timeout_from_secs(secs: u64) -> Option<Duration> {
    (secs > 0).then(|| Duration::from_secs(secs))
}
