/*!
 * Sentinel Master Check
 *
 * The two-hop probe: ask the Sentinel where the named master lives, connect
 * there, and confirm through INFO that it reports `role:master`.
 *
 * Steps run in a fixed order. Connection and resolution failures end the
 * check immediately with a critical verdict; a wrong role is recorded but
 * the check still completes.
 */

use crate::client::{Dialer, RespClient};
use crate::config::{Endpoint, ProbeConfig};
use crate::error::{ProbeError, Result};
use crate::protocol::{InfoMap, Reply};
use crate::report::{CheckResult, Halt, Severity};
use log::{info, warn};

/// Outcome of a step: carry on with a value, or stop with a verdict
type Step<T> = std::result::Result<T, Halt>;

/// Run the whole check against `config` and return its result
///
/// Never fails: every error is turned into a verdict and a fragment.
pub fn run_check<D: Dialer>(dialer: &D, config: &ProbeConfig) -> CheckResult {
    let mut result = CheckResult::new();
    if let Err(halt) = check_master(dialer, config, &mut result) {
        warn!("{}: {}", halt.severity, halt.message);
        result.halt(halt);
    }
    result
}

fn check_master<D: Dialer>(dialer: &D, config: &ProbeConfig, result: &mut CheckResult) -> Step<()> {
    let mut sentinel = RespClient::new(dialer, config.sentinel.clone());
    sentinel.connect().map_err(|e| {
        Halt::critical(format!("could not connect to sentinel {}: {}", config.sentinel, e))
    })?;

    let addr = resolve_master(&mut sentinel, &config.master)
        .map_err(|e| Halt::critical(e.to_string()))?;
    info!("sentinel {} reports master {} at {}", config.sentinel, config.master, addr);

    let mut master = RespClient::new(dialer, addr.clone());
    let fields = master
        .info()
        .map_err(|_| Halt::critical(format!("master {} unreachable at {}", config.master, addr)))?;

    result.add_message(format!("master is {}", addr));

    if let Err(e) = verify_role(&fields) {
        result.report(Severity::Critical, e.to_string());
    }

    master.close();
    sentinel.close();
    Ok(())
}

/// SENTINEL GET-MASTER-ADDR-BY-NAME, narrowed to an endpoint
///
/// A null reply or one with fewer than two elements is a resolution error.
pub fn resolve_master<D: Dialer>(sentinel: &mut RespClient<'_, D>, name: &str) -> Result<Endpoint> {
    let reply = sentinel.sentinel(&["GET-MASTER-ADDR-BY-NAME", name])?;
    let items = match reply {
        Reply::Array(Some(items)) if items.len() >= 2 => items,
        _ => return Err(ProbeError::Resolution(name.to_string())),
    };

    let (Some(host), Some(port)) = (items[0].as_text(), items[1].as_text()) else {
        return Err(ProbeError::Resolution(name.to_string()));
    };
    let port = port.trim().parse::<u16>().map_err(|_| {
        ProbeError::Resolution(format!("{} (invalid address {}:{})", name, host, port))
    })?;

    Ok(Endpoint::new(host, port))
}

/// Check the `role` field of an INFO reply
pub fn verify_role(fields: &InfoMap) -> Result<()> {
    match fields.get("role").map(String::as_str) {
        Some("master") => Ok(()),
        Some(other) => Err(ProbeError::RoleMismatch(other.to_string())),
        None => Err(ProbeError::RoleMismatch("<none>".to_string())),
    }
}
