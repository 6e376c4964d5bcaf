/*!
 * Sentinel Master Check Entry Point
 *
 * Parses the command line, runs the check against the configured Sentinel
 * and prints the single status line. The exit code carries the verdict.
 */

use anyhow::{Context, Result};
use check_redis_sentinel::*;
use clap::Parser;
use std::io::Write;

/// Check that a Redis master resolved through Sentinel is up and is a master
#[derive(Parser, Debug)]
#[command(name = "check-redis-sentinel", version, about, long_about = None)]
struct Cli {
    /// Master name as registered with the Sentinel
    #[arg(long)]
    master: String,

    /// Sentinel host
    #[arg(long, default_value = DEFAULT_SENTINEL_HOST)]
    host: String,

    /// Sentinel port
    #[arg(long, default_value_t = DEFAULT_SENTINEL_PORT)]
    port: u16,

    /// Connect/read/write timeout in seconds, 0 to wait forever
    #[arg(long, default_value_t = DEFAULT_TIMEOUT_SECS)]
    timeout: u64,
}

fn main() -> Result<()> {
    // Logs go to stderr; RUST_LOG=debug shows every command sent
    env_logger::init();

    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        // Usage errors exit 1; --help and --version keep clap's own handling
        Err(e) if e.use_stderr() => {
            // Nothing left to report to if stderr is gone; exit 1 either way
            let _ = e.print();
            std::process::exit(1);
        }
        Err(e) => e.exit(),
    };

    let config = ProbeConfig::new(cli.master)
        .with_sentinel(Endpoint::new(cli.host, cli.port))
        .with_timeout(timeout_from_secs(cli.timeout));

    let dialer = TcpDialer::new(config.timeout);
    let result = run_check(&dialer, &config);

    let mut out = std::io::stdout().lock();
    writeln!(out, "{}", result).context("failed to write check result")?;
    out.flush().context("failed to flush stdout")?;

    std::process::exit(result.exit_code())
}
