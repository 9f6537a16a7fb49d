//! CLI argument parsing for flow runs.
//!
//! Connection settings are optional here so the config layer can tell an
//! explicit flag apart from a default.
use clap::Parser;
use std::path::PathBuf;

/// Root CLI entrypoint.
#[derive(Parser, Debug)]
#[command(
    name = "flowinvoke",
    version,
    about = "Run an Operations Orchestration flow from the command line",
    after_help = "Examples:\n  flowinvoke --host oo.example.com:8443 --uuid <flow-uuid> --input key1=value1 --input key2=value2\n  flowinvoke --encode admin:secret\n  flowinvoke --credentials <encoded> --uuid <flow-uuid> --async"
)]
pub struct RootArgs {
    /// Hostname of the OO server including port (a full http:// or https:// URL is used as-is)
    #[arg(long, value_name = "HOST")]
    pub host: Option<String>,

    /// Username (default: admin)
    #[arg(long)]
    pub user: Option<String>,

    /// Password for the user (default: admin)
    #[arg(long)]
    pub password: Option<String>,

    /// Encoded output of --encode, used instead of --user and --password
    #[arg(long, value_name = "ENCODED")]
    pub credentials: Option<String>,

    /// UUID of the flow to run
    #[arg(long, required_unless_present = "encode", value_parser = parse_flow_uuid)]
    pub uuid: Option<String>,

    /// Encode username:password for use with --credentials, print it and exit
    #[arg(long, value_name = "USER:PASSWORD")]
    pub encode: Option<String>,

    /// Key=value flow input (repeat for more inputs e.g. --input key1=value1 --input key2=value2)
    #[arg(long = "input", value_name = "KEY=VALUE")]
    pub inputs: Vec<String>,

    /// Submit the flow and exit without waiting for the result
    #[arg(long = "async")]
    pub async_mode: bool,

    /// Print the full execution log JSON instead of flow outputs
    #[arg(long)]
    pub verbose: bool,

    /// Polling interval in seconds (default: 120)
    #[arg(long, value_name = "SECS", value_parser = clap::value_parser!(u64).range(1..))]
    pub heartbeat: Option<u64>,

    /// Time to wait for flow completion in seconds (default: 3600)
    #[arg(long, value_name = "SECS")]
    pub timeout: Option<u64>,

    /// Accept any server certificate (disables TLS verification)
    #[arg(long)]
    pub insecure: bool,

    /// Path to a JSON config file
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Log filter, e.g. info or flowinvoke=debug (default: warn)
    #[arg(long, value_name = "FILTER")]
    pub log_level: Option<String>,

    /// Append logs to this file instead of stderr
    #[arg(long, value_name = "PATH")]
    pub log_file: Option<PathBuf>,
}

/// A flow id is part of every request path, so a blank one is a usage error.
fn parse_flow_uuid(raw: &str) -> Result<String, String> {
    let uuid = raw.trim();
    if uuid.is_empty() {
        return Err("uuid must not be empty".to_string());
    }
    Ok(uuid.to_string())
}
