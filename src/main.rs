use anyhow::Result;
use clap::Parser;
use std::process::ExitCode;

mod auth;
mod cli;
mod client;
mod config;
mod error;
mod inputs;
mod logging;
mod output;
mod runner;
mod schema;

use crate::cli::RootArgs;
use crate::client::{OoClient, TlsMode};
use crate::config::Settings;
use crate::error::FlowError;
use crate::runner::{OrchestrationApi, PollPolicy};

/// Failures outside the flow run itself (config, logging setup).
const SETUP_FAILURE: u8 = 2;

fn main() -> ExitCode {
    let args = RootArgs::parse();

    if let Some(raw) = &args.encode {
        println!("{}", auth::encode_credentials(raw));
        return ExitCode::SUCCESS;
    }

    let settings = match setup(&args) {
        Ok(settings) => settings,
        Err(err) => {
            eprintln!("error: {err:#}");
            return ExitCode::from(SETUP_FAILURE);
        }
    };

    match run(&args, &settings) {
        Ok(code) => ExitCode::from(code),
        Err(err) => {
            let code = err.exit_code();
            eprintln!("error: {:#}", anyhow::Error::from(err));
            ExitCode::from(code)
        }
    }
}

fn setup(args: &RootArgs) -> Result<Settings> {
    let settings = config::load_settings(args)?;
    logging::init(&settings.log_filter, settings.log_file.as_deref())?;
    Ok(settings)
}

fn run(args: &RootArgs, settings: &Settings) -> Result<u8, FlowError> {
    let uuid = args
        .uuid
        .as_deref()
        .filter(|uuid| !uuid.trim().is_empty())
        .ok_or(FlowError::MissingUuid)?;
    let inputs = inputs::parse_inputs(args.inputs.as_slice())?;

    let tls = if settings.insecure {
        tracing::warn!("TLS certificate verification is disabled");
        TlsMode::Insecure
    } else {
        TlsMode::Verify
    };
    let client = OoClient::new(&settings.host, settings.credentials.authorization(), tls);
    tracing::debug!(base_url = client.base_url(), uuid, "starting flow run");

    let execution_id = runner::submit_flow(&client, uuid, &inputs)?;
    if args.async_mode {
        println!("ExecutionId={execution_id}");
        return Ok(0);
    }

    let policy = PollPolicy {
        heartbeat: settings.heartbeat,
        timeout: settings.timeout,
    };
    let outcome = runner::track_execution(&client, &execution_id, policy, std::thread::sleep)?;
    let log_body = client.execution_log(&execution_id)?;

    let report = output::render_report(&log_body, &outcome, args.verbose)?;
    print!("{}", report.stdout);
    if !report.stderr.is_empty() {
        eprint!("{}", report.stderr);
    }
    Ok(report.exit_code)
}
