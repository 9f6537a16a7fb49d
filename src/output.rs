//! Rendering of the execution log and the final run status.

use crate::error::FlowError;
use crate::runner::PollOutcome;
use crate::schema::ExecutionLog;
use serde_json::Value;

/// What to print once a run has been tracked to the end.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Report {
    /// Program output for stdout.
    pub stdout: String,
    /// Failure diagnostics for stderr, empty on success.
    pub stderr: String,
    pub exit_code: u8,
}

/// Build the report for a finished (or abandoned) execution.
///
/// Verbose mode echoes the log body byte for byte; normal mode prints each flow
/// output as `name=value` followed by `Status=<result>`.
pub fn render_report(
    log_body: &str,
    outcome: &PollOutcome,
    verbose: bool,
) -> Result<Report, FlowError> {
    let mut stdout = String::new();
    if verbose {
        stdout.push_str(log_body);
    } else {
        let log: ExecutionLog =
            serde_json::from_str(log_body).map_err(|source| FlowError::Decode {
                url: "execution-log".to_string(),
                source,
            })?;
        for (name, value) in log.flow_output.iter().flatten() {
            stdout.push_str(&format!("{name}={}\n", display_value(value)));
        }
        if let Some(status) = outcome.result_status() {
            stdout.push_str(&format!("Status={status}\n"));
        }
    }

    if outcome.is_resolved() {
        return Ok(Report {
            stdout,
            stderr: String::new(),
            exit_code: 0,
        });
    }
    Ok(Report {
        stdout,
        stderr: failure_diagnostics(log_body, outcome),
        exit_code: 1,
    })
}

fn display_value(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}

fn failure_diagnostics(log_body: &str, outcome: &PollOutcome) -> String {
    let mut out = match outcome {
        PollOutcome::Finished { result_status } => {
            format!("Something went wrong: execution finished with {result_status}\n")
        }
        PollOutcome::TimedOut => {
            "Something went wrong: execution did not finish before the timeout\n".to_string()
        }
    };
    // Best effort: the summary is only a hint, the log may not even be JSON.
    let summary = serde_json::from_str::<ExecutionLog>(log_body)
        .ok()
        .and_then(|log| log.execution_summary)
        .and_then(|summary| serde_json::to_string_pretty(&summary).ok());
    if let Some(summary) = summary {
        out.push_str("Flow Summary:\n");
        out.push_str(&summary);
        out.push('\n');
    }
    out
}
