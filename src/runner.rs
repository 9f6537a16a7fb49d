//! The submit → poll → fetch sequence of a single flow run.
//!
//! Everything here talks to the server through [`OrchestrationApi`] so the
//! sequence can be driven by a scripted API in tests.
use crate::error::FlowError;
use crate::inputs::check_mandatory;
use crate::schema::{
    ExecutionHandle, ExecutionRequest, ExecutionSummary, Flow, FlowInput, NO_ERROR,
    RESULT_RESOLVED,
};
use std::collections::BTreeMap;
use std::time::Duration;

/// The OO endpoints a flow run needs.
pub trait OrchestrationApi {
    fn flow(&self, uuid: &str) -> Result<Flow, FlowError>;
    fn flow_inputs(&self, uuid: &str) -> Result<Vec<FlowInput>, FlowError>;
    fn submit_execution(&self, request: &ExecutionRequest) -> Result<ExecutionHandle, FlowError>;
    fn execution_summary(&self, execution_id: &str) -> Result<ExecutionSummary, FlowError>;
    /// Raw execution-log body.
    fn execution_log(&self, execution_id: &str) -> Result<String, FlowError>;
}

/// Fixed-cadence polling bounded by a total budget.
#[derive(Debug, Clone, Copy)]
pub struct PollPolicy {
    pub heartbeat: Duration,
    pub timeout: Duration,
}

/// How polling ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PollOutcome {
    /// The execution left `RUNNING`; carries its `resultStatusType`.
    Finished { result_status: String },
    /// The budget ran out before a terminal status was seen.
    TimedOut,
}

impl PollOutcome {
    pub fn result_status(&self) -> Option<&str> {
        match self {
            PollOutcome::Finished { result_status } => Some(result_status),
            PollOutcome::TimedOut => None,
        }
    }

    pub fn is_resolved(&self) -> bool {
        self.result_status() == Some(RESULT_RESOLVED)
    }
}

/// Validate inputs against the flow's schema and start an execution.
///
/// Returns the server-assigned execution id.
pub fn submit_flow<A: OrchestrationApi>(
    api: &A,
    uuid: &str,
    inputs: &BTreeMap<String, String>,
) -> Result<String, FlowError> {
    let flow = api.flow(uuid)?;
    tracing::debug!(
        uuid,
        name = %flow.name,
        path = flow.path.as_deref().unwrap_or_default(),
        description = flow.description.as_deref().unwrap_or_default(),
        "flow resolved"
    );

    let declared = api.flow_inputs(uuid)?;
    check_mandatory(&declared, inputs)?;

    let request = ExecutionRequest::new(uuid, &flow, inputs);
    let handle = api.submit_execution(&request)?;
    if handle.error_code != NO_ERROR {
        return Err(FlowError::Rejected(handle.error_code));
    }
    let execution_id = handle.execution_id.ok_or(FlowError::MissingExecutionId)?;
    tracing::info!(uuid, execution_id = %execution_id, run_name = %request.run_name, "execution submitted");
    Ok(execution_id)
}

/// Poll the execution summary until it leaves `RUNNING` or the budget runs out.
///
/// `sleep` is called once per `RUNNING` observation with the heartbeat.
pub fn track_execution<A, S>(
    api: &A,
    execution_id: &str,
    policy: PollPolicy,
    mut sleep: S,
) -> Result<PollOutcome, FlowError>
where
    A: OrchestrationApi,
    S: FnMut(Duration),
{
    let mut remaining = policy.timeout;
    while remaining >= policy.heartbeat {
        let summary = api.execution_summary(execution_id)?;
        if !summary.is_running() {
            let result_status =
                summary
                    .result_status_type
                    .ok_or_else(|| FlowError::IncompleteSummary {
                        execution_id: execution_id.to_string(),
                        status: summary.status.clone(),
                    })?;
            tracing::info!(execution_id, status = %summary.status, result_status = %result_status, "execution finished");
            return Ok(PollOutcome::Finished { result_status });
        }
        tracing::debug!(
            execution_id,
            remaining_secs = remaining.as_secs(),
            "execution still running"
        );
        sleep(policy.heartbeat);
        remaining -= policy.heartbeat;
    }
    tracing::warn!(
        execution_id,
        timeout_secs = policy.timeout.as_secs(),
        "gave up waiting for execution"
    );
    Ok(PollOutcome::TimedOut)
}
