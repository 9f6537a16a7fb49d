//! Wire types for the OO REST endpoints used by a flow run.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;

/// Error code the server echoes when an execution was accepted.
pub const NO_ERROR: &str = "NO_ERROR";
/// Summary status while the execution is still in progress.
pub const STATUS_RUNNING: &str = "RUNNING";
/// Terminal result classification of a successful execution.
pub const RESULT_RESOLVED: &str = "RESOLVED";
/// Log level requested for every execution.
pub const EXECUTION_LOG_LEVEL: &str = "DEBUG";

/// `GET /flows/{uuid}`
#[derive(Debug, Clone, Deserialize)]
pub struct Flow {
    pub name: String,
    #[serde(default)]
    pub path: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

/// One entry of `GET /flows/{uuid}/inputs`.
#[derive(Debug, Clone, Deserialize)]
pub struct FlowInput {
    pub name: String,
    pub mandatory: bool,
}

/// Body of `POST /executions`.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ExecutionRequest {
    pub uuid: String,
    pub run_name: String,
    pub log_level: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub inputs: Option<BTreeMap<String, String>>,
}

impl ExecutionRequest {
    /// Inputs are only sent when the caller supplied at least one.
    pub fn new(uuid: &str, flow: &Flow, inputs: &BTreeMap<String, String>) -> Self {
        ExecutionRequest {
            uuid: uuid.to_string(),
            run_name: flow.name.clone(),
            log_level: EXECUTION_LOG_LEVEL.to_string(),
            inputs: (!inputs.is_empty()).then(|| inputs.clone()),
        }
    }
}

/// Response of `POST /executions`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExecutionHandle {
    pub error_code: String,
    #[serde(default)]
    pub execution_id: Option<String>,
}

/// One element of `GET /executions/{id}/summary`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExecutionSummary {
    pub status: String,
    #[serde(default)]
    pub result_status_type: Option<String>,
}

impl ExecutionSummary {
    pub fn is_running(&self) -> bool {
        self.status == STATUS_RUNNING
    }
}

/// The parts of `GET /executions/{id}/execution-log` the CLI reads.
///
/// The document is free-form; everything else is ignored.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExecutionLog {
    #[serde(default)]
    pub flow_output: Option<Map<String, Value>>,
    #[serde(default)]
    pub execution_summary: Option<Value>,
}
