//! Error type shared by every step of a flow run.
//!
//! Library code returns `FlowError`; only `main` turns it into a message and
//! an exit code.
use thiserror::Error;

#[derive(Debug, Error)]
pub enum FlowError {
    #[error("uuid is mandatory")]
    MissingUuid,

    #[error("invalid --input {0:?}: expected key=value")]
    MalformedInput(String),

    #[error("Missing required flow input: {}", .0.join(", "))]
    MissingInputs(Vec<String>),

    #[error("request to {url} failed")]
    Transport {
        url: String,
        #[source]
        source: Box<ureq::Error>,
    },

    #[error("{url} returned HTTP {status}")]
    HttpStatus { url: String, status: u16 },

    #[error("unexpected response from {url}")]
    Decode {
        url: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("execution rejected by server: {0}")]
    Rejected(String),

    #[error("server accepted the execution but returned no executionId")]
    MissingExecutionId,

    #[error("execution {0} has no summary")]
    EmptySummary(String),

    #[error("execution {execution_id} finished with status {status} but no resultStatusType")]
    IncompleteSummary {
        execution_id: String,
        status: String,
    },
}

impl FlowError {
    pub(crate) fn transport(url: &str, source: ureq::Error) -> Self {
        FlowError::Transport {
            url: url.to_string(),
            source: Box::new(source),
        }
    }

    /// Missing mandatory inputs need a caller correction and share the exit
    /// code of an unsuccessful run; everything else is a hard failure.
    pub fn exit_code(&self) -> u8 {
        match self {
            FlowError::MissingInputs(_) => 1,
            _ => 2,
        }
    }
}
