//! Shared test infrastructure for CLI integration tests.
//!
//! Each fixture owns a mock OO server and a config file pointing the CLI at
//! it over plain HTTP.

use mockito::{Mock, ServerGuard};
use std::path::PathBuf;
use std::process::Command;
use tempfile::TempDir;

pub const FLOW_UUID: &str = "7f1c2c3e-flow";
pub const EXECUTION_ID: &str = "E1";

/// Captured result of one `flowinvoke` invocation.
#[derive(Debug)]
pub struct RunOutput {
    pub stdout: String,
    pub stderr: String,
    pub code: Option<i32>,
}

/// Mock OO server plus an isolated config file.
pub struct OoFixture {
    pub server: ServerGuard,
    pub config_path: PathBuf,
    _temp_dir: TempDir,
}

impl OoFixture {
    pub fn start() -> Self {
        let server = mockito::Server::new();
        let temp_dir = TempDir::new().expect("create temp dir");
        let config_path = temp_dir.path().join("config.json");
        let config = serde_json::json!({
            "host": server.url(),
            "user": "admin",
            "password": "admin",
            "heartbeat": 1,
            "timeout": 5
        });
        std::fs::write(&config_path, config.to_string()).expect("write config");
        OoFixture {
            server,
            config_path,
            _temp_dir: temp_dir,
        }
    }

    /// Flow descriptor plus its input schema.
    pub fn mock_flow(&mut self, inputs_json: &str) -> (Mock, Mock) {
        let flow = self
            .server
            .mock("GET", format!("/oo/rest/v1/flows/{FLOW_UUID}").as_str())
            .match_header("authorization", "Basic YWRtaW46YWRtaW4=")
            .with_status(200)
            .with_body(r#"{"id": "7f1c2c3e-flow", "name": "Deploy Service"}"#)
            .create();
        let inputs = self
            .server
            .mock("GET", format!("/oo/rest/v1/flows/{FLOW_UUID}/inputs").as_str())
            .with_status(200)
            .with_body(inputs_json)
            .create();
        (flow, inputs)
    }

    pub fn mock_submit(&mut self, body: &str) -> Mock {
        self.server
            .mock("POST", "/oo/rest/v1/executions")
            .with_status(201)
            .with_body(body)
            .create()
    }

    pub fn mock_summary(&mut self, status: &str, result: &str) -> Mock {
        let body = serde_json::json!([{
            "executionId": EXECUTION_ID,
            "status": status,
            "resultStatusType": result
        }]);
        self.server
            .mock("GET", format!("/oo/rest/v1/executions/{EXECUTION_ID}/summary").as_str())
            .with_status(200)
            .with_body(body.to_string())
            .create()
    }

    pub fn mock_log(&mut self, body: &str) -> Mock {
        self.server
            .mock(
                "GET",
                format!("/oo/rest/v1/executions/{EXECUTION_ID}/execution-log").as_str(),
            )
            .with_status(200)
            .with_body(body)
            .create()
    }

    /// Run the binary against this fixture's config with extra arguments.
    pub fn run(&self, args: &[&str]) -> RunOutput {
        let mut full = vec!["--uuid", FLOW_UUID];
        full.extend_from_slice(args);
        self.run_without_uuid(&full)
    }

    /// Like `run`, but the caller supplies `--uuid` (or leaves it out).
    pub fn run_without_uuid(&self, args: &[&str]) -> RunOutput {
        let bin = env!("CARGO_BIN_EXE_flowinvoke");
        let output = Command::new(bin)
            .arg("--config")
            .arg(&self.config_path)
            .args(args)
            .env_remove("RUST_LOG")
            .env_remove("FLOWINVOKE_CONFIG")
            .env_remove("FLOWINVOKE_CREDENTIALS")
            .env_remove("FLOWINVOKE_PASSWORD")
            .output()
            .expect("run flowinvoke");
        RunOutput {
            stdout: String::from_utf8_lossy(&output.stdout).to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).to_string(),
            code: output.status.code(),
        }
    }
}
