//! Blocking HTTP client for the OO REST API.
//!
//! HTTP status codes are not treated as errors up front: typed endpoints try
//! to decode the body first so server-side error payloads surface verbatim,
//! and only an undecodable body on a non-2xx response reports the status.
use crate::error::FlowError;
use crate::runner::OrchestrationApi;
use crate::schema::{ExecutionHandle, ExecutionRequest, ExecutionSummary, Flow, FlowInput};
use serde::de::DeserializeOwned;
use std::time::Instant;
use ureq::http::Response;
use ureq::tls::TlsConfig;
use ureq::{Agent, Body};

/// REST prefix under which every OO endpoint lives.
pub const REST_BASE_PATH: &str = "/oo/rest/v1";

/// Execution logs can be large; raise ureq's default body cap.
const MAX_BODY_BYTES: u64 = 64 * 1024 * 1024;

/// Certificate handling for the HTTPS connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TlsMode {
    Verify,
    /// Accept any server certificate.
    Insecure,
}

pub struct OoClient {
    agent: Agent,
    base_url: String,
    authorization: String,
}

impl OoClient {
    pub fn new(host: &str, authorization: String, tls: TlsMode) -> Self {
        let tls_config = TlsConfig::builder()
            .disable_verification(tls == TlsMode::Insecure)
            .build();
        let agent: Agent = Agent::config_builder()
            .http_status_as_error(false)
            .tls_config(tls_config)
            .build()
            .into();
        OoClient {
            agent,
            base_url: base_url(host),
            authorization,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn get_text(&self, url: &str) -> Result<(u16, String), FlowError> {
        let start = Instant::now();
        let response = self
            .agent
            .get(url)
            .header("Authorization", &self.authorization)
            .call()
            .map_err(|err| FlowError::transport(url, err))?;
        read_response(url, "GET", response, start)
    }

    fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, FlowError> {
        let url = self.url(path);
        let (status, body) = self.get_text(&url)?;
        decode(&url, status, &body)
    }
}

impl OrchestrationApi for OoClient {
    fn flow(&self, uuid: &str) -> Result<Flow, FlowError> {
        self.get_json(&format!("/flows/{uuid}"))
    }

    fn flow_inputs(&self, uuid: &str) -> Result<Vec<FlowInput>, FlowError> {
        self.get_json(&format!("/flows/{uuid}/inputs"))
    }

    fn submit_execution(&self, request: &ExecutionRequest) -> Result<ExecutionHandle, FlowError> {
        let url = self.url("/executions");
        let start = Instant::now();
        let response = self
            .agent
            .post(&url)
            .header("Authorization", &self.authorization)
            .send_json(request)
            .map_err(|err| FlowError::transport(&url, err))?;
        let (status, body) = read_response(&url, "POST", response, start)?;
        decode(&url, status, &body)
    }

    fn execution_summary(&self, execution_id: &str) -> Result<ExecutionSummary, FlowError> {
        let summaries: Vec<ExecutionSummary> =
            self.get_json(&format!("/executions/{execution_id}/summary"))?;
        summaries
            .into_iter()
            .next()
            .ok_or_else(|| FlowError::EmptySummary(execution_id.to_string()))
    }

    fn execution_log(&self, execution_id: &str) -> Result<String, FlowError> {
        let url = self.url(&format!("/executions/{execution_id}/execution-log"));
        let (status, body) = self.get_text(&url)?;
        if !is_success(status) {
            return Err(FlowError::HttpStatus { url, status });
        }
        Ok(body)
    }
}

/// Build the REST base URL from a `host:port` or a full URL.
pub fn base_url(host: &str) -> String {
    let host = host.trim().trim_end_matches('/');
    if host.starts_with("http://") || host.starts_with("https://") {
        format!("{host}{REST_BASE_PATH}")
    } else {
        format!("https://{host}{REST_BASE_PATH}")
    }
}

fn read_response(
    url: &str,
    method: &str,
    mut response: Response<Body>,
    start: Instant,
) -> Result<(u16, String), FlowError> {
    let status = response.status().as_u16();
    let body = response
        .body_mut()
        .with_config()
        .limit(MAX_BODY_BYTES)
        .read_to_string()
        .map_err(|err| FlowError::transport(url, err))?;
    let elapsed_ms = start.elapsed().as_millis();

    tracing::info!(
        elapsed_ms,
        method,
        url,
        status,
        response_bytes = body.len(),
        "request complete"
    );
    tracing::debug!(body = %body, "response body");

    Ok((status, body))
}

fn decode<T: DeserializeOwned>(url: &str, status: u16, body: &str) -> Result<T, FlowError> {
    serde_json::from_str(body).map_err(|source| {
        if is_success(status) {
            FlowError::Decode {
                url: url.to_string(),
                source,
            }
        } else {
            FlowError::HttpStatus {
                url: url.to_string(),
                status,
            }
        }
    })
}

fn is_success(status: u16) -> bool {
    (200..300).contains(&status)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::Credentials;
    use mockito::{Matcher, Server};
    use std::collections::BTreeMap;

    const AUTH: &str = "Basic YWRtaW46YWRtaW4=";

    fn client(server: &Server) -> OoClient {
        let credentials = Credentials::UserPassword {
            user: "admin".to_string(),
            password: "admin".to_string(),
        };
        OoClient::new(&server.url(), credentials.authorization(), TlsMode::Verify)
    }

    #[test]
    fn base_url_defaults_to_https() {
        assert_eq!(
            base_url("oo.example.com:8443"),
            "https://oo.example.com:8443/oo/rest/v1"
        );
        assert_eq!(
            base_url("http://127.0.0.1:9000/"),
            "http://127.0.0.1:9000/oo/rest/v1"
        );
    }

    #[test]
    fn fetches_flow_with_authorization_header() {
        let mut server = Server::new();
        let mock = server
            .mock("GET", "/oo/rest/v1/flows/f-1")
            .match_header("authorization", AUTH)
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"id": "f-1", "name": "Deploy", "path": "Library/Deploy.xml"}"#)
            .create();

        let flow = client(&server).flow("f-1").unwrap();
        assert_eq!(flow.name, "Deploy");
        assert_eq!(flow.path.as_deref(), Some("Library/Deploy.xml"));
        mock.assert();
    }

    #[test]
    fn posts_execution_request_as_json() {
        let mut server = Server::new();
        let mock = server
            .mock("POST", "/oo/rest/v1/executions")
            .match_header("authorization", AUTH)
            .match_header("content-type", Matcher::Regex("application/json".to_string()))
            .match_body(Matcher::Json(serde_json::json!({
                "uuid": "f-1",
                "runName": "Deploy",
                "logLevel": "DEBUG",
                "inputs": {"host": "db1"}
            })))
            .with_status(201)
            .with_body(r#"{"errorCode": "NO_ERROR", "executionId": "E1"}"#)
            .create();

        let request = ExecutionRequest {
            uuid: "f-1".to_string(),
            run_name: "Deploy".to_string(),
            log_level: "DEBUG".to_string(),
            inputs: Some(BTreeMap::from([("host".to_string(), "db1".to_string())])),
        };
        let handle = client(&server).submit_execution(&request).unwrap();
        assert_eq!(handle.error_code, "NO_ERROR");
        assert_eq!(handle.execution_id.as_deref(), Some("E1"));
        mock.assert();
    }

    #[test]
    fn error_payload_on_client_error_status_is_still_decoded() {
        let mut server = Server::new();
        let _mock = server
            .mock("POST", "/oo/rest/v1/executions")
            .with_status(400)
            .with_body(r#"{"errorCode": "SOME_ERROR"}"#)
            .create();

        let request = ExecutionRequest {
            uuid: "f-1".to_string(),
            run_name: "Deploy".to_string(),
            log_level: "DEBUG".to_string(),
            inputs: None,
        };
        let handle = client(&server).submit_execution(&request).unwrap();
        assert_eq!(handle.error_code, "SOME_ERROR");
        assert!(handle.execution_id.is_none());
    }

    #[test]
    fn undecodable_error_response_reports_status() {
        let mut server = Server::new();
        let _mock = server
            .mock("GET", "/oo/rest/v1/flows/missing")
            .with_status(404)
            .with_body("<html>Not Found</html>")
            .create();

        let err = client(&server).flow("missing").unwrap_err();
        assert!(matches!(err, FlowError::HttpStatus { status: 404, .. }));
    }

    #[test]
    fn undecodable_success_response_is_a_decode_error() {
        let mut server = Server::new();
        let _mock = server
            .mock("GET", "/oo/rest/v1/flows/f-1/inputs")
            .with_status(200)
            .with_body(r#"{"not": "a list"}"#)
            .create();

        let err = client(&server).flow_inputs("f-1").unwrap_err();
        assert!(matches!(err, FlowError::Decode { .. }));
    }

    #[test]
    fn empty_summary_list_is_an_error() {
        let mut server = Server::new();
        let _mock = server
            .mock("GET", "/oo/rest/v1/executions/E1/summary")
            .with_status(200)
            .with_body("[]")
            .create();

        let err = client(&server).execution_summary("E1").unwrap_err();
        assert!(matches!(err, FlowError::EmptySummary(ref id) if id == "E1"));
    }

    #[test]
    fn execution_log_is_returned_verbatim() {
        let mut server = Server::new();
        let body = r#"{"flowOutput": {"a": "1"},   "extra": true}"#;
        let _mock = server
            .mock("GET", "/oo/rest/v1/executions/E1/execution-log")
            .with_status(200)
            .with_body(body)
            .create();

        assert_eq!(client(&server).execution_log("E1").unwrap(), body);
    }

    #[test]
    fn execution_log_error_status_is_fatal() {
        let mut server = Server::new();
        let _mock = server
            .mock("GET", "/oo/rest/v1/executions/E1/execution-log")
            .with_status(500)
            .with_body("boom")
            .create();

        let err = client(&server).execution_log("E1").unwrap_err();
        assert!(matches!(err, FlowError::HttpStatus { status: 500, .. }));
    }
}
