//! HTTP Basic credentials for the OO API.

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;

/// Encode `user:password` the way the server expects it in a Basic header.
pub fn encode_credentials(raw: &str) -> String {
    STANDARD.encode(raw.as_bytes())
}

/// How the caller identified themselves.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Credentials {
    /// Output of `--encode`, used verbatim.
    Encoded(String),
    UserPassword { user: String, password: String },
}

impl Credentials {
    /// Value of the `Authorization` header, computed once per run.
    pub fn authorization(&self) -> String {
        match self {
            Credentials::Encoded(encoded) => format!("Basic {}", encoded.trim()),
            Credentials::UserPassword { user, password } => {
                format!("Basic {}", encode_credentials(&format!("{user}:{password}")))
            }
        }
    }
}
