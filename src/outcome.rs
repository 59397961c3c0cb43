//! Tri-state result of one server action

use serde::de::DeserializeOwned;
use serde_json::Value;
use std::fmt;

/// What a single dispatch produced.
///
/// Connection failures are a regular variant rather than an error so every
/// caller has to handle all three cases.
#[derive(Clone, Debug, PartialEq)]
pub enum Outcome {
    /// HTTP 200 with the parsed response body
    Success(Value),

    /// Any other HTTP status, with the raw response text
    ServerError { status: u16, body: String },

    /// No HTTP response at all (refused, reset, DNS, timeout)
    Unreachable,
}

impl Outcome {
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success(_))
    }

    pub fn is_unreachable(&self) -> bool {
        matches!(self, Self::Unreachable)
    }

    /// Response payload, if the server answered 200
    pub fn payload(&self) -> Option<&Value> {
        match self {
            Self::Success(value) => Some(value),
            _ => None,
        }
    }

    /// Decode a successful payload into a typed view.
    ///
    /// Returns `None` for non-success outcomes and for payloads of another shape.
    pub fn decode<T: DeserializeOwned>(&self) -> Option<T> {
        self.payload()
            .and_then(|value| serde_json::from_value(value.clone()).ok())
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Success(value) => write!(f, "server response: {}", value),
            Self::ServerError { status, body } => write!(f, "error {}, {}", status, body),
            Self::Unreachable => f.write_str("failed to connect to server"),
        }
    }
}
