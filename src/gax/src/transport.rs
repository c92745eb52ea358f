// Copyright 2024 Google LLC
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     https://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! The boundary between stubs and the transport layer.
//!
//! This crate does not implement a wire protocol. A base stub describes each
//! attempt as a [UnaryRequest] and hands it to an injected [Channel]. The
//! channel returns the response payload, or a [TransportError] which the stub
//! translates into a [Status].

use crate::status::{Code, Status};
use http::{HeaderMap, StatusCode};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::sync::Arc;
use std::time::Instant;

/// One attempt of a unary RPC.
#[derive(Clone, Debug, Default)]
pub struct UnaryRequest {
    /// The fully qualified RPC name, e.g. `google.longrunning.Operations/GetOperation`.
    pub method: String,
    /// The service endpoint.
    pub endpoint: String,
    /// Authentication and call headers.
    pub headers: HeaderMap,
    /// The transport must abandon the attempt after this instant.
    pub deadline: Option<Instant>,
    /// The request message.
    pub payload: serde_json::Value,
}

/// Performs unary RPCs.
///
/// Implementations are shared by all the calls made through a stub, possibly
/// from many threads.
pub trait Channel: Send + Sync + std::fmt::Debug {
    /// Makes a single attempt and returns the response payload.
    fn unary(&self, request: UnaryRequest) -> Result<serde_json::Value, TransportError>;
}

impl<T: Channel + ?Sized> Channel for Arc<T> {
    fn unary(&self, request: UnaryRequest) -> Result<serde_json::Value, TransportError> {
        (**self).unary(request)
    }
}

impl<T: Channel + ?Sized> Channel for Box<T> {
    fn unary(&self, request: UnaryRequest) -> Result<serde_json::Value, TransportError> {
        (**self).unary(request)
    }
}

/// Errors reported by a [Channel].
#[derive(thiserror::Error, Debug)]
#[non_exhaustive]
pub enum TransportError {
    /// The attempt did not complete before its deadline.
    #[error("the transport timed out")]
    Timeout,
    /// The transport could not connect to the endpoint.
    #[error("cannot connect to the endpoint: {0}")]
    Connect(String),
    /// An I/O error while sending the request or receiving the response.
    #[error("I/O error in the transport: {0}")]
    Io(#[from] std::io::Error),
    /// The service responded with an HTTP error and no structured status.
    #[error("the HTTP transport reports a [{status}] error: {message}")]
    Http { status: StatusCode, message: String },
    /// The service responded with a structured status.
    #[error(transparent)]
    Service(Status),
    /// The request or response could not be (de)serialized.
    #[error("cannot serialize or deserialize the payload: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl TransportError {
    /// The canonical code for this error.
    pub fn code(&self) -> Code {
        match self {
            Self::Timeout => Code::DeadlineExceeded,
            Self::Connect(_) | Self::Io(_) => Code::Unavailable,
            Self::Http { status, .. } => http_status_code(*status),
            Self::Service(s) if s.is_ok() => Code::Unknown,
            Self::Service(s) => s.code(),
            Self::Serialization(_) => Code::Internal,
        }
    }
}

/// The resulting status is never `Ok`.
impl std::convert::From<TransportError> for Status {
    fn from(value: TransportError) -> Self {
        match value {
            TransportError::Service(status) if status.is_ok() => status.set_code(Code::Unknown),
            TransportError::Service(status) => status,
            TransportError::Http { status, message } => {
                Status::new(http_status_code(status), message)
            }
            e => Status::new(e.code(), e.to_string()),
        }
    }
}

/// Maps an HTTP error status code to the canonical code, as described in
/// AIP-193.
///
/// Success codes are unexpected in an error and map to [Code::Unknown].
fn http_status_code(status: StatusCode) -> Code {
    match status.as_u16() {
        400 => Code::InvalidArgument,
        401 => Code::Unauthenticated,
        403 => Code::PermissionDenied,
        404 => Code::NotFound,
        409 => Code::Aborted,
        429 => Code::ResourceExhausted,
        499 => Code::Cancelled,
        501 => Code::Unimplemented,
        503 => Code::Unavailable,
        504 => Code::DeadlineExceeded,
        _ if status.is_client_error() => Code::FailedPrecondition,
        _ if status.is_server_error() => Code::Internal,
        _ => Code::Unknown,
    }
}

/// Converts a request message into a payload.
pub fn encode<T: Serialize>(message: &T) -> crate::Result<serde_json::Value> {
    serde_json::to_value(message).map_err(|e| TransportError::from(e).into())
}

/// Converts a response payload into a message.
pub fn decode<T: DeserializeOwned>(payload: serde_json::Value) -> crate::Result<T> {
    serde_json::from_value(payload).map_err(|e| TransportError::from(e).into())
}
