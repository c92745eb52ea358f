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

use crate::backoff_policy::{BackoffPolicy, BackoffPolicyArg};
use crate::credentials::Credentials;
use crate::retry_policy::{RetryPolicy, RetryPolicyArg};

/// The environment variable that enables tracing for all clients.
pub const LOGGING_VAR: &str = "GAPIC_RUST_LOGGING";

/// Configure a client.
///
/// A client represents a connection to a service. The default configuration
/// for each client should work for most applications. But some applications
/// may need to override the default endpoint, the default authentication
/// credentials, the retry policies, and/or other behaviors of the client.
///
/// # Example
/// ```
/// # use gax::client_config::ClientConfig;
/// # use gax::retry_policy::{AlwaysRetry, RetryPolicyExt};
/// let config = ClientConfig::new()
///     .set_endpoint("https://private.example.com")
///     .set_retry_policy(AlwaysRetry.with_attempt_limit(5))
///     .enable_tracing();
/// assert_eq!(config.endpoint(), Some("https://private.example.com"));
/// ```
#[derive(Debug, Default)]
pub struct ClientConfig {
    endpoint: Option<String>,
    credentials: Option<Credentials>,
    tracing: Option<bool>,
    retry_policy: Option<Box<dyn RetryPolicy>>,
    backoff_policy: Option<Box<dyn BackoffPolicy>>,
}

impl ClientConfig {
    /// Returns a default [ClientConfig].
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns true if the configuration or the environment enable tracing.
    ///
    /// An explicit [enable_tracing][Self::enable_tracing] or
    /// [disable_tracing][Self::disable_tracing] takes precedence over the
    /// environment.
    pub fn tracing_enabled(&self) -> bool {
        if let Some(v) = self.tracing {
            return v;
        }
        std::env::var(LOGGING_VAR)
            .map(|v| v == "true")
            .unwrap_or(false)
    }

    /// Sets an endpoint that overrides the default endpoint for a service.
    pub fn set_endpoint<T: Into<String>>(mut self, v: T) -> Self {
        self.endpoint = Some(v.into());
        self
    }

    /// Enables tracing.
    pub fn enable_tracing(mut self) -> Self {
        self.tracing = Some(true);
        self
    }

    /// Disables tracing.
    pub fn disable_tracing(mut self) -> Self {
        self.tracing = Some(false);
        self
    }

    /// Configure the authentication credentials.
    pub fn set_credentials<T: Into<Option<Credentials>>>(mut self, v: T) -> Self {
        self.credentials = v.into();
        self
    }

    /// Configure the retry policy.
    pub fn set_retry_policy<V: Into<RetryPolicyArg>>(mut self, v: V) -> Self {
        self.retry_policy = Some(v.into().into_inner());
        self
    }

    /// Configure the retry backoff policy.
    pub fn set_backoff_policy<V: Into<BackoffPolicyArg>>(mut self, v: V) -> Self {
        self.backoff_policy = Some(v.into().into_inner());
        self
    }

    pub fn endpoint(&self) -> Option<&str> {
        self.endpoint.as_deref()
    }

    pub fn credentials(&self) -> Option<&Credentials> {
        self.credentials.as_ref()
    }

    pub fn retry_policy(&self) -> Option<&dyn RetryPolicy> {
        self.retry_policy.as_deref()
    }

    pub fn backoff_policy(&self) -> Option<&dyn BackoffPolicy> {
        self.backoff_policy.as_deref()
    }
}
