// Copyright 2025 Google LLC
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

//! Defines traits for backoff policies and a common implementations.
//!
//! Retry strategies should avoid immediately retrying an RPC, as the service
//! may need time to recover. [Exponential backoff] is a well known algorithm to
//! find an acceptable delay between retries.
//!
//! Like retry policies, backoff policies are stateful and each retry loop uses
//! its own instance, obtained via [BackoffPolicy::clone_box].
//!
//! # Example
//! ```
//! # use gax::backoff_policy::*;
//! # use gax::client_config::ClientConfig;
//! use gax::exponential_backoff::{Error, ExponentialBackoffBuilder};
//! use std::time::Duration;
//!
//! fn configure_backoff(config: ClientConfig) -> Result<ClientConfig, Error> {
//!     let policy = ExponentialBackoffBuilder::new()
//!         .with_initial_delay(Duration::from_millis(100))
//!         .with_maximum_delay(Duration::from_secs(5))
//!         .with_scaling(4.0)
//!         .build()?;
//!     Ok(config.set_backoff_policy(policy))
//! }
//! ```
//!
//! [Exponential backoff]: https://en.wikipedia.org/wiki/Exponential_backoff

use std::time::Duration;

/// Defines the trait implemented by all backoff strategies.
pub trait BackoffPolicy: Send + Sync + std::fmt::Debug {
    /// Returns the delay before the next attempt.
    ///
    /// The retry loop calls this method once after each failed attempt it
    /// intends to retry.
    fn next_delay(&mut self) -> Duration;

    /// Creates a new, independent instance of this policy, with the same
    /// configuration and no failed attempts.
    fn clone_box(&self) -> Box<dyn BackoffPolicy>;
}

impl BackoffPolicy for Box<dyn BackoffPolicy> {
    fn next_delay(&mut self) -> Duration {
        (**self).next_delay()
    }

    fn clone_box(&self) -> Box<dyn BackoffPolicy> {
        (**self).clone_box()
    }
}

/// A helper type to use [BackoffPolicy] in client and call options.
#[derive(Debug)]
pub struct BackoffPolicyArg(pub(crate) Box<dyn BackoffPolicy>);

impl<T: BackoffPolicy + 'static> std::convert::From<T> for BackoffPolicyArg {
    fn from(value: T) -> Self {
        Self(Box::new(value))
    }
}

impl BackoffPolicyArg {
    /// Unwraps the policy.
    pub fn into_inner(self) -> Box<dyn BackoffPolicy> {
        self.0
    }
}
