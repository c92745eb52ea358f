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

//! Defines traits for retry policies and some common implementations.
//!
//! The client libraries automatically retry RPCs when they fail due to
//! transient errors. A retry policy decides, after each failed attempt,
//! whether the retry loop should make another attempt.
//!
//! Retry policies are stateful: decorators such as [LimitedErrorCount] and
//! [LimitedElapsedTime] track the budget consumed by one retry loop. A policy
//! configured in a stub or a [CallContext][crate::call_context::CallContext]
//! is a *template*, each retry loop runs with its own instance obtained via
//! [RetryPolicy::clone_box], which always starts with a fresh budget.
//!
//! # Example
//! ```
//! # use gax::retry_policy::*;
//! use std::time::Duration;
//! let policy = Aip194Strict
//!     .with_attempt_limit(5)
//!     .with_time_limit(Duration::from_secs(10));
//! ```

use crate::Status;
use crate::retry_result::RetryResult;
use crate::status::Code;
use std::time::{Duration, Instant};

/// Controls the retry loop behavior.
pub trait RetryPolicy: Send + Sync + std::fmt::Debug {
    /// Query the retry policy after an error.
    ///
    /// # Parameters
    /// * `status` - the last error received from a request. Not all are server
    ///   errors. The client library may have been unable to send or complete
    ///   the RPC before the server returned an error.
    fn on_failure(&mut self, status: &Status) -> RetryResult;

    /// The remaining time in the retry policy.
    ///
    /// For policies based on time, this returns the remaining time in the
    /// policy. The retry loop can use this value to adjust the next RPC
    /// timeout. For policies that are not time based this returns `None`.
    fn remaining_time(&self) -> Option<Duration> {
        None
    }

    /// Creates a new, independent instance of this policy.
    ///
    /// The new instance has the same configuration, and a fresh budget: no
    /// errors counted, and the elapsed time starting at the moment of the
    /// call.
    fn clone_box(&self) -> Box<dyn RetryPolicy>;
}

impl RetryPolicy for Box<dyn RetryPolicy> {
    fn on_failure(&mut self, status: &Status) -> RetryResult {
        (**self).on_failure(status)
    }

    fn remaining_time(&self) -> Option<Duration> {
        (**self).remaining_time()
    }

    fn clone_box(&self) -> Box<dyn RetryPolicy> {
        (**self).clone_box()
    }
}

/// A helper type to use [RetryPolicy] in client and call options.
#[derive(Debug)]
pub struct RetryPolicyArg(pub(crate) Box<dyn RetryPolicy>);

impl<T: RetryPolicy + 'static> std::convert::From<T> for RetryPolicyArg {
    fn from(value: T) -> Self {
        Self(Box::new(value))
    }
}

impl RetryPolicyArg {
    /// Unwraps the policy.
    pub fn into_inner(self) -> Box<dyn RetryPolicy> {
        self.0
    }
}

/// Extension trait for [RetryPolicy]
pub trait RetryPolicyExt: RetryPolicy + Sized + 'static {
    /// Decorate a [RetryPolicy] to limit the number of failed attempts.
    fn with_attempt_limit(self, maximum_error_count: u32) -> LimitedErrorCount<Self> {
        LimitedErrorCount::new(self, maximum_error_count)
    }

    /// Decorate a [RetryPolicy] to limit the total elapsed time in the retry
    /// loop.
    fn with_time_limit(self, maximum_duration: Duration) -> LimitedElapsedTime<Self> {
        LimitedElapsedTime::new(self, maximum_duration)
    }
}

impl<T: RetryPolicy + 'static> RetryPolicyExt for T {}

/// A retry policy that strictly follows [AIP-194].
///
/// This policy should be decorated to limit the number of retry attempts or the
/// duration of the retry loop.
///
/// The policy interprets AIP-194 **strictly**, the retry decision is based
/// only on the status code, and the only retryable status code is
/// "UNAVAILABLE".
///
/// [AIP-194]: https://google.aip.dev/194
#[derive(Clone, Debug)]
pub struct Aip194Strict;

impl RetryPolicy for Aip194Strict {
    fn on_failure(&mut self, status: &Status) -> RetryResult {
        match status.code() {
            Code::Unavailable => RetryResult::Continue,
            _ => RetryResult::Permanent,
        }
    }

    fn clone_box(&self) -> Box<dyn RetryPolicy> {
        Box::new(Aip194Strict)
    }
}

/// A retry policy that retries all errors.
///
/// This policy must be decorated to limit the number of retry attempts or the
/// duration of the retry loop.
#[derive(Clone, Debug)]
pub struct AlwaysRetry;

impl RetryPolicy for AlwaysRetry {
    fn on_failure(&mut self, _status: &Status) -> RetryResult {
        RetryResult::Continue
    }

    fn clone_box(&self) -> Box<dyn RetryPolicy> {
        Box::new(AlwaysRetry)
    }
}

/// A retry policy that never retries.
///
/// Each retry loop using this policy makes exactly one attempt. The runtime
/// uses this policy when neither the call nor the stub configure one.
#[derive(Clone, Debug)]
pub struct NeverRetry;

impl RetryPolicy for NeverRetry {
    fn on_failure(&mut self, _status: &Status) -> RetryResult {
        RetryResult::Exhausted
    }

    fn clone_box(&self) -> Box<dyn RetryPolicy> {
        Box::new(NeverRetry)
    }
}

/// A retry policy decorator that limits the total time in the retry loop.
///
/// This policy decorates an inner policy and limits the duration of retry
/// loops. Once the loop exceeds its duration limit, this policy always returns
/// [Exhausted][RetryResult::Exhausted]. Before this deadline is reached, the
/// policy returns the result of `P::on_failure()`.
///
/// The clock starts when the policy is created. Clones obtained via
/// [RetryPolicy::clone_box] start a new clock.
///
/// # Parameters
/// * `P` - the inner retry policy.
#[derive(Debug)]
pub struct LimitedElapsedTime<P>
where
    P: RetryPolicy,
{
    inner: P,
    maximum_duration: Duration,
    // `None` if the limit is too large to represent as an `Instant`.
    deadline: Option<Instant>,
}

impl<P> LimitedElapsedTime<P>
where
    P: RetryPolicy,
{
    pub fn new(inner: P, maximum_duration: Duration) -> Self {
        Self {
            inner,
            maximum_duration,
            deadline: Instant::now().checked_add(maximum_duration),
        }
    }

    /// The configured limit.
    pub fn maximum_duration(&self) -> Duration {
        self.maximum_duration
    }

    fn on_failure_now(&mut self, now: Instant, status: &Status) -> RetryResult {
        match self.inner.on_failure(status) {
            RetryResult::Continue if self.deadline.is_some_and(|d| now >= d) => {
                RetryResult::Exhausted
            }
            flow => flow,
        }
    }

    fn remaining_time_now(&self, now: Instant) -> Option<Duration> {
        let remaining = self
            .deadline
            .map(|d| d.saturating_duration_since(now))
            .unwrap_or(Duration::MAX);
        if let Some(inner) = self.inner.remaining_time() {
            return Some(std::cmp::min(remaining, inner));
        }
        Some(remaining)
    }
}

impl<P> RetryPolicy for LimitedElapsedTime<P>
where
    P: RetryPolicy + 'static,
{
    fn on_failure(&mut self, status: &Status) -> RetryResult {
        self.on_failure_now(Instant::now(), status)
    }

    fn remaining_time(&self) -> Option<Duration> {
        self.remaining_time_now(Instant::now())
    }

    fn clone_box(&self) -> Box<dyn RetryPolicy> {
        Box::new(LimitedElapsedTime::new(
            self.inner.clone_box(),
            self.maximum_duration,
        ))
    }
}

/// A retry policy decorator that limits the number of errors.
///
/// This policy decorates an inner policy and limits the total number of errors.
/// Once the maximum error count is reached this policy always returns
/// [Exhausted][RetryResult::Exhausted]. Before the maximum is reached, the
/// policy returns the result of `P::on_failure()`.
///
/// A retry loop using `LimitedErrorCount::new(AlwaysRetry, n)` makes at most
/// `n + 1` attempts.
///
/// # Parameters
/// * `P` - the inner retry policy.
#[derive(Debug)]
pub struct LimitedErrorCount<P>
where
    P: RetryPolicy,
{
    inner: P,
    maximum_error_count: u32,
    error_count: u32,
}

impl<P> LimitedErrorCount<P>
where
    P: RetryPolicy,
{
    pub fn new(inner: P, maximum_error_count: u32) -> Self {
        Self {
            inner,
            maximum_error_count,
            error_count: 0,
        }
    }

    /// The number of errors observed by this instance.
    pub fn error_count(&self) -> u32 {
        self.error_count
    }
}

impl<P> RetryPolicy for LimitedErrorCount<P>
where
    P: RetryPolicy + 'static,
{
    fn on_failure(&mut self, status: &Status) -> RetryResult {
        self.error_count = self.error_count.saturating_add(1);
        match self.inner.on_failure(status) {
            RetryResult::Continue if self.error_count > self.maximum_error_count => {
                RetryResult::Exhausted
            }
            flow => flow,
        }
    }

    fn remaining_time(&self) -> Option<Duration> {
        self.inner.remaining_time()
    }

    fn clone_box(&self) -> Box<dyn RetryPolicy> {
        Box::new(LimitedErrorCount::new(
            self.inner.clone_box(),
            self.maximum_error_count,
        ))
    }
}
