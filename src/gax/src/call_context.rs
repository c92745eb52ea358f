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

//! Per-call configuration.
//!
//! A [CallContext] is created by the caller for one logical call (including
//! all its retry attempts) and discarded afterwards. It carries the deadline,
//! optional retry and backoff policies that override the stub defaults for
//! this call only, and transport metadata.

use crate::backoff_policy::{BackoffPolicy, BackoffPolicyArg};
use crate::credentials::Credentials;
use crate::retry_policy::{RetryPolicy, RetryPolicyArg};
use http::HeaderMap;
use std::time::{Duration, Instant};

/// Per-call configuration.
///
/// # Example
/// ```
/// # use gax::call_context::CallContext;
/// # use gax::retry_policy::{AlwaysRetry, RetryPolicyExt};
/// use std::time::Duration;
/// let context = CallContext::new()
///     .with_timeout(Duration::from_secs(10))
///     .with_retry_policy(AlwaysRetry.with_attempt_limit(3));
/// assert!(context.has_retry_policy());
/// assert!(!context.has_backoff_policy());
/// ```
#[derive(Debug, Default)]
pub struct CallContext {
    deadline: Option<Instant>,
    attempt_timeout: Option<Duration>,
    retry_policy: Option<Box<dyn RetryPolicy>>,
    backoff_policy: Option<Box<dyn BackoffPolicy>>,
    credentials: Option<Credentials>,
    headers: HeaderMap,
}

/// Clones the policy overrides with a fresh budget, see
/// [clone_retry_policy][CallContext::clone_retry_policy].
impl Clone for CallContext {
    fn clone(&self) -> Self {
        Self {
            deadline: self.deadline,
            attempt_timeout: self.attempt_timeout,
            retry_policy: self.clone_retry_policy(),
            backoff_policy: self.clone_backoff_policy(),
            credentials: self.credentials.clone(),
            headers: self.headers.clone(),
        }
    }
}

impl CallContext {
    /// Creates a context with no deadline, no overrides, and no metadata.
    pub fn new() -> Self {
        Self::default()
    }

    /// The absolute deadline for the call, if any.
    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    /// Sets the absolute deadline for the call.
    pub fn set_deadline<T: Into<Option<Instant>>>(&mut self, v: T) -> &mut Self {
        self.deadline = v.into();
        self
    }

    /// Sets the deadline to `timeout` from now.
    pub fn set_timeout(&mut self, timeout: Duration) -> &mut Self {
        self.deadline = Instant::now().checked_add(timeout);
        self
    }

    /// Consuming version of [set_timeout][Self::set_timeout].
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.set_timeout(timeout);
        self
    }

    /// The timeout for the current attempt.
    ///
    /// The retrying stub sets this value before each attempt, based on the
    /// remaining budget of the retry policy.
    pub fn attempt_timeout(&self) -> Option<Duration> {
        self.attempt_timeout
    }

    pub fn set_attempt_timeout<T: Into<Option<Duration>>>(&mut self, v: T) -> &mut Self {
        self.attempt_timeout = v.into();
        self
    }

    /// Returns the earliest of the call deadline and the attempt deadline.
    pub fn effective_deadline(&self, now: Instant) -> Option<Instant> {
        let attempt = self.attempt_timeout.and_then(|t| now.checked_add(t));
        match (self.deadline, attempt) {
            (None, None) => None,
            (Some(d), None) | (None, Some(d)) => Some(d),
            (Some(a), Some(b)) => Some(std::cmp::min(a, b)),
        }
    }

    /// Returns true if this call overrides the stub's retry policy.
    pub fn has_retry_policy(&self) -> bool {
        self.retry_policy.is_some()
    }

    /// Overrides the stub's retry policy for this call.
    pub fn set_retry_policy<V: Into<RetryPolicyArg>>(&mut self, v: V) -> &mut Self {
        self.retry_policy = Some(v.into().into_inner());
        self
    }

    /// Consuming version of [set_retry_policy][Self::set_retry_policy].
    pub fn with_retry_policy<V: Into<RetryPolicyArg>>(mut self, v: V) -> Self {
        self.set_retry_policy(v);
        self
    }

    /// Returns a fresh instance of the retry policy override, if any.
    pub fn clone_retry_policy(&self) -> Option<Box<dyn RetryPolicy>> {
        self.retry_policy.as_ref().map(|p| p.clone_box())
    }

    /// Returns true if this call overrides the stub's backoff policy.
    pub fn has_backoff_policy(&self) -> bool {
        self.backoff_policy.is_some()
    }

    /// Overrides the stub's backoff policy for this call.
    pub fn set_backoff_policy<V: Into<BackoffPolicyArg>>(&mut self, v: V) -> &mut Self {
        self.backoff_policy = Some(v.into().into_inner());
        self
    }

    /// Consuming version of [set_backoff_policy][Self::set_backoff_policy].
    pub fn with_backoff_policy<V: Into<BackoffPolicyArg>>(mut self, v: V) -> Self {
        self.set_backoff_policy(v);
        self
    }

    /// Returns a fresh instance of the backoff policy override, if any.
    pub fn clone_backoff_policy(&self) -> Option<Box<dyn BackoffPolicy>> {
        self.backoff_policy.as_ref().map(|p| p.clone_box())
    }

    /// The credentials for this call, overriding the stub credentials.
    pub fn credentials(&self) -> Option<&Credentials> {
        self.credentials.as_ref()
    }

    pub fn set_credentials<T: Into<Option<Credentials>>>(&mut self, v: T) -> &mut Self {
        self.credentials = v.into();
        self
    }

    /// Additional headers sent with each attempt.
    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    pub fn headers_mut(&mut self) -> &mut HeaderMap {
        &mut self.headers
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::credentials::AnonymousCredentials;
    use crate::exponential_backoff::ExponentialBackoffBuilder;
    use crate::retry_policy::{AlwaysRetry, LimitedErrorCount, RetryPolicyExt};
    use http::HeaderValue;
    use test_case::test_case;

    static_assertions::assert_impl_all!(CallContext: Clone, Default, Send, Sync, std::fmt::Debug);

    #[test]
    fn defaults() {
        let context = CallContext::new();
        assert!(context.deadline().is_none());
        assert!(context.attempt_timeout().is_none());
        assert!(!context.has_retry_policy());
        assert!(!context.has_backoff_policy());
        assert!(context.clone_retry_policy().is_none());
        assert!(context.clone_backoff_policy().is_none());
        assert!(context.credentials().is_none());
        assert!(context.headers().is_empty());
    }

    #[test]
    fn deadline() {
        let now = Instant::now();
        let mut context = CallContext::new();
        context.set_deadline(now + Duration::from_secs(5));
        assert_eq!(context.deadline(), Some(now + Duration::from_secs(5)));
        context.set_deadline(None::<Instant>);
        assert!(context.deadline().is_none());

        let context = CallContext::new().with_timeout(Duration::from_secs(5));
        let got = context.deadline().expect("timeout sets the deadline");
        assert!(got >= now + Duration::from_secs(5), "{got:?}");
    }

    #[test_case(None, None, None; "neither")]
    #[test_case(Some(10), None, Some(10); "only deadline")]
    #[test_case(None, Some(3), Some(3); "only attempt")]
    #[test_case(Some(10), Some(3), Some(3); "attempt is earlier")]
    #[test_case(Some(2), Some(3), Some(2); "deadline is earlier")]
    fn effective_deadline(deadline: Option<u64>, attempt: Option<u64>, want: Option<u64>) {
        let now = Instant::now();
        let mut context = CallContext::new();
        context
            .set_deadline(deadline.map(|s| now + Duration::from_secs(s)))
            .set_attempt_timeout(attempt.map(Duration::from_secs));
        assert_eq!(
            context.effective_deadline(now),
            want.map(|s| now + Duration::from_secs(s))
        );
    }

    #[test]
    fn retry_policy_override_is_cloned() {
        let policy = LimitedErrorCount::new(AlwaysRetry, 1);
        let context = CallContext::new().with_retry_policy(policy);
        assert!(context.has_retry_policy());

        let status = crate::Status::new(crate::Code::Unavailable, "try-again");
        let mut first = context.clone_retry_policy().expect("override is set");
        assert!(first.on_failure(&status).is_continue());
        assert!(first.on_failure(&status).is_exhausted());

        // Each clone starts with a fresh budget.
        let mut second = context.clone_retry_policy().expect("override is set");
        assert!(second.on_failure(&status).is_continue());
    }

    #[test]
    fn backoff_policy_override() {
        let policy = ExponentialBackoffBuilder::new()
            .with_initial_delay(Duration::from_millis(1))
            .with_maximum_delay(Duration::from_millis(2))
            .clamp();
        let context = CallContext::new().with_backoff_policy(policy);
        assert!(context.has_backoff_policy());
        let mut policy = context.clone_backoff_policy().expect("override is set");
        assert!(policy.next_delay() <= Duration::from_millis(1));
    }

    #[test]
    fn clone() {
        let now = Instant::now();
        let policy = AlwaysRetry.with_attempt_limit(1);
        let mut context = CallContext::new().with_retry_policy(policy);
        context
            .set_deadline(now + Duration::from_secs(5))
            .set_credentials(crate::credentials::Credentials::from(AnonymousCredentials))
            .headers_mut()
            .insert("x-goog-test", HeaderValue::from_static("value"));

        let clone = context.clone();
        assert_eq!(clone.deadline(), context.deadline());
        assert!(clone.credentials().is_some());
        assert_eq!(clone.headers(), context.headers());
        assert!(!clone.has_backoff_policy());

        let status = crate::Status::new(crate::Code::Unavailable, "try-again");
        let mut policy = clone.clone_retry_policy().expect("override is set");
        assert!(policy.on_failure(&status).is_continue());
        assert!(policy.on_failure(&status).is_exhausted());
    }

    #[test]
    fn setters_chain() {
        let mut context = CallContext::new();
        context
            .set_retry_policy(AlwaysRetry.with_attempt_limit(2))
            .set_credentials(crate::credentials::Credentials::from(AnonymousCredentials))
            .headers_mut()
            .insert("x-goog-test", HeaderValue::from_static("value"));
        assert!(context.has_retry_policy());
        assert!(context.credentials().is_some());
        assert_eq!(
            context.headers().get("x-goog-test"),
            Some(&HeaderValue::from_static("value"))
        );
    }
}
