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

//! The retry loop used by retrying stubs.

use crate::Result;
use crate::backoff_policy::BackoffPolicy;
use crate::call_context::CallContext;
use crate::exponential_backoff::ExponentialBackoff;
use crate::retry_policy::{NeverRetry, RetryPolicy};
use crate::status::Status;
use std::time::Duration;

/// Runs the retry loop for a given function.
///
/// This functions calls an inner function as long as (1) the retry policy
/// allows more attempts, and (2) the inner function has not returned a
/// successful response.
///
/// In between calls the function waits the amount of time prescribed by the
/// backoff policy, using `sleep` to implement any sleep.
///
/// The inner function receives the remaining time in the retry policy budget,
/// if the policy has one. On failure the function returns the last error
/// returned by `inner`, unchanged.
pub fn retry_loop<F, S, Response>(
    inner: F,
    sleep: S,
    retry_policy: Box<dyn RetryPolicy>,
    backoff_policy: Box<dyn BackoffPolicy>,
) -> Result<Response>
where
    F: FnMut(Option<Duration>) -> Result<Response>,
    S: FnMut(Duration),
{
    retry_loop_with_callback(inner, sleep, retry_policy, backoff_policy, |_, _, _| {})
}

/// Runs the retry loop for a given function with a callback for retries.
///
/// Works like [retry_loop]. The `on_retry` callback is called before
/// sleeping, with the attempt count, the error, and the delay.
pub fn retry_loop_with_callback<F, S, OnRetry, Response>(
    mut inner: F,
    mut sleep: S,
    mut retry_policy: Box<dyn RetryPolicy>,
    mut backoff_policy: Box<dyn BackoffPolicy>,
    mut on_retry: OnRetry,
) -> Result<Response>
where
    F: FnMut(Option<Duration>) -> Result<Response>,
    S: FnMut(Duration),
    OnRetry: FnMut(u32, &Status, Duration),
{
    let mut attempt_count = 0_u32;
    loop {
        attempt_count = attempt_count.saturating_add(1);
        let status = match inner(retry_policy.remaining_time()) {
            Ok(r) => return Ok(r),
            Err(status) => status,
        };
        if !retry_policy.on_failure(&status).is_continue() {
            return Err(status);
        }
        let delay = backoff_policy.next_delay();
        if retry_policy
            .remaining_time()
            .is_some_and(|remaining| remaining < delay)
        {
            tracing::debug!(
                attempt_count,
                ?delay,
                "retry budget expires before the next attempt"
            );
            return Err(status);
        }
        on_retry(attempt_count, &status, delay);
        sleep(delay);
    }
}

/// Returns the policies used by one call.
///
/// The policies configured in the call context take precedence over the
/// defaults configured in the stub. In either case the result is a fresh
/// clone, with its own budget, so concurrent calls never share policy state.
///
/// Without a retry policy the call makes a single attempt. Without a backoff
/// policy the call uses [ExponentialBackoff::default()].
pub fn resolve_policies(
    context: &CallContext,
    default_retry: Option<&dyn RetryPolicy>,
    default_backoff: Option<&dyn BackoffPolicy>,
) -> (Box<dyn RetryPolicy>, Box<dyn BackoffPolicy>) {
    let retry = context
        .clone_retry_policy()
        .or_else(|| default_retry.map(|p| p.clone_box()))
        .unwrap_or_else(|| Box::new(NeverRetry));
    let backoff = context
        .clone_backoff_policy()
        .or_else(|| default_backoff.map(|p| p.clone_box()))
        .unwrap_or_else(|| Box::new(ExponentialBackoff::default()));
    (retry, backoff)
}
