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

use crate::Result;
use crate::model;
use gax::backoff_policy::{BackoffPolicy, BackoffPolicyArg};
use gax::call_context::CallContext;
use gax::retry_loop::{resolve_policies, retry_loop_with_callback};
use gax::retry_policy::{RetryPolicy, RetryPolicyArg};
use std::time::Duration;

/// Implements a [Operations](super::stub::Operations) decorator that retries
/// failed calls.
///
/// The decorator owns the inner stub and, optionally, the default retry and
/// backoff policies. These defaults are never mutated: each call starts from a
/// fresh clone, or from the policies in its [CallContext] if present.
#[derive(Debug)]
pub struct Operations<T>
where
    T: super::stub::Operations,
{
    inner: T,
    retry_policy: Option<Box<dyn RetryPolicy>>,
    backoff_policy: Option<Box<dyn BackoffPolicy>>,
}

impl<T> Operations<T>
where
    T: super::stub::Operations,
{
    /// Creates a decorator without default policies.
    ///
    /// Unless the [CallContext] provides a retry policy, calls through this
    /// decorator make a single attempt.
    pub fn new(inner: T) -> Self {
        Self {
            inner,
            retry_policy: None,
            backoff_policy: None,
        }
    }

    /// Sets the default retry policy.
    pub fn with_retry_policy<V: Into<RetryPolicyArg>>(mut self, v: V) -> Self {
        self.retry_policy = Some(v.into().into_inner());
        self
    }

    /// Sets the default backoff policy.
    pub fn with_backoff_policy<V: Into<BackoffPolicyArg>>(mut self, v: V) -> Self {
        self.backoff_policy = Some(v.into().into_inner());
        self
    }

    /// Runs `call` in the retry loop.
    ///
    /// Each attempt receives the context with its attempt timeout capped by
    /// the remaining time in the retry policy. The caller's attempt timeout is
    /// restored before returning.
    fn retry<R, F>(&self, ctx: &mut CallContext, method: &'static str, mut call: F) -> Result<R>
    where
        F: FnMut(&T, &mut CallContext) -> Result<R>,
    {
        let (retry_policy, backoff_policy) = resolve_policies(
            ctx,
            self.retry_policy.as_deref(),
            self.backoff_policy.as_deref(),
        );
        let attempt_timeout = ctx.attempt_timeout();
        let result = retry_loop_with_callback(
            |remaining| {
                ctx.set_attempt_timeout(min_timeout(attempt_timeout, remaining));
                call(&self.inner, ctx)
            },
            std::thread::sleep,
            retry_policy,
            backoff_policy,
            |attempt_count, status, delay| {
                tracing::debug!(method, attempt_count, %status, ?delay, "retrying RPC");
            },
        );
        ctx.set_attempt_timeout(attempt_timeout);
        result
    }
}

fn min_timeout(a: Option<Duration>, b: Option<Duration>) -> Option<Duration> {
    match (a, b) {
        (Some(a), Some(b)) => Some(a.min(b)),
        (a, b) => a.or(b),
    }
}

impl<T> super::stub::Operations for Operations<T>
where
    T: super::stub::Operations,
{
    fn get_operation(
        &self,
        ctx: &mut CallContext,
        req: &model::GetOperationRequest,
    ) -> Result<model::Operation> {
        self.retry(
            ctx,
            "GetOperation",
            |inner, ctx| inner.get_operation(ctx, req),
        )
    }

    fn list_operations(
        &self,
        ctx: &mut CallContext,
        req: &model::ListOperationsRequest,
    ) -> Result<model::ListOperationsResponse> {
        self.retry(
            ctx,
            "ListOperations",
            |inner, ctx| inner.list_operations(ctx, req),
        )
    }

    fn delete_operation(
        &self,
        ctx: &mut CallContext,
        req: &model::DeleteOperationRequest,
    ) -> Result<model::Empty> {
        self.retry(
            ctx,
            "DeleteOperation",
            |inner, ctx| inner.delete_operation(ctx, req),
        )
    }

    fn cancel_operation(
        &self,
        ctx: &mut CallContext,
        req: &model::CancelOperationRequest,
    ) -> Result<model::Empty> {
        self.retry(
            ctx,
            "CancelOperation",
            |inner, ctx| inner.cancel_operation(ctx, req),
        )
    }
}
