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

//! Retry loop control types.
//!
//! Applications only need to use these types when implementing their own
//! retry policies.

/// The result of a retry policy decision.
///
/// The decision does not carry the error. The retry loop always returns the
/// last [Status][crate::Status] it observed, a policy cannot replace it.
///
/// # Example
///
/// ```
/// # use gax::retry_policy::RetryPolicy;
/// # use gax::retry_result::RetryResult;
/// # use gax::Status;
/// #[derive(Debug, Default)]
/// struct MyRetryPolicy {
///     failures: u32,
/// }
/// impl RetryPolicy for MyRetryPolicy {
///     fn on_failure(&mut self, _status: &Status) -> RetryResult {
///         self.failures += 1;
///         if self.failures > 42 {
///             return RetryResult::Exhausted;
///         }
///         RetryResult::Continue
///     }
///     fn clone_box(&self) -> Box<dyn RetryPolicy> {
///         Box::new(MyRetryPolicy::default())
///     }
/// }
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RetryResult {
    /// The error is non-retryable, stop the loop.
    Permanent,

    /// The error is retryable, but the policy is stopping the loop.
    ///
    /// Loop control policies may stop the loop on retryable errors, for
    /// example, because the policy only allows a limited number of attempts.
    Exhausted,

    /// The error was retryable, continue the loop.
    Continue,
}

impl RetryResult {
    pub fn is_permanent(&self) -> bool {
        match &self {
            Self::Permanent => true,
            Self::Exhausted | Self::Continue => false,
        }
    }
    pub fn is_exhausted(&self) -> bool {
        match &self {
            Self::Exhausted => true,
            Self::Permanent | Self::Continue => false,
        }
    }
    pub fn is_continue(&self) -> bool {
        match &self {
            Self::Continue => true,
            Self::Permanent | Self::Exhausted => false,
        }
    }
}
