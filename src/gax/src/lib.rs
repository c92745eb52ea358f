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

//! RPC client runtime helpers.
//!
//! This crate contains the types and functions used in the implementation of
//! generated RPC client stubs. Generated code wraps a single-call stub in a
//! retrying decorator driven by [retry_loop], and exposes list RPCs as lazy
//! [pagination] sequences.
//!
//! The crate does not define a wire protocol. Stubs perform each call through
//! an injected [transport::Channel].

/// An alias of [std::result::Result] where the error is always [Status].
///
/// This is the result type used by all functions wrapping RPCs.
pub type Result<T> = std::result::Result<T, crate::status::Status>;

pub mod status;
pub use status::{Code, Status};

pub mod call_context;
pub mod client_config;
pub mod credentials;
pub mod transport;

pub mod backoff_policy;
pub mod exponential_backoff;
pub mod retry_loop;
pub mod retry_policy;
pub mod retry_result;

/// Lazy sequences over paginated list RPCs.
pub mod pagination;
