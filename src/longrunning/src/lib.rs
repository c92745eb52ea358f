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

//! Client runtime for the Long Running Operations API.
//!
//! The [client::OperationsClient] is built from a chain of stubs: a base stub
//! making one call through a [gax::transport::Channel], wrapped by a stub that
//! retries transient failures, and optionally by a stub that traces each call.
//! Use the functions in [client] to create the chain, or implement
//! [stub::Operations] to mock the service in tests.

pub use gax::Result;

pub mod client;
pub mod model;
pub mod pager;
pub mod stub;

/// The stub decorator that retries failed calls.
pub mod retry;
/// The stub decorator that logs calls.
pub mod tracing;
/// The base stub, making one call through a channel.
pub mod transport;

pub use client::{create_stub, create_stub_with_config, create_stub_with_credentials};
