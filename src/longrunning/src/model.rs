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

//! The messages used by the Long Running Operations API.

use gax::Status;
use gax::pagination::{Accessor, PageableResponse};
use serde::{Deserialize, Serialize};

/// This resource represents a long-running operation that is the result of a
/// network API call.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
#[non_exhaustive]
pub struct Operation {
    /// The server-assigned name, which is only unique within the same service
    /// that originally returns it.
    pub name: String,

    /// Service-specific metadata associated with the operation.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<serde_json::Value>,

    /// If `false`, the operation is still in progress. If `true`, the operation
    /// is completed, and either `error` or `response` is available.
    pub done: bool,

    /// The error result of the operation in case of failure or cancellation.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<Status>,

    /// The normal, successful response of the operation.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response: Option<serde_json::Value>,
}

impl Operation {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the value of [name][Operation::name].
    pub fn set_name<T: Into<String>>(mut self, v: T) -> Self {
        self.name = v.into();
        self
    }

    /// Sets the value of [metadata][Operation::metadata].
    pub fn set_metadata<T: Into<Option<serde_json::Value>>>(mut self, v: T) -> Self {
        self.metadata = v.into();
        self
    }

    /// Sets the value of [done][Operation::done].
    pub fn set_done(mut self, v: bool) -> Self {
        self.done = v;
        self
    }

    /// Sets the value of [error][Operation::error].
    ///
    /// A completed operation has either an error or a response, setting the
    /// error clears the response.
    pub fn set_error<T: Into<Status>>(mut self, v: T) -> Self {
        self.error = Some(v.into());
        self.response = None;
        self
    }

    /// Sets the value of [response][Operation::response].
    ///
    /// Setting the response clears the error.
    pub fn set_response<T: Into<serde_json::Value>>(mut self, v: T) -> Self {
        self.response = Some(v.into());
        self.error = None;
        self
    }
}

/// The request message for [Operations::get_operation][crate::stub::Operations::get_operation].
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
#[non_exhaustive]
pub struct GetOperationRequest {
    /// The name of the operation resource.
    pub name: String,
}

impl GetOperationRequest {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the value of [name][GetOperationRequest::name].
    pub fn set_name<T: Into<String>>(mut self, v: T) -> Self {
        self.name = v.into();
        self
    }
}

/// The request message for [Operations::list_operations][crate::stub::Operations::list_operations].
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
#[non_exhaustive]
pub struct ListOperationsRequest {
    /// The name of the operation's parent resource.
    pub name: String,

    /// The standard list filter.
    pub filter: String,

    /// The standard list page size. Zero lets the service choose.
    pub page_size: i32,

    /// The standard list page token.
    pub page_token: String,
}

impl ListOperationsRequest {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the value of [name][ListOperationsRequest::name].
    pub fn set_name<T: Into<String>>(mut self, v: T) -> Self {
        self.name = v.into();
        self
    }

    /// Sets the value of [filter][ListOperationsRequest::filter].
    pub fn set_filter<T: Into<String>>(mut self, v: T) -> Self {
        self.filter = v.into();
        self
    }

    /// Sets the value of [page_size][ListOperationsRequest::page_size].
    pub fn set_page_size<T: Into<i32>>(mut self, v: T) -> Self {
        self.page_size = v.into();
        self
    }

    /// Sets the value of [page_token][ListOperationsRequest::page_token].
    pub fn set_page_token<T: Into<String>>(mut self, v: T) -> Self {
        self.page_token = v.into();
        self
    }
}

/// The response message for [Operations::list_operations][crate::stub::Operations::list_operations].
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
#[non_exhaustive]
pub struct ListOperationsResponse {
    /// A list of operations that matches the specified filter in the request.
    pub operations: Vec<Operation>,

    /// The standard List next-page token.
    pub next_page_token: String,
}

impl ListOperationsResponse {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the value of [operations][ListOperationsResponse::operations].
    pub fn set_operations<T, V>(mut self, v: T) -> Self
    where
        T: IntoIterator<Item = V>,
        V: Into<Operation>,
    {
        self.operations = v.into_iter().map(|i| i.into()).collect();
        self
    }

    /// Sets the value of [next_page_token][ListOperationsResponse::next_page_token].
    pub fn set_next_page_token<T: Into<String>>(mut self, v: T) -> Self {
        self.next_page_token = v.into();
        self
    }
}

impl PageableResponse for ListOperationsResponse {
    fn next_page_token(&self) -> &str {
        &self.next_page_token
    }
}

/// Extracts the operations from a [ListOperationsResponse] page.
#[derive(Clone, Copy, Debug, Default)]
pub struct OperationsAccessor;

impl Accessor<ListOperationsResponse> for OperationsAccessor {
    type Element = Operation;

    fn elements<'a>(&self, page: &'a ListOperationsResponse) -> &'a [Operation] {
        &page.operations
    }

    fn elements_mut<'a>(&self, page: &'a mut ListOperationsResponse) -> &'a mut Vec<Operation> {
        &mut page.operations
    }
}

/// The request message for [Operations::delete_operation][crate::stub::Operations::delete_operation].
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
#[non_exhaustive]
pub struct DeleteOperationRequest {
    /// The name of the operation resource to be deleted.
    pub name: String,
}

impl DeleteOperationRequest {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the value of [name][DeleteOperationRequest::name].
    pub fn set_name<T: Into<String>>(mut self, v: T) -> Self {
        self.name = v.into();
        self
    }
}

/// The request message for [Operations::cancel_operation][crate::stub::Operations::cancel_operation].
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
#[non_exhaustive]
pub struct CancelOperationRequest {
    /// The name of the operation resource to be cancelled.
    pub name: String,
}

impl CancelOperationRequest {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the value of [name][CancelOperationRequest::name].
    pub fn set_name<T: Into<String>>(mut self, v: T) -> Self {
        self.name = v.into();
        self
    }
}

/// A generic empty message, returned by RPCs without a meaningful response.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[non_exhaustive]
pub struct Empty {}

impl Empty {
    pub fn new() -> Self {
        Self::default()
    }
}
