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

//! Traits to mock the clients in this library.
//!
//! Application developers may need to mock the clients in this library to test
//! how their application works with different (and sometimes hard to trigger)
//! client and service behavior. Such test can define mocks implementing the
//! trait(s) defined in this module, and use [OperationsClient::from_stub] to
//! create a client.
//!
//! [OperationsClient::from_stub]: crate::client::OperationsClient::from_stub

use crate::Result;
use crate::model;
use gax::Status;
use gax::call_context::CallContext;
use std::sync::Arc;

/// Defines the trait used to implement [crate::client::OperationsClient].
///
/// Application developers may need to implement this trait to mock
/// `client::OperationsClient`. In other use-cases, application developers only
/// use `client::OperationsClient` and need not be concerned with this trait or
/// its implementations.
///
/// Services gain new RPCs routinely. Consequently, this trait gains new methods
/// too. To avoid breaking applications the trait provides a default
/// implementation of each method. These implementations return an
/// `Unimplemented` error.
pub trait Operations: std::fmt::Debug + Send + Sync {
    /// Implements [crate::client::OperationsClient::get_operation].
    fn get_operation(
        &self,
        _ctx: &mut CallContext,
        _req: &model::GetOperationRequest,
    ) -> Result<model::Operation> {
        Err(Status::unimplemented("GetOperation"))
    }

    /// Implements one page of [crate::client::OperationsClient::list_operations].
    fn list_operations(
        &self,
        _ctx: &mut CallContext,
        _req: &model::ListOperationsRequest,
    ) -> Result<model::ListOperationsResponse> {
        Err(Status::unimplemented("ListOperations"))
    }

    /// Implements [crate::client::OperationsClient::delete_operation].
    fn delete_operation(
        &self,
        _ctx: &mut CallContext,
        _req: &model::DeleteOperationRequest,
    ) -> Result<model::Empty> {
        Err(Status::unimplemented("DeleteOperation"))
    }

    /// Implements [crate::client::OperationsClient::cancel_operation].
    fn cancel_operation(
        &self,
        _ctx: &mut CallContext,
        _req: &model::CancelOperationRequest,
    ) -> Result<model::Empty> {
        Err(Status::unimplemented("CancelOperation"))
    }
}

impl<T: Operations + ?Sized> Operations for Box<T> {
    fn get_operation(
        &self,
        ctx: &mut CallContext,
        req: &model::GetOperationRequest,
    ) -> Result<model::Operation> {
        (**self).get_operation(ctx, req)
    }

    fn list_operations(
        &self,
        ctx: &mut CallContext,
        req: &model::ListOperationsRequest,
    ) -> Result<model::ListOperationsResponse> {
        (**self).list_operations(ctx, req)
    }

    fn delete_operation(
        &self,
        ctx: &mut CallContext,
        req: &model::DeleteOperationRequest,
    ) -> Result<model::Empty> {
        (**self).delete_operation(ctx, req)
    }

    fn cancel_operation(
        &self,
        ctx: &mut CallContext,
        req: &model::CancelOperationRequest,
    ) -> Result<model::Empty> {
        (**self).cancel_operation(ctx, req)
    }
}

impl<T: Operations + ?Sized> Operations for Arc<T> {
    fn get_operation(
        &self,
        ctx: &mut CallContext,
        req: &model::GetOperationRequest,
    ) -> Result<model::Operation> {
        (**self).get_operation(ctx, req)
    }

    fn list_operations(
        &self,
        ctx: &mut CallContext,
        req: &model::ListOperationsRequest,
    ) -> Result<model::ListOperationsResponse> {
        (**self).list_operations(ctx, req)
    }

    fn delete_operation(
        &self,
        ctx: &mut CallContext,
        req: &model::DeleteOperationRequest,
    ) -> Result<model::Empty> {
        (**self).delete_operation(ctx, req)
    }

    fn cancel_operation(
        &self,
        ctx: &mut CallContext,
        req: &model::CancelOperationRequest,
    ) -> Result<model::Empty> {
        (**self).cancel_operation(ctx, req)
    }
}
