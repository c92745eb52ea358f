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
use gax::call_context::CallContext;

/// Implements a [Operations](super::stub::Operations) decorator for logging and tracing.
#[derive(Clone, Debug)]
pub struct Operations<T>
where
    T: super::stub::Operations,
{
    inner: T,
}

impl<T> Operations<T>
where
    T: super::stub::Operations,
{
    pub fn new(inner: T) -> Self {
        Self { inner }
    }
}

impl<T> super::stub::Operations for Operations<T>
where
    T: super::stub::Operations,
{
    #[tracing::instrument(level = "debug", skip(self, ctx), ret, err)]
    fn get_operation(
        &self,
        ctx: &mut CallContext,
        req: &model::GetOperationRequest,
    ) -> Result<model::Operation> {
        self.inner.get_operation(ctx, req)
    }

    #[tracing::instrument(level = "debug", skip(self, ctx), ret, err)]
    fn list_operations(
        &self,
        ctx: &mut CallContext,
        req: &model::ListOperationsRequest,
    ) -> Result<model::ListOperationsResponse> {
        self.inner.list_operations(ctx, req)
    }

    #[tracing::instrument(level = "debug", skip(self, ctx), ret, err)]
    fn delete_operation(
        &self,
        ctx: &mut CallContext,
        req: &model::DeleteOperationRequest,
    ) -> Result<model::Empty> {
        self.inner.delete_operation(ctx, req)
    }

    #[tracing::instrument(level = "debug", skip(self, ctx), ret, err)]
    fn cancel_operation(
        &self,
        ctx: &mut CallContext,
        req: &model::CancelOperationRequest,
    ) -> Result<model::Empty> {
        self.inner.cancel_operation(ctx, req)
    }
}
