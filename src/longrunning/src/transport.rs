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
use gax::Status;
use gax::call_context::CallContext;
use gax::credentials::Credentials;
use gax::transport::{Channel, UnaryRequest, decode, encode};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::sync::Arc;
use std::time::Instant;

const SERVICE_NAME: &str = "google.longrunning.Operations";

/// Implements [Operations](super::stub::Operations) using a [Channel].
///
/// Each method makes exactly one call through the channel.
#[derive(Clone, Debug)]
pub struct Operations {
    channel: Arc<dyn Channel>,
    endpoint: String,
    credentials: Credentials,
}

impl Operations {
    pub fn new<T: Into<String>>(
        channel: Arc<dyn Channel>,
        endpoint: T,
        credentials: Credentials,
    ) -> Self {
        Self {
            channel,
            endpoint: endpoint.into(),
            credentials,
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    fn unary<Req, Resp>(&self, ctx: &CallContext, method: &str, req: &Req) -> Result<Resp>
    where
        Req: Serialize,
        Resp: DeserializeOwned,
    {
        let credentials = ctx.credentials().unwrap_or(&self.credentials);
        let mut headers = ctx.headers().clone();
        for (name, value) in credentials.headers()? {
            headers.insert(name, value);
        }
        let request = UnaryRequest {
            method: format!("{SERVICE_NAME}/{method}"),
            endpoint: self.endpoint.clone(),
            headers,
            deadline: ctx.effective_deadline(Instant::now()),
            payload: encode(req)?,
        };
        let response = self.channel.unary(request).map_err(Status::from)?;
        decode(response)
    }
}

impl super::stub::Operations for Operations {
    fn get_operation(
        &self,
        ctx: &mut CallContext,
        req: &model::GetOperationRequest,
    ) -> Result<model::Operation> {
        self.unary(ctx, "GetOperation", req)
    }

    fn list_operations(
        &self,
        ctx: &mut CallContext,
        req: &model::ListOperationsRequest,
    ) -> Result<model::ListOperationsResponse> {
        self.unary(ctx, "ListOperations", req)
    }

    fn delete_operation(
        &self,
        ctx: &mut CallContext,
        req: &model::DeleteOperationRequest,
    ) -> Result<model::Empty> {
        self.unary(ctx, "DeleteOperation", req)
    }

    fn cancel_operation(
        &self,
        ctx: &mut CallContext,
        req: &model::CancelOperationRequest,
    ) -> Result<model::Empty> {
        self.unary(ctx, "CancelOperation", req)
    }
}
