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
use crate::pager::{ListOperationsPages, ListOperationsPaginatedResult, ListOperationsRetriever};
use crate::stub::Operations as _;
use gax::backoff_policy::BackoffPolicy;
use gax::call_context::CallContext;
use gax::client_config::ClientConfig;
use gax::credentials::{Credentials, default_credentials};
use gax::exponential_backoff::ExponentialBackoffBuilder;
use gax::retry_policy::{Aip194Strict, RetryPolicy, RetryPolicyExt};
use gax::transport::Channel;
use std::sync::Arc;
use std::time::Duration;

/// The endpoint used when the configuration does not provide one.
pub const DEFAULT_ENDPOINT: &str = "https://longrunning.googleapis.com";

fn default_retry_policy() -> Box<dyn RetryPolicy> {
    Box::new(Aip194Strict.with_time_limit(Duration::from_millis(500)))
}

fn default_backoff_policy() -> Box<dyn BackoffPolicy> {
    Box::new(
        ExponentialBackoffBuilder::new()
            .with_initial_delay(Duration::from_millis(20))
            .with_maximum_delay(Duration::from_millis(100))
            .with_scaling(2.0)
            .clamp(),
    )
}

/// Creates a stub using the default credentials.
///
/// The stub retries transient errors for up to 500ms, with a truncated
/// exponential backoff starting at 20ms and capped at 100ms.
pub fn create_stub<C>(channel: C) -> Box<dyn crate::stub::Operations>
where
    C: Channel + 'static,
{
    create_stub_with_config(channel, ClientConfig::new())
}

/// Creates a stub using `credentials`.
pub fn create_stub_with_credentials<C>(
    channel: C,
    credentials: Credentials,
) -> Box<dyn crate::stub::Operations>
where
    C: Channel + 'static,
{
    create_stub_with_config(channel, ClientConfig::new().set_credentials(credentials))
}

/// Creates a stub using `config`.
///
/// Any setting missing in `config` uses the defaults described in
/// [create_stub]. If tracing is enabled, the stub logs each call, see
/// [ClientConfig::tracing_enabled].
pub fn create_stub_with_config<C>(
    channel: C,
    config: ClientConfig,
) -> Box<dyn crate::stub::Operations>
where
    C: Channel + 'static,
{
    let credentials = config
        .credentials()
        .cloned()
        .unwrap_or_else(default_credentials);
    let endpoint = config.endpoint().unwrap_or(DEFAULT_ENDPOINT);
    let base = crate::transport::Operations::new(Arc::new(channel), endpoint, credentials);
    let retry_policy = config
        .retry_policy()
        .map(|p| p.clone_box())
        .unwrap_or_else(default_retry_policy);
    let backoff_policy = config
        .backoff_policy()
        .map(|p| p.clone_box())
        .unwrap_or_else(default_backoff_policy);
    let stub = crate::retry::Operations::new(base)
        .with_retry_policy(retry_policy)
        .with_backoff_policy(backoff_policy);
    if config.tracing_enabled() {
        return Box::new(crate::tracing::Operations::new(stub));
    }
    Box::new(stub)
}

/// Manages long-running operations with an API service.
///
/// # Example
/// ```
/// # use gapic_longrunning::client::OperationsClient;
/// # use gapic_longrunning::model::GetOperationRequest;
/// # use gapic_longrunning::stub::Operations;
/// # use gax::call_context::CallContext;
/// #[derive(Debug)]
/// struct Unimplemented;
/// impl Operations for Unimplemented {}
///
/// let client = OperationsClient::from_stub(Unimplemented);
/// let mut ctx = CallContext::new();
/// let request = GetOperationRequest::new().set_name("operations/abc");
/// let response = client.get_operation(&mut ctx, &request);
/// assert!(response.is_err());
/// ```
///
/// # Pooling and Cloning
///
/// `OperationsClient` holds a stub shared by all clones. Cloning the client is
/// cheap, and the clones can be used from multiple threads.
#[derive(Clone, Debug)]
pub struct OperationsClient {
    inner: Arc<dyn crate::stub::Operations>,
}

impl OperationsClient {
    /// Creates a client using `channel` and the default configuration.
    pub fn new<C>(channel: C) -> Self
    where
        C: Channel + 'static,
    {
        Self::from_config(channel, ClientConfig::new())
    }

    /// Creates a client using `channel` and `config`.
    pub fn from_config<C>(channel: C, config: ClientConfig) -> Self
    where
        C: Channel + 'static,
    {
        Self {
            inner: Arc::from(create_stub_with_config(channel, config)),
        }
    }

    /// Creates a new client from the provided stub.
    ///
    /// The most common case for calling this function is in tests mocking the
    /// client's behavior.
    pub fn from_stub<T>(stub: T) -> Self
    where
        T: crate::stub::Operations + 'static,
    {
        Self {
            inner: Arc::new(stub),
        }
    }

    /// Gets the latest state of a long-running operation.
    pub fn get_operation(
        &self,
        ctx: &mut CallContext,
        req: &model::GetOperationRequest,
    ) -> Result<model::Operation> {
        self.inner.get_operation(ctx, req)
    }

    /// Lists operations that match the specified filter in the request.
    ///
    /// Fetches pages lazily, as the elements are consumed. A `cap` of 0 fetches
    /// all the pages, otherwise at most `cap` pages are fetched and the
    /// elements of the last one are not returned.
    ///
    /// Each page is fetched with a clone of `ctx`, including its deadline,
    /// policy overrides, credentials and headers.
    pub fn list_operations(
        &self,
        ctx: &CallContext,
        req: model::ListOperationsRequest,
        cap: usize,
    ) -> ListOperationsPaginatedResult {
        let retriever = self.retriever(ctx, req);
        ListOperationsPaginatedResult::new(retriever, model::OperationsAccessor, cap)
    }

    /// Lists operations one page at a time.
    ///
    /// See [list_operations][Self::list_operations] for the meaning of `ctx`
    /// and `cap`. The continuation token of the last page is
    /// [LAST_PAGE_TOKEN][crate::pager::LAST_PAGE_TOKEN], see
    /// [is_last_page][crate::pager::is_last_page].
    pub fn list_operations_pages(
        &self,
        ctx: &CallContext,
        req: model::ListOperationsRequest,
        cap: usize,
    ) -> ListOperationsPages {
        let retriever = self.retriever(ctx, req);
        ListOperationsPages::new(retriever, model::OperationsAccessor, cap)
    }

    /// Deletes a long-running operation.
    pub fn delete_operation(
        &self,
        ctx: &mut CallContext,
        req: &model::DeleteOperationRequest,
    ) -> Result<model::Empty> {
        self.inner.delete_operation(ctx, req)
    }

    /// Starts asynchronous cancellation on a long-running operation.
    pub fn cancel_operation(
        &self,
        ctx: &mut CallContext,
        req: &model::CancelOperationRequest,
    ) -> Result<model::Empty> {
        self.inner.cancel_operation(ctx, req)
    }

    fn retriever(
        &self,
        ctx: &CallContext,
        req: model::ListOperationsRequest,
    ) -> ListOperationsRetriever {
        ListOperationsRetriever::new(self.inner.clone(), req).with_context(ctx.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stub::tests::MockOperations;
    use gax::{Code, Status};

    static_assertions::assert_impl_all!(OperationsClient: Clone, Send, Sync, std::fmt::Debug);

    #[test]
    fn forwards_to_stub() -> anyhow::Result<()> {
        let mut mock = MockOperations::new();
        mock.expect_get_operation()
            .once()
            .returning(|_, r| Ok(model::Operation::new().set_name(&r.name).set_done(true)));
        mock.expect_delete_operation()
            .once()
            .returning(|_, _| Ok(model::Empty::new()));
        mock.expect_cancel_operation()
            .once()
            .returning(|_, _| Err(Status::new(Code::FailedPrecondition, "already done")));
        let client = OperationsClient::from_stub(mock);

        let mut ctx = CallContext::new();
        let operation = client.get_operation(
            &mut ctx,
            &model::GetOperationRequest::new().set_name("operations/abc"),
        )?;
        assert!(operation.done);
        client.delete_operation(&mut ctx, &model::DeleteOperationRequest::new())?;
        let err = client
            .cancel_operation(&mut ctx, &model::CancelOperationRequest::new())
            .unwrap_err();
        assert_eq!(err.code(), Code::FailedPrecondition);
        Ok(())
    }

    #[test]
    fn list_operations() -> anyhow::Result<()> {
        let mut mock = MockOperations::new();
        mock.expect_list_operations().returning(|_, r| {
            let (next, names) = match r.page_token.as_str() {
                "" => ("p2", vec!["a", "b"]),
                "p2" => ("p3", vec!["c"]),
                _ => ("", vec!["d"]),
            };
            Ok(model::ListOperationsResponse::new()
                .set_next_page_token(next)
                .set_operations(names.into_iter().map(|n| model::Operation::new().set_name(n))))
        });
        let client = OperationsClient::from_stub(mock);

        let ctx = CallContext::new();
        let result = client.list_operations(&ctx, model::ListOperationsRequest::new(), 0);
        let names = result
            .iter()
            .map(|o| o.map(|o| o.name))
            .collect::<Result<Vec<_>>>()?;
        assert_eq!(names, vec!["a", "b", "c", "d"]);

        // Iterating again starts from the first page.
        let count = result.iter().count();
        assert_eq!(count, 4);

        let request = model::ListOperationsRequest::new();
        let pages = client.list_operations_pages(&ctx, request, 2);
        let sizes = pages
            .iter()
            .map(|p| p.map(|p| p.len()))
            .collect::<Result<Vec<_>>>()?;
        assert_eq!(sizes, vec![2]);
        Ok(())
    }

    #[test]
    fn default_policies() {
        let retry = default_retry_policy();
        let remaining = retry.remaining_time();
        assert!(remaining.is_some_and(|t| t <= Duration::from_millis(500)));
        let mut backoff = default_backoff_policy();
        for _ in 0..10 {
            assert!(backoff.next_delay() <= Duration::from_millis(100));
        }
    }
}
