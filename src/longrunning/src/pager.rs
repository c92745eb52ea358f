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

//! Page retrievers for the list RPCs in this service.

use crate::Result;
use crate::model::{ListOperationsRequest, ListOperationsResponse, OperationsAccessor};
use crate::stub::Operations;
use gax::call_context::CallContext;
use gax::pagination::{PageRetriever, Pages, PaginatedResult};
use std::sync::Arc;

/// The continuation token reported for the last page returned by the service.
///
/// Services return their last elements together with an empty continuation
/// token. The pagination engine treats a page with an empty token as the
/// terminal page and never yields its elements. The retriever reports such
/// pages with this token instead, and returns an empty terminal page in the
/// following fetch.
///
/// This token is not a valid resume point. A retriever starting at this
/// token returns the empty terminal page without calling the service.
pub const LAST_PAGE_TOKEN: &str = "gapic::last-page";

/// Returns true if `token` is the continuation token of the last page.
///
/// Use this before saving a continuation token to resume the list later.
pub fn is_last_page(token: &str) -> bool {
    token == LAST_PAGE_TOKEN
}

/// The elements of [OperationsClient::list_operations][crate::client::OperationsClient::list_operations].
pub type ListOperationsPaginatedResult =
    PaginatedResult<ListOperationsResponse, OperationsAccessor, ListOperationsRetriever>;

/// The pages of [OperationsClient::list_operations_pages][crate::client::OperationsClient::list_operations_pages].
pub type ListOperationsPages =
    Pages<ListOperationsResponse, OperationsAccessor, ListOperationsRetriever>;

/// Fetches the pages of a `ListOperations` RPC, one RPC per page.
///
/// Each fetch uses a clone of the context template, so each page gets its
/// own retry budget.
#[derive(Clone, Debug)]
pub struct ListOperationsRetriever {
    stub: Arc<dyn Operations>,
    context: CallContext,
    request: ListOperationsRequest,
    done: bool,
}

impl ListOperationsRetriever {
    /// Creates a retriever starting at `request.page_token`.
    pub fn new(stub: Arc<dyn Operations>, request: ListOperationsRequest) -> Self {
        let done = is_last_page(&request.page_token);
        Self {
            stub,
            context: CallContext::new(),
            request,
            done,
        }
    }

    /// Sets the context template for each page.
    ///
    /// The deadline in the template is absolute, it applies to all the pages
    /// in a traversal.
    pub fn with_context(mut self, v: CallContext) -> Self {
        self.context = v;
        self
    }
}

impl PageRetriever<ListOperationsResponse> for ListOperationsRetriever {
    fn fetch(&mut self, page: &mut ListOperationsResponse) -> Result<()> {
        if self.done {
            *page = ListOperationsResponse::default();
            return Ok(());
        }
        let mut ctx = self.context.clone();
        *page = self.stub.list_operations(&mut ctx, &self.request)?;
        if page.next_page_token.is_empty() {
            self.done = true;
            if !page.operations.is_empty() {
                page.next_page_token = LAST_PAGE_TOKEN.to_string();
            }
        } else {
            self.request.page_token = page.next_page_token.clone();
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Operation;
    use crate::stub::tests::MockOperations;
    use gax::pagination::PageableResponse;
    use gax::retry_policy::{AlwaysRetry, RetryPolicyExt};
    use gax::{Code, Status};
    use http::HeaderValue;
    use std::time::{Duration, Instant};

    type TestResult = anyhow::Result<()>;

    fn page(token: &str, names: &[&str]) -> ListOperationsResponse {
        ListOperationsResponse::new()
            .set_next_page_token(token)
            .set_operations(names.iter().map(|n| Operation::new().set_name(*n)))
    }

    fn retriever(mock: MockOperations) -> ListOperationsRetriever {
        ListOperationsRetriever::new(Arc::new(mock), ListOperationsRequest::new())
    }

    #[test]
    fn last_page_has_elements() -> TestResult {
        let mut seq = mockall::Sequence::new();
        let mut mock = MockOperations::new();
        mock.expect_list_operations()
            .once()
            .in_sequence(&mut seq)
            .withf(|_, r| r.page_token.is_empty() && r.name == "projects/p")
            .returning(|_, _| Ok(page("t1", &["a", "b"])));
        mock.expect_list_operations()
            .once()
            .in_sequence(&mut seq)
            .withf(|_, r| r.page_token == "t1" && r.name == "projects/p")
            .returning(|_, _| Ok(page("", &["c"])));

        let mut retriever = ListOperationsRetriever::new(
            Arc::new(mock),
            ListOperationsRequest::new().set_name("projects/p"),
        );
        let mut response = ListOperationsResponse::default();
        retriever.fetch(&mut response)?;
        assert_eq!(response.next_page_token(), "t1");
        retriever.fetch(&mut response)?;
        assert_eq!(response.next_page_token(), LAST_PAGE_TOKEN);
        assert!(is_last_page(response.next_page_token()));
        assert_eq!(response.operations.len(), 1);
        retriever.fetch(&mut response)?;
        assert_eq!(response, ListOperationsResponse::default());
        // The retriever does not make more RPCs.
        retriever.fetch(&mut response)?;
        assert_eq!(response, ListOperationsResponse::default());
        Ok(())
    }

    #[test]
    fn last_page_is_empty() -> TestResult {
        let mut mock = MockOperations::new();
        mock.expect_list_operations()
            .once()
            .returning(|_, _| Ok(page("", &[])));
        let mut retriever = retriever(mock);
        let mut response = ListOperationsResponse::default();
        retriever.fetch(&mut response)?;
        assert_eq!(response.next_page_token(), "");
        Ok(())
    }

    #[test]
    fn starts_from_request_token() -> TestResult {
        let mut mock = MockOperations::new();
        mock.expect_list_operations()
            .once()
            .withf(|_, r| r.page_token == "resume-here")
            .returning(|_, _| Ok(page("", &["z"])));
        let mut retriever = ListOperationsRetriever::new(
            Arc::new(mock),
            ListOperationsRequest::new().set_page_token("resume-here"),
        );
        let mut response = ListOperationsResponse::default();
        retriever.fetch(&mut response)?;
        assert_eq!(response.next_page_token(), LAST_PAGE_TOKEN);
        Ok(())
    }

    #[test]
    fn resume_from_last_page_token() -> TestResult {
        // The mock has no expectations, any RPC fails the test.
        let mock = MockOperations::new();
        let request = ListOperationsRequest::new().set_page_token(LAST_PAGE_TOKEN);
        let mut retriever = ListOperationsRetriever::new(Arc::new(mock), request);
        let mut response = page("unused", &["unused"]);
        retriever.fetch(&mut response)?;
        assert_eq!(response, ListOperationsResponse::default());
        Ok(())
    }

    #[test]
    fn is_last_page_token() {
        assert!(is_last_page(LAST_PAGE_TOKEN));
        assert!(!is_last_page(""));
        assert!(!is_last_page("p2"));
    }

    fn matches_template(ctx: &CallContext, deadline: Instant) -> bool {
        let header = ctx.headers().get("x-goog-test");
        ctx.deadline() == Some(deadline)
            && ctx.has_retry_policy()
            && header == Some(&HeaderValue::from_static("v"))
    }

    #[test]
    fn uses_context_template() -> TestResult {
        let deadline = Instant::now() + Duration::from_secs(30);
        let mut mock = MockOperations::new();
        mock.expect_list_operations()
            .times(2)
            .withf(move |ctx, _| matches_template(ctx, deadline))
            .returning(|_, r| match r.page_token.as_str() {
                "" => Ok(page("t1", &["a"])),
                _ => Ok(page("", &["b"])),
            });
        let policy = AlwaysRetry.with_attempt_limit(2);
        let mut template = CallContext::new().with_retry_policy(policy);
        template
            .set_deadline(deadline)
            .headers_mut()
            .insert("x-goog-test", HeaderValue::from_static("v"));

        let mut retriever = retriever(mock).with_context(template);
        let mut response = ListOperationsResponse::default();
        retriever.fetch(&mut response)?;
        assert_eq!(response.next_page_token(), "t1");
        retriever.fetch(&mut response)?;
        assert_eq!(response.next_page_token(), LAST_PAGE_TOKEN);
        Ok(())
    }

    #[test]
    fn error() {
        let mut mock = MockOperations::new();
        mock.expect_list_operations()
            .once()
            .returning(|_, _| Err(Status::new(Code::Unavailable, "try-again")));
        let mut retriever = retriever(mock);
        let mut response = ListOperationsResponse::default();
        let err = retriever.fetch(&mut response).unwrap_err();
        assert_eq!(err.code(), Code::Unavailable);
    }

    #[test]
    fn all_elements() -> TestResult {
        let mut seq = mockall::Sequence::new();
        let mut mock = MockOperations::new();
        mock.expect_list_operations()
            .once()
            .in_sequence(&mut seq)
            .returning(|_, _| Ok(page("t1", &["a", "b"])));
        mock.expect_list_operations()
            .once()
            .in_sequence(&mut seq)
            .returning(|_, _| Ok(page("", &["c"])));
        let result = ListOperationsPaginatedResult::new(retriever(mock), OperationsAccessor, 0);
        let names = result
            .iter()
            .map(|o| o.map(|o| o.name))
            .collect::<Result<Vec<_>>>()?;
        assert_eq!(names, vec!["a", "b", "c"]);
        Ok(())
    }
}
