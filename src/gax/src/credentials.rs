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

//! Authentication credentials attached to each RPC.
//!
//! Stubs do not authenticate on their own. They ask a [Credentials] object for
//! the headers to send with each request, and the [transport][crate::transport]
//! carries those headers to the service.

use crate::Result;
use crate::status::{Code, Status};
use http::header::{AUTHORIZATION, HeaderName, HeaderValue};
use std::sync::Arc;

/// The environment variable consulted by [default_credentials].
pub const ACCESS_TOKEN_VAR: &str = "GOOGLE_OAUTH_ACCESS_TOKEN";

/// Produces the authentication headers for a request.
///
/// Application developers can implement this trait, along with
/// [Credentials::from()], to mock the credentials in tests.
pub trait CredentialsProvider: Send + Sync + std::fmt::Debug {
    /// Returns the headers to send with the next request.
    fn headers(&self) -> Result<Vec<(HeaderName, HeaderValue)>>;
}

/// A cloneable handle to a [CredentialsProvider].
///
/// Credentials are shared by every call made through a stub, and across
/// threads, hence the `Arc`.
#[derive(Clone, Debug)]
pub struct Credentials {
    inner: Arc<dyn CredentialsProvider>,
}

impl<T> std::convert::From<T> for Credentials
where
    T: CredentialsProvider + 'static,
{
    fn from(value: T) -> Self {
        Self {
            inner: Arc::new(value),
        }
    }
}

impl Credentials {
    /// Returns the headers to send with the next request.
    pub fn headers(&self) -> Result<Vec<(HeaderName, HeaderValue)>> {
        self.inner.headers()
    }
}

/// Credentials for a caller-provided OAuth2 access token.
///
/// The token is sent as a `Bearer` token in the `authorization` header.
#[derive(Clone)]
pub struct AccessTokenCredentials {
    token: String,
}

impl AccessTokenCredentials {
    pub fn new<T: Into<String>>(token: T) -> Self {
        Self {
            token: token.into(),
        }
    }
}

// Avoid printing tokens in logs.
impl std::fmt::Debug for AccessTokenCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AccessTokenCredentials")
            .field("token", &"[censored]")
            .finish()
    }
}

impl CredentialsProvider for AccessTokenCredentials {
    fn headers(&self) -> Result<Vec<(HeaderName, HeaderValue)>> {
        let mut value = HeaderValue::from_str(&format!("Bearer {}", self.token)).map_err(|e| {
            Status::new(
                Code::Unauthenticated,
                format!("cannot format access token as a header value: {e}"),
            )
        })?;
        value.set_sensitive(true);
        Ok(vec![(AUTHORIZATION, value)])
    }
}

/// Credentials that send no authentication headers.
///
/// Useful with local emulators and in tests.
#[derive(Clone, Debug, Default)]
pub struct AnonymousCredentials;

impl CredentialsProvider for AnonymousCredentials {
    fn headers(&self) -> Result<Vec<(HeaderName, HeaderValue)>> {
        Ok(Vec::new())
    }
}

/// Returns the ambient default credentials.
///
/// If the `GOOGLE_OAUTH_ACCESS_TOKEN` environment variable is set (and not
/// empty) the token it contains is used, otherwise the credentials are
/// anonymous.
pub fn default_credentials() -> Credentials {
    match std::env::var(ACCESS_TOKEN_VAR) {
        Ok(token) if !token.is_empty() => AccessTokenCredentials::new(token).into(),
        _ => AnonymousCredentials.into(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use scoped_env::ScopedEnv;

    type TestResult = anyhow::Result<()>;

    #[test]
    fn access_token() -> TestResult {
        let creds = Credentials::from(AccessTokenCredentials::new("test-token"));
        let headers = creds.headers()?;
        assert_eq!(headers.len(), 1, "{headers:?}");
        let (name, value) = &headers[0];
        assert_eq!(name, AUTHORIZATION);
        assert_eq!(value.to_str()?, "Bearer test-token");
        assert!(value.is_sensitive());
        Ok(())
    }

    #[test]
    fn access_token_debug() {
        let creds = AccessTokenCredentials::new("test-token");
        let fmt = format!("{creds:?}");
        assert!(!fmt.contains("test-token"), "{fmt}");
    }

    #[test]
    fn access_token_bad_header() {
        let creds = AccessTokenCredentials::new("bad\ntoken");
        let err = creds.headers().unwrap_err();
        assert_eq!(err.code(), Code::Unauthenticated, "{err:?}");
    }

    #[test]
    fn anonymous() -> TestResult {
        let creds = Credentials::from(AnonymousCredentials);
        assert!(creds.headers()?.is_empty());
        Ok(())
    }

    #[test]
    #[serial_test::serial]
    fn default_with_token() -> TestResult {
        let _e = ScopedEnv::set(ACCESS_TOKEN_VAR, "env-token");
        let headers = default_credentials().headers()?;
        let values = headers
            .iter()
            .map(|(_, v)| v.to_str())
            .collect::<std::result::Result<Vec<_>, _>>()?;
        assert_eq!(values, vec!["Bearer env-token"]);
        Ok(())
    }

    #[test]
    #[serial_test::serial]
    fn default_anonymous() -> TestResult {
        let _e = ScopedEnv::remove(ACCESS_TOKEN_VAR);
        assert!(default_credentials().headers()?.is_empty());

        let _e = ScopedEnv::set(ACCESS_TOKEN_VAR, "");
        assert!(default_credentials().headers()?.is_empty());
        Ok(())
    }
}
