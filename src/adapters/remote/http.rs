//! HTTP hosting API client
//!
//! Talks to the repository endpoints of the remote host:
//!
//! - `POST   {base}/api/v1/repos`
//! - `DELETE {base}/api/v1/repos/{identifier}`
//!
//! Every request carries the account, organization and project identifiers as
//! query parameters and the access token as a bearer credential.

use super::{CreateRepositorySpec, RemoteClientFactory, RemoteRepository, RemoteTargetClient};
use crate::config::RemoteConfig;
use crate::domain::{RemoteError, TargetAccount};
use async_trait::async_trait;
use reqwest::{Client, ClientBuilder, RequestBuilder, Response, StatusCode};
use secrecy::ExposeSecret;
use std::sync::Arc;
use std::time::Duration;
use url::Url;

const REPOS_PATH: [&str; 3] = ["api", "v1", "repos"];

/// Client for the remote hosting API, bound to one target account
pub struct HttpRemoteClient {
    base_url: Url,
    client: Client,
    account: TargetAccount,
}

impl HttpRemoteClient {
    /// Create a new client
    ///
    /// # Arguments
    ///
    /// * `config` - Remote host settings
    /// * `account` - Account the client acts on behalf of
    ///
    /// # Errors
    ///
    /// Returns `RemoteError::ConnectionFailed` if the base URL is unusable or
    /// the HTTP client cannot be built
    pub fn new(config: &RemoteConfig, account: TargetAccount) -> Result<Self, RemoteError> {
        let base_url = Url::parse(&config.base_url).map_err(|e| {
            RemoteError::ConnectionFailed(format!("invalid base URL {}: {e}", config.base_url))
        })?;
        if base_url.cannot_be_a_base() {
            return Err(RemoteError::ConnectionFailed(format!(
                "base URL cannot carry a path: {}",
                config.base_url
            )));
        }

        let mut builder = ClientBuilder::new()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .connect_timeout(Duration::from_secs(config.timeout_seconds.min(30)));

        if !config.tls_verify {
            tracing::warn!(
                base_url = %config.base_url,
                "TLS certificate verification disabled for remote host"
            );
            builder = builder.danger_accept_invalid_certs(true);
        }

        let client = builder
            .build()
            .map_err(|e| RemoteError::ConnectionFailed(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            base_url,
            client,
            account,
        })
    }

    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        let token = self.account.token.expose_secret();
        request.bearer_auth(token.as_str()).query(&[
            ("accountIdentifier", self.account.account_id.as_str()),
            ("orgIdentifier", self.account.org_identifier.as_str()),
            ("projectIdentifier", self.account.project_identifier.as_str()),
        ])
    }

    /// `{base}/api/v1/repos`, plus the percent-encoded `identifier` if given
    fn repos_url(&self, identifier: Option<&str>) -> Url {
        let mut url = self.base_url.clone();
        // checked in `new`
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.pop_if_empty().extend(REPOS_PATH);
            if let Some(identifier) = identifier {
                segments.push(identifier);
            }
        }
        url
    }

    async fn send(&self, request: RequestBuilder) -> Result<Response, RemoteError> {
        request.send().await.map_err(|e| {
            if e.is_timeout() {
                RemoteError::Timeout(e.to_string())
            } else {
                RemoteError::ConnectionFailed(e.to_string())
            }
        })
    }
}

/// Maps an unsuccessful response to a [`RemoteError`]
async fn error_for_status(response: Response, identifier: &str) -> RemoteError {
    let status = response.status();
    let message = response.text().await.unwrap_or_default();

    match status {
        StatusCode::CONFLICT => RemoteError::AlreadyExists(identifier.to_string()),
        StatusCode::NOT_FOUND => RemoteError::NotFound(identifier.to_string()),
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
            RemoteError::AuthenticationFailed(format!("{status}: {message}"))
        }
        s if s.is_server_error() => RemoteError::ServerError {
            status: s.as_u16(),
            message,
        },
        s => RemoteError::ClientError {
            status: s.as_u16(),
            message,
        },
    }
}

#[async_trait]
impl RemoteTargetClient for HttpRemoteClient {
    async fn create_repository(
        &self,
        spec: &CreateRepositorySpec,
    ) -> Result<RemoteRepository, RemoteError> {
        tracing::debug!(identifier = %spec.identifier, "Creating remote repository");

        let request = self.authorize(self.client.post(self.repos_url(None)).json(spec));
        let response = self.send(request).await?;

        if !response.status().is_success() {
            return Err(error_for_status(response, &spec.identifier).await);
        }

        response
            .json::<RemoteRepository>()
            .await
            .map_err(|e| RemoteError::InvalidResponse(e.to_string()))
    }

    async fn delete_repository(&self, identifier: &str) -> Result<(), RemoteError> {
        tracing::debug!(identifier = %identifier, "Deleting remote repository");

        let url = self.repos_url(Some(identifier));
        let response = self.send(self.authorize(self.client.delete(url))).await?;

        if !response.status().is_success() {
            return Err(error_for_status(response, identifier).await);
        }

        Ok(())
    }
}

/// Builds [`HttpRemoteClient`]s from the shared remote settings
#[derive(Debug, Clone)]
pub struct HttpRemoteClientFactory {
    config: RemoteConfig,
}

impl HttpRemoteClientFactory {
    /// Create a new factory
    pub fn new(config: RemoteConfig) -> Self {
        Self { config }
    }
}

impl RemoteClientFactory for HttpRemoteClientFactory {
    fn client_for(
        &self,
        account: &TargetAccount,
    ) -> Result<Arc<dyn RemoteTargetClient>, RemoteError> {
        Ok(Arc::new(HttpRemoteClient::new(&self.config, account.clone())?))
    }
}
