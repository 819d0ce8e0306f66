//! Authenticated API client with single-flight token refresh
//!
//! Every request carries the current bearer token. A 401 triggers (or
//! joins) one coordinated refresh and the request is retried exactly once
//! with the new token; a second 401 clears the credentials and fails.

use std::sync::Arc;

use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use reqwest::{Method, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use topcoin_common::CredentialStore;
use topcoin_domain::constants::AUTH_REFRESH_PATH;
use topcoin_domain::{ClientConfig, Credentials};
use tracing::{debug, info, instrument, warn};

use super::auth::TokenState;
use super::errors::ApiError;
use super::refresh::{exchange_refresh_token, RefreshCoordinator, RefreshError, RefreshResult};
use super::request::{Payload, RequestOptions};
use super::response::read_payload;
use crate::config::validate;
use crate::http::HttpClient;

/// Client for the Topcoin HTTP API
///
/// Cheap to clone; clones share credential state and the refresh slot.
#[derive(Clone)]
pub struct ApiClient {
    pub(super) inner: Arc<ClientInner>,
}

pub(super) struct ClientInner {
    pub(super) config: ClientConfig,
    pub(super) http: HttpClient,
    pub(super) tokens: TokenState,
    refresh: RefreshCoordinator,
}

impl ApiClient {
    /// Create a new API client
    ///
    /// Credential state is seeded from `store` once, here.
    ///
    /// # Arguments
    ///
    /// * `config` - Origins and transport settings
    /// * `store` - Persistent credential store mirrored on every change
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Config` if an origin is invalid or the transport
    /// cannot be created
    pub fn new(config: ClientConfig, store: Arc<dyn CredentialStore>) -> Result<Self, ApiError> {
        let config = config.normalized();
        validate(&config)?;

        let mut http = HttpClient::builder().timeout(config.timeout());
        if let Some(agent) = &config.user_agent {
            http = http.user_agent(agent.clone());
        }
        let http = http
            .build()
            .map_err(|e| ApiError::Config(format!("Failed to build HttpClient: {}", e)))?;

        let tokens = TokenState::load(store);
        debug!(api = %config.api_base_url, realtime = %config.realtime_base_url, "API client created");

        Ok(Self {
            inner: Arc::new(ClientInner {
                config,
                http,
                tokens,
                refresh: RefreshCoordinator::default(),
            }),
        })
    }

    /// Create a builder for fluent configuration
    pub fn builder() -> ApiClientBuilder {
        ApiClientBuilder::default()
    }

    /// Configuration the client was built with
    pub fn config(&self) -> &ClientConfig {
        &self.inner.config
    }

    /// Perform one logical request
    ///
    /// `path` is appended to the API origin unless it is already an
    /// absolute `http(s)` URL. Caller headers override the default
    /// `Content-Type: application/json`; the bearer header is added last.
    ///
    /// # Errors
    ///
    /// * `ApiError::Auth` - refresh impossible or failed, or the retry was
    ///   still unauthorized (credentials are cleared)
    /// * `ApiError::Request` - any other non-2xx response
    /// * `ApiError::Transport` - the network call failed
    #[instrument(skip(self, options), fields(method = %options.method))]
    pub async fn request(&self, path: &str, options: RequestOptions) -> Result<Payload, ApiError> {
        let url = self.resolve_url(path);
        let sent_token = self.inner.tokens.access_token();

        let response = self.send_once(&url, &options, sent_token.as_deref()).await?;
        if response.status() != StatusCode::UNAUTHORIZED {
            return read_payload(response).await;
        }

        debug!("request unauthorized, recovering access token");
        let token = self.token_for_retry(sent_token.as_deref()).await?;

        let retried = self.send_once(&url, &options, Some(&token)).await?;
        if retried.status() == StatusCode::UNAUTHORIZED {
            warn!("request still unauthorized after refresh, clearing credentials");
            self.inner.tokens.clear_quietly();
            return Err(ApiError::Auth("request unauthorized after token refresh".to_string()));
        }

        read_payload(retried).await
    }

    /// GET `path` and decode the response
    ///
    /// # Errors
    ///
    /// See [`ApiClient::request`]; also `ApiError::Decode` if the payload
    /// does not match `T`
    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        self.request(path, RequestOptions::new(Method::GET)).await?.json()
    }

    /// POST `body` as JSON to `path` and decode the response
    ///
    /// Use [`ApiClient::request`] for a bodiless POST.
    ///
    /// # Errors
    ///
    /// See [`ApiClient::get`]
    pub async fn post<B, T>(&self, path: &str, body: &B) -> Result<T, ApiError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        self.send_json(Method::POST, path, body).await
    }

    /// PUT `body` as JSON to `path` and decode the response
    ///
    /// # Errors
    ///
    /// See [`ApiClient::get`]
    pub async fn put<B, T>(&self, path: &str, body: &B) -> Result<T, ApiError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        self.send_json(Method::PUT, path, body).await
    }

    /// PATCH `body` as JSON to `path` and decode the response
    ///
    /// # Errors
    ///
    /// See [`ApiClient::get`]
    pub async fn patch<B, T>(&self, path: &str, body: &B) -> Result<T, ApiError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        self.send_json(Method::PATCH, path, body).await
    }

    /// DELETE `path` and decode the response
    ///
    /// # Errors
    ///
    /// See [`ApiClient::get`]
    pub async fn delete<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        self.request(path, RequestOptions::new(Method::DELETE)).await?.json()
    }

    /// Obtain a fresh access token, joining a refresh already in flight
    ///
    /// On success the new access token (and rotated refresh token, if the
    /// server sent one) is installed. On failure both tokens are cleared.
    /// The refresh runs on its own task, so it still settles and installs
    /// its outcome if this call is dropped before it completes.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Auth` if no refresh token is held or the refresh
    /// endpoint call fails
    pub async fn refresh_access_token(&self) -> Result<String, ApiError> {
        let (pending, started) = self.inner.refresh.join_or_start(|| {
            let inner = Arc::clone(&self.inner);
            async move {
                let result = inner.run_refresh().await;
                inner.refresh.release();
                result
            }
        });

        if started {
            info!("starting access token refresh");
        } else {
            debug!("joining in-flight access token refresh");
        }

        pending.await.map_err(ApiError::from)
    }

    /// Replace both tokens (used after login)
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Storage` if the store write fails; the in-memory
    /// tokens are replaced regardless
    pub fn set_tokens(&self, access_token: &str, refresh_token: &str) -> Result<(), ApiError> {
        self.inner.tokens.set(access_token, refresh_token)?;
        Ok(())
    }

    /// Drop both tokens (used on logout)
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Storage` if the store removal fails; the
    /// in-memory tokens are cleared regardless
    pub fn clear_tokens(&self) -> Result<(), ApiError> {
        self.inner.tokens.clear()?;
        Ok(())
    }

    /// Current access token, if any
    pub fn access_token(&self) -> Option<String> {
        self.inner.tokens.access_token()
    }

    /// Current refresh token, if any
    pub fn refresh_token(&self) -> Option<String> {
        self.inner.tokens.refresh_token()
    }

    /// Snapshot of both tokens
    pub fn credentials(&self) -> Credentials {
        self.inner.tokens.snapshot()
    }

    /// `true` when an access token is held
    pub fn is_authenticated(&self) -> bool {
        self.inner.tokens.access_token().is_some()
    }

    pub(super) fn resolve_url(&self, path: &str) -> String {
        if is_absolute_http_url(path) {
            return path.to_string();
        }

        let base = &self.inner.config.api_base_url;
        if path.starts_with('/') {
            format!("{}{}", base, path)
        } else {
            format!("{}/{}", base, path)
        }
    }

    async fn send_json<B, T>(&self, method: Method, path: &str, body: &B) -> Result<T, ApiError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let options = RequestOptions::new(method).json(body)?;
        self.request(path, options).await?.json()
    }

    pub(super) async fn send_once(
        &self,
        url: &str,
        options: &RequestOptions,
        token: Option<&str>,
    ) -> Result<Response, ApiError> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.extend(options.headers.clone());
        if let Some(token) = token {
            headers.insert(AUTHORIZATION, bearer(token)?);
        }

        let mut builder = self.inner.http.request(options.method.clone(), url).headers(headers);
        if let Some(body) = &options.body {
            builder = builder.body(body.clone());
        }

        Ok(self.inner.http.send(builder).await?)
    }

    /// Token to retry a 401 with.
    ///
    /// If another caller already replaced the token this request was sent
    /// with, that newer token is used without starting another refresh.
    async fn token_for_retry(&self, sent: Option<&str>) -> Result<String, ApiError> {
        if let Some(current) = self.inner.tokens.access_token() {
            if sent != Some(current.as_str()) {
                debug!("access token changed while request was in flight, reusing it");
                return Ok(current);
            }
        }

        self.refresh_access_token().await
    }
}

impl ClientInner {
    async fn run_refresh(&self) -> RefreshResult {
        let Some(refresh_token) = self.tokens.refresh_token() else {
            warn!("no refresh token available, clearing credentials");
            self.tokens.clear_quietly();
            return Err(RefreshError::MissingRefreshToken);
        };

        let url = format!("{}{}", self.config.api_base_url, AUTH_REFRESH_PATH);
        match exchange_refresh_token(&self.http, &url, refresh_token).await {
            Ok(tokens) => {
                let access_token = tokens.access_token.clone();
                self.tokens.install_refreshed(tokens.access_token, tokens.refresh_token);
                info!("access token refreshed");
                Ok(access_token)
            }
            Err(err) => {
                warn!(error = %err, "access token refresh failed, clearing credentials");
                self.tokens.clear_quietly();
                Err(err)
            }
        }
    }
}

pub(super) fn bearer(token: &str) -> Result<HeaderValue, ApiError> {
    let mut value = HeaderValue::from_str(&format!("Bearer {}", token))
        .map_err(|_| ApiError::InvalidRequest("access token is not a valid header value".into()))?;
    value.set_sensitive(true);
    Ok(value)
}

fn is_absolute_http_url(path: &str) -> bool {
    url::Url::parse(path).is_ok_and(|url| matches!(url.scheme(), "http" | "https"))
}

/// Builder for [`ApiClient`]
#[derive(Default)]
pub struct ApiClientBuilder {
    config: Option<ClientConfig>,
    store: Option<Arc<dyn CredentialStore>>,
}

impl ApiClientBuilder {
    /// Set the client configuration
    pub fn config(mut self, config: ClientConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Set the persistent credential store
    pub fn store(mut self, store: Arc<dyn CredentialStore>) -> Self {
        self.store = Some(store);
        self
    }

    /// Build the API client
    ///
    /// # Errors
    ///
    /// Returns error if the store is missing or client creation fails
    pub fn build(self) -> Result<ApiClient, ApiError> {
        let config = self.config.unwrap_or_default();
        let store =
            self.store.ok_or_else(|| ApiError::Config("Credential store not set".to_string()))?;

        ApiClient::new(config, store)
    }
}
