//! Session flows built on the client's credential management
//!
//! Login and signup are unauthenticated calls that install the returned
//! token pair; logout always ends with local credentials cleared.

use reqwest::Method;
use topcoin_domain::constants::{
    AUTH_LOGIN_PATH, AUTH_LOGOUT_PATH, AUTH_ME_PATH, AUTH_SIGNUP_PATH, HEALTH_PATH,
};
use topcoin_domain::{LoginRequest, SignupRequest, TokenResponse, UserProfile};
use tracing::{info, instrument, warn};

use super::client::ApiClient;
use super::errors::ApiError;
use super::request::RequestOptions;
use super::response::read_payload;

impl ApiClient {
    /// Sign in with email and password
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Request` (e.g. 401 "Invalid email or password")
    /// without touching the current credentials
    #[instrument(skip(self, password))]
    pub async fn login(&self, email: &str, password: &str) -> Result<TokenResponse, ApiError> {
        let request = LoginRequest { email: email.to_string(), password: password.to_string() };
        let tokens = self.issue_tokens(AUTH_LOGIN_PATH, &request).await?;
        info!("login successful");
        Ok(tokens)
    }

    /// Register a new account and sign in
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Request` (e.g. 400 "Email already registered")
    #[instrument(skip(self, request), fields(email = %request.email))]
    pub async fn signup(&self, request: &SignupRequest) -> Result<TokenResponse, ApiError> {
        let tokens = self.issue_tokens(AUTH_SIGNUP_PATH, request).await?;
        info!("signup successful");
        Ok(tokens)
    }

    /// Sign out
    ///
    /// The server call is best effort; its failure is logged and the local
    /// credentials are cleared either way.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Storage` if the store removal fails
    #[instrument(skip(self))]
    pub async fn logout(&self) -> Result<(), ApiError> {
        if self.is_authenticated() {
            if let Err(err) =
                self.request(AUTH_LOGOUT_PATH, RequestOptions::new(Method::POST)).await
            {
                warn!(error = %err, "server logout failed, clearing local credentials anyway");
            }
        }

        self.clear_tokens()?;
        info!("logged out");
        Ok(())
    }

    /// Profile of the signed-in user
    ///
    /// # Errors
    ///
    /// See [`ApiClient::get`]
    pub async fn current_user(&self) -> Result<UserProfile, ApiError> {
        self.get(AUTH_ME_PATH).await
    }

    /// Probe the unauthenticated health endpoint
    ///
    /// # Returns
    ///
    /// `true` for a 2xx response, `false` for any other status
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Transport` if the server is unreachable
    #[instrument(skip(self))]
    pub async fn health_check(&self) -> Result<bool, ApiError> {
        let url = self.resolve_url(HEALTH_PATH);
        let response = self.send_once(&url, &RequestOptions::default(), None).await?;

        let status = response.status();
        if status.is_success() {
            info!("API is healthy");
            Ok(true)
        } else {
            warn!(%status, "API returned non-success status");
            Ok(false)
        }
    }

    async fn issue_tokens<B: serde::Serialize>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<TokenResponse, ApiError> {
        let url = self.resolve_url(path);
        let options = RequestOptions::new(Method::POST).json(body)?;
        let response = self.send_once(&url, &options, None).await?;

        let tokens: TokenResponse = read_payload(response).await?.json()?;
        if let Err(err) = self.set_tokens(&tokens.access_token, &tokens.refresh_token) {
            warn!(error = %err, "failed to persist issued tokens");
        }
        Ok(tokens)
    }
}
