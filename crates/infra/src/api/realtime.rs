//! Real-time channel address derivation
//!
//! Pure functions of configuration and input; no network access.

use url::Url;

use super::client::ApiClient;
use super::errors::ApiError;

impl ApiClient {
    /// Address of a real-time channel under the configured realtime origin
    ///
    /// `"status"` and `"/status"` both resolve to `<realtime>/status`.
    pub fn realtime_channel_url(&self, endpoint: &str) -> String {
        join_realtime_url(&self.inner.config.realtime_base_url, endpoint)
    }

    /// Channel address with the current access token as `?token=`
    ///
    /// The realtime server authenticates the handshake from this query
    /// parameter.
    ///
    /// # Errors
    ///
    /// * `ApiError::Auth` - no access token is held
    /// * `ApiError::Config` - the derived address is not a valid URL
    pub fn authenticated_realtime_channel_url(&self, endpoint: &str) -> Result<String, ApiError> {
        let token = self
            .inner
            .tokens
            .access_token()
            .ok_or_else(|| ApiError::Auth("no access token for realtime channel".to_string()))?;

        let mut url = Url::parse(&self.realtime_channel_url(endpoint))
            .map_err(|e| ApiError::Config(format!("Invalid realtime channel URL: {}", e)))?;
        url.query_pairs_mut().append_pair("token", &token);
        Ok(url.into())
    }
}

fn join_realtime_url(base: &str, endpoint: &str) -> String {
    let base = base.trim_end_matches('/');
    if endpoint.starts_with('/') {
        format!("{}{}", base, endpoint)
    } else {
        format!("{}/{}", base, endpoint)
    }
}
