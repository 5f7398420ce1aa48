//! `IdentityProvider` over an HTTP token-issuing endpoint.
//!
//! `POST {url}` with `{subject, address, addressType}`; the answer carries
//! the session token as `token` (or `customToken`).

use async_trait::async_trait;
use oi_01_wallet_auth::{
    identity_subject, AddressType, AuthenticatedIdentity, IdentityProvider, IdentityProviderError,
    SessionToken,
};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::ordinalsbot::REQUEST_TIMEOUT;
use crate::config::IdentityConfig;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct IssueRequest<'a> {
    subject: String,
    address: &'a str,
    address_type: AddressType,
}

#[derive(Deserialize)]
struct IssueResponse {
    #[serde(alias = "customToken")]
    token: String,
}

/// HTTP identity provider.
pub struct HttpIdentityProvider {
    http: Client,
    config: IdentityConfig,
}

impl HttpIdentityProvider {
    /// Create a provider for `config`.
    pub fn new(config: IdentityConfig) -> Result<Self, IdentityProviderError> {
        let http = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| IdentityProviderError::Unavailable(e.to_string()))?;
        Ok(Self { http, config })
    }
}

#[async_trait]
impl IdentityProvider for HttpIdentityProvider {
    async fn issue_session(
        &self,
        identity: &AuthenticatedIdentity,
    ) -> Result<SessionToken, IdentityProviderError> {
        let body = IssueRequest {
            subject: identity_subject(&identity.address),
            address: &identity.address,
            address_type: identity.address_type,
        };
        debug!("[oi-01] Requesting session for subject {}", body.subject);

        let mut request = self.http.post(&self.config.url).json(&body);
        if let Some(key) = &self.config.api_key {
            request = request.bearer_auth(key);
        }

        let response = request
            .send()
            .await
            .map_err(|e| IdentityProviderError::Unavailable(e.to_string()))?;
        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(IdentityProviderError::Rejected {
                status: status.as_u16(),
                message,
            });
        }

        let issued: IssueResponse = response
            .json()
            .await
            .map_err(|e| IdentityProviderError::InvalidResponse(e.to_string()))?;
        Ok(SessionToken(issued.token))
    }
}
