use crate::error::{AppError, Result};
use oauth2::{
    Client, ClientId, ClientSecret, EndpointNotSet, EndpointSet, RefreshToken,
    StandardRevocableToken, TokenResponse, TokenUrl,
    basic::{
        BasicClient, BasicErrorResponse, BasicRevocationErrorResponse,
        BasicTokenIntrospectionResponse, BasicTokenResponse,
    },
};
use reqwest::redirect::Policy;
use std::sync::{Arc, Mutex, PoisonError};
use tracing::debug;

pub(super) const GOOGLE_TOKEN_URL: &str = "https://oauth2.googleapis.com/token";

// Refresh this many seconds before the reported expiry.
const EXPIRY_MARGIN_SECS: i64 = 300;
const DEFAULT_EXPIRES_IN_SECS: i64 = 3600;

#[derive(Debug, Clone)]
struct AccessToken {
    secret: String,
    /// Expiry time as seconds since Unix epoch
    expires_at: i64,
}

impl AccessToken {
    fn is_expired(&self, now: i64) -> bool {
        self.expires_at < (now + EXPIRY_MARGIN_SECS)
    }
}

// Type alias for the client when only the Token URL is set
type ConfiguredClient = Client<
    BasicErrorResponse,
    BasicTokenResponse,
    BasicTokenIntrospectionResponse,
    StandardRevocableToken,
    BasicRevocationErrorResponse,
    EndpointNotSet, // HasAuthUrl
    EndpointNotSet, // HasDeviceAuthUrl
    EndpointNotSet, // HasIntrospectionUrl
    EndpointNotSet, // HasRevocationUrl
    EndpointSet,    // HasTokenUrl
>;

/// Exchanges a long-lived refresh token for short-lived access tokens.
///
/// The current access token is cached in memory for the lifetime of the
/// process and only exchanged again once it is about to expire.
#[derive(Clone)]
pub struct RefreshingToken {
    client: ConfiguredClient,
    http_client: reqwest::Client,
    refresh_token: RefreshToken,
    cached: Arc<Mutex<Option<AccessToken>>>,
}

impl RefreshingToken {
    pub fn new(
        refresh_token: &str,
        client_id: &str,
        client_secret: &str,
        token_url: &str,
    ) -> Result<Self> {
        let refresh_token = refresh_token.trim();
        let client_id = client_id.trim();
        let client_secret = client_secret.trim();

        if refresh_token.is_empty() {
            return Err(AppError::Auth(
                "OAuth refresh token cannot be empty".to_string(),
            ));
        }
        if client_id.is_empty() {
            return Err(AppError::Auth(
                "OAuth client ID is required for refresh token authentication".to_string(),
            ));
        }
        if client_secret.is_empty() {
            return Err(AppError::Auth(
                "OAuth client secret is required for refresh token authentication".to_string(),
            ));
        }

        let token_url = TokenUrl::new(token_url.to_string())
            .map_err(|e| AppError::Auth(format!("Invalid token URL: {}", e)))?;

        let client = BasicClient::new(ClientId::new(client_id.to_string()))
            .set_client_secret(ClientSecret::new(client_secret.to_string()))
            .set_token_uri(token_url);

        let http_client = reqwest::ClientBuilder::new()
            .redirect(Policy::none())
            .build()?;

        Ok(Self {
            client,
            http_client,
            refresh_token: RefreshToken::new(refresh_token.to_string()),
            cached: Arc::new(Mutex::new(None)),
        })
    }

    /// Get a valid access token, refreshing it if needed.
    ///
    /// The refresh request carries no scope, so the new access token keeps
    /// the scopes the refresh token was originally granted.
    pub async fn access_token(&self) -> Result<String> {
        let now = chrono::Utc::now().timestamp();
        if let Some(token) = self.cached_token(now) {
            debug!("Using cached access token");
            return Ok(token);
        }

        debug!("Exchanging refresh token for access token");
        let token = self.refresh().await?;
        let secret = token.secret.clone();
        self.store(token);

        Ok(secret)
    }

    async fn refresh(&self) -> Result<AccessToken> {
        let token_result = self
            .client
            .exchange_refresh_token(&self.refresh_token)
            .request_async(&self.http_client)
            .await
            .map_err(|e| AppError::Auth(format!("Failed to refresh token: {:?}", e)))?;

        Ok(Self::parse_token(token_result, chrono::Utc::now().timestamp()))
    }

    fn parse_token(token_result: BasicTokenResponse, now: i64) -> AccessToken {
        let expires_in = token_result
            .expires_in()
            .map(|d| d.as_secs() as i64)
            .unwrap_or(DEFAULT_EXPIRES_IN_SECS);

        AccessToken {
            secret: token_result.access_token().secret().clone(),
            expires_at: now + expires_in,
        }
    }

    fn cached_token(&self, now: i64) -> Option<String> {
        let cached = self.cached.lock().unwrap_or_else(PoisonError::into_inner);
        cached
            .as_ref()
            .filter(|token| !token.is_expired(now))
            .map(|token| token.secret.clone())
    }

    fn store(&self, token: AccessToken) {
        let mut cached = self.cached.lock().unwrap_or_else(PoisonError::into_inner);
        *cached = Some(token);
    }
}
