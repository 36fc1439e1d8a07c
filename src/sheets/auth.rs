use crate::config::{AuthType, InvocationConfig};
use crate::error::{AppError, Result};
use crate::sheets::token::{GOOGLE_TOKEN_URL, RefreshingToken};
use google_sheets4::common::GetToken;
use hyper_util::client::legacy::connect::HttpConnector;
use std::error::Error as StdError;
use std::future::Future;
use std::pin::Pin;
use tracing::{debug, info, instrument};
use yup_oauth2::{
    ServiceAccountAuthenticator, authenticator::Authenticator, hyper_rustls::HttpsConnector,
};

type ServiceAccountAuth = Authenticator<HttpsConnector<HttpConnector>>;

type TokenResult = std::result::Result<Option<String>, Box<dyn StdError + Send + Sync>>;
type TokenFuture<'a> = Pin<Box<dyn Future<Output = TokenResult> + Send + 'a>>;

/// Yields bearer tokens for the Sheets API.
#[derive(Clone)]
pub enum TokenSource {
    /// Service account key, refreshed internally through a signed JWT assertion.
    ServiceAccount(ServiceAccountAuth),
    /// A pre-issued access token. Never refreshed.
    Static(String),
    /// A refresh token exchanged for access tokens on demand.
    RefreshToken(RefreshingToken),
}

impl TokenSource {
    pub fn kind(&self) -> AuthType {
        match self {
            TokenSource::ServiceAccount(_) => AuthType::ServiceAccount,
            TokenSource::Static(_) => AuthType::OAuth,
            TokenSource::RefreshToken(_) => AuthType::OAuthRefreshToken,
        }
    }
}

impl GetToken for TokenSource {
    fn get_token<'a>(&'a self, scopes: &'a [&str]) -> TokenFuture<'a> {
        Box::pin(async move {
            match self {
                TokenSource::ServiceAccount(auth) => auth.get_token(scopes).await,
                TokenSource::Static(token) => Ok(Some(token.clone())),
                TokenSource::RefreshToken(source) => {
                    let token = source.access_token().await?;
                    Ok(Some(token))
                }
            }
        })
    }
}

/// Build the token source selected by the configured auth type.
#[instrument(
    name = "Authenticating to Google Sheets",
    skip_all,
    fields(auth_type = %config.auth_type)
)]
pub async fn create_token_source(config: &InvocationConfig) -> Result<TokenSource> {
    let credentials = config.credentials.trim();

    match config.auth_type {
        AuthType::ServiceAccount => from_service_account(credentials).await,
        AuthType::OAuth => from_access_token(credentials),
        AuthType::OAuthRefreshToken => {
            let source = RefreshingToken::new(
                credentials,
                config.oauth_client_id.as_deref().unwrap_or_default(),
                config.oauth_client_secret.as_deref().unwrap_or_default(),
                GOOGLE_TOKEN_URL,
            )?;
            info!("Using OAuth refresh token authentication");
            Ok(TokenSource::RefreshToken(source))
        }
    }
}

async fn from_service_account(credentials: &str) -> Result<TokenSource> {
    let key = yup_oauth2::parse_service_account_key(credentials).map_err(|e| {
        AppError::Auth(format!("Failed to parse service account credentials: {}", e))
    })?;
    debug!(client_email = %key.client_email, "Parsed service account key");

    let auth = ServiceAccountAuthenticator::builder(key)
        .build()
        .await
        .map_err(|e| AppError::Auth(format!("Failed to build authenticator: {}", e)))?;

    Ok(TokenSource::ServiceAccount(auth))
}

fn from_access_token(credentials: &str) -> Result<TokenSource> {
    let access_token = credentials.trim();
    if access_token.is_empty() {
        return Err(AppError::Auth(
            "OAuth access token cannot be empty".to_string(),
        ));
    }

    Ok(TokenSource::Static(access_token.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::row::test_helpers::mock_row;

    fn config(auth_type: AuthType, credentials: &str) -> InvocationConfig {
        InvocationConfig {
            spreadsheet_id: "sheet-123".to_string(),
            sheet_name: "Sheet1".to_string(),
            values: mock_row(),
            auth_type,
            credentials: credentials.to_string(),
            oauth_client_id: Some("client-id".to_string()),
            oauth_client_secret: Some("client-secret".to_string()),
            github_output: None,
        }
    }

    #[tokio::test]
    async fn test_static_token() {
        let source = create_token_source(&config(AuthType::OAuth, " ya29.token \n"))
            .await
            .unwrap();
        assert_eq!(source.kind(), AuthType::OAuth);

        let token = source.get_token(&["scope"]).await.unwrap();
        assert_eq!(token.as_deref(), Some("ya29.token"));
    }

    #[tokio::test]
    async fn test_static_token_empty() {
        let err = create_token_source(&config(AuthType::OAuth, "   "))
            .await
            .err()
            .unwrap();
        assert!(matches!(err, AppError::Auth(_)), "got {:?}", err);
    }

    #[tokio::test]
    async fn test_whitespace_credentials_fail_in_auth() {
        let inputs = crate::config::Inputs {
            spreadsheet_id: Some("sheet-123".to_string()),
            values: Some(r#"["a"]"#.to_string()),
            auth_type: Some("oauth".to_string()),
            credentials: Some("   ".to_string()),
            ..Default::default()
        };
        let config = inputs.resolve().unwrap();

        let err = create_token_source(&config).await.err().unwrap();
        assert!(
            matches!(&err, AppError::Auth(msg) if msg.contains("cannot be empty")),
            "got {:?}",
            err
        );
    }

    #[tokio::test]
    async fn test_refresh_token() {
        let source = create_token_source(&config(AuthType::OAuthRefreshToken, "1//refresh"))
            .await
            .unwrap();
        assert_eq!(source.kind(), AuthType::OAuthRefreshToken);
    }

    #[tokio::test]
    async fn test_refresh_token_missing_client() {
        let mut config = config(AuthType::OAuthRefreshToken, "1//refresh");
        config.oauth_client_secret = None;

        let err = create_token_source(&config).await.err().unwrap();
        assert!(
            matches!(&err, AppError::Auth(msg) if msg.contains("client secret")),
            "got {:?}",
            err
        );
    }

    #[tokio::test]
    async fn test_service_account_invalid_key() {
        for credentials in ["not json", r#"{"type": "service_account"}"#] {
            let err = create_token_source(&config(AuthType::ServiceAccount, credentials))
                .await
                .err()
                .unwrap();
            assert!(
                matches!(&err, AppError::Auth(msg) if msg.contains("service account")),
                "got {:?}",
                err
            );
        }
    }
}
