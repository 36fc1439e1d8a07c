use crate::error::{AppError, Result};
use crate::models::Row;
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

const DEFAULT_SHEET_NAME: &str = "Sheet1";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AuthType {
    #[default]
    ServiceAccount,
    OAuth,
    OAuthRefreshToken,
}

impl AuthType {
    pub fn as_str(&self) -> &'static str {
        match self {
            AuthType::ServiceAccount => "service_account",
            AuthType::OAuth => "oauth",
            AuthType::OAuthRefreshToken => "oauth_refresh_token",
        }
    }
}

impl fmt::Display for AuthType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AuthType {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "service_account" => Ok(AuthType::ServiceAccount),
            "oauth" => Ok(AuthType::OAuth),
            "oauth_refresh_token" => Ok(AuthType::OAuthRefreshToken),
            _ => Err(AppError::Config(format!(
                "unsupported auth_type: {} (supported: service_account, oauth, oauth_refresh_token)",
                s
            ))),
        }
    }
}

/// Raw inputs as they arrive from flags or the environment.
///
/// GitHub Actions exports inputs that were not set as empty strings, so an
/// empty value is treated the same as a missing one.
#[derive(Debug, Clone, Default)]
pub struct Inputs {
    pub spreadsheet_id: Option<String>,
    pub sheet_name: Option<String>,
    pub values: Option<String>,
    pub auth_type: Option<String>,
    pub credentials: Option<String>,
    pub oauth_client_id: Option<String>,
    pub oauth_client_secret: Option<String>,
    pub github_output: Option<PathBuf>,
}

/// Validated configuration for a single run.
#[derive(Debug, Clone)]
pub struct InvocationConfig {
    pub spreadsheet_id: String,
    pub sheet_name: String,
    pub values: Row,
    pub auth_type: AuthType,
    pub credentials: String,
    pub oauth_client_id: Option<String>,
    pub oauth_client_secret: Option<String>,
    pub github_output: Option<PathBuf>,
}

fn present(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

impl Inputs {
    /// Apply defaults and validate required inputs.
    ///
    /// Values are decoded here, so malformed JSON fails before any network
    /// call is made. The auth type tag is only checked after that.
    pub fn resolve(self) -> Result<InvocationConfig> {
        // Whitespace-only credentials count as given; the authenticator
        // rejects them once trimmed.
        let credentials = self
            .credentials
            .filter(|c| !c.is_empty())
            .ok_or_else(|| AppError::Config("credentials is required".to_string()))?;
        let spreadsheet_id = present(self.spreadsheet_id)
            .ok_or_else(|| AppError::Config("spreadsheet_id is required".to_string()))?;
        let sheet_name =
            present(self.sheet_name).unwrap_or_else(|| DEFAULT_SHEET_NAME.to_string());
        let values = present(self.values)
            .ok_or_else(|| AppError::Config("values is required".to_string()))?;
        let auth_tag =
            present(self.auth_type).unwrap_or_else(|| AuthType::default().to_string());

        let oauth_client_id = present(self.oauth_client_id);
        let oauth_client_secret = present(self.oauth_client_secret);
        if auth_tag.trim().eq_ignore_ascii_case(AuthType::OAuthRefreshToken.as_str()) {
            if oauth_client_id.is_none() {
                return Err(AppError::Config(
                    "oauth_client_id is required for oauth_refresh_token auth type".to_string(),
                ));
            }
            if oauth_client_secret.is_none() {
                return Err(AppError::Config(
                    "oauth_client_secret is required for oauth_refresh_token auth type"
                        .to_string(),
                ));
            }
        }

        let values: Row = values.parse()?;
        let auth_type: AuthType = auth_tag.parse()?;

        Ok(InvocationConfig {
            spreadsheet_id,
            sheet_name,
            values,
            auth_type,
            credentials: credentials.trim().to_string(),
            oauth_client_id,
            oauth_client_secret,
            github_output: self.github_output.filter(|p| !p.as_os_str().is_empty()),
        })
    }
}
