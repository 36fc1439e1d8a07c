mod append;

use crate::config::Inputs;
use crate::error::Result;
use clap::Parser;
use std::path::PathBuf;

/// Every input can be given as a flag or through the environment variable
/// GitHub Actions exports for it.
#[derive(Parser, Debug)]
#[command(name = "sheets-append-row")]
#[command(about = "Append a row of values to a Google Sheets spreadsheet", long_about = None)]
#[command(version)]
pub struct Cli {
    /// ID of the spreadsheet to append to
    #[arg(long, env = "INPUT_SPREADSHEET_ID")]
    pub spreadsheet_id: Option<String>,

    /// Name of the sheet within the spreadsheet [default: Sheet1]
    #[arg(long, env = "INPUT_SHEET_NAME")]
    pub sheet_name: Option<String>,

    /// Row values as a JSON array, e.g. '["2025-01-01", "deploy", 42]'
    #[arg(long, env = "INPUT_VALUES")]
    pub values: Option<String>,

    /// One of service_account, oauth or oauth_refresh_token [default: service_account]
    #[arg(long, env = "INPUT_AUTH_TYPE")]
    pub auth_type: Option<String>,

    /// Service account key JSON, OAuth access token or OAuth refresh token
    #[arg(long, env = "INPUT_CREDENTIALS", hide_env_values = true)]
    pub credentials: Option<String>,

    /// OAuth client ID, required for oauth_refresh_token
    #[arg(long, env = "INPUT_OAUTH_CLIENT_ID")]
    pub oauth_client_id: Option<String>,

    /// OAuth client secret, required for oauth_refresh_token
    #[arg(long, env = "INPUT_OAUTH_CLIENT_SECRET", hide_env_values = true)]
    pub oauth_client_secret: Option<String>,

    /// File that receives updated_range and updated_rows outputs
    #[arg(long, env = "GITHUB_OUTPUT", value_name = "PATH")]
    pub github_output: Option<PathBuf>,
}

impl Cli {
    pub async fn run(self) -> Result<()> {
        let config = self.into_inputs().resolve()?;
        append::execute(config).await
    }

    fn into_inputs(self) -> Inputs {
        Inputs {
            spreadsheet_id: self.spreadsheet_id,
            sheet_name: self.sheet_name,
            values: self.values,
            auth_type: self.auth_type,
            credentials: self.credentials,
            oauth_client_id: self.oauth_client_id,
            oauth_client_secret: self.oauth_client_secret,
            github_output: self.github_output,
        }
    }
}
