use crate::append::AppendEngine;
use crate::config::InvocationConfig;
use crate::error::Result;
use crate::report;
use crate::sheets::{SheetsClient, create_token_source};
use tracing::{debug, info};

pub async fn execute(config: InvocationConfig) -> Result<()> {
    info!(
        spreadsheet_id = %config.spreadsheet_id,
        sheet_name = %config.sheet_name,
        auth_type = %config.auth_type,
        credentials_len = config.credentials.len(),
        "Configuration"
    );

    let token_source = create_token_source(&config).await?;
    debug!(kind = %token_source.kind(), "Token source ready");

    let sheets_client = SheetsClient::new(&config.spreadsheet_id, token_source)?;
    let engine = AppendEngine::new(sheets_client, config.sheet_name.as_str());
    let outcome = engine.append(&config.values).await?;

    info!(range = %outcome.result.updated_range, "Row appended");

    report::report(&outcome, config.github_output.as_deref());

    Ok(())
}
