use super::{SheetOperations, TokenSource};
use crate::error::{AppError, Result};
use crate::models::{AppendResult, Row};
use async_trait::async_trait;
use google_sheets4::api::{Scope, Sheets, ValueRange};
use hyper_rustls::HttpsConnector;
use hyper_util::client::legacy::Client;
use hyper_util::client::legacy::connect::HttpConnector;
use serde_json::Value;
use tracing::{debug, instrument};

// Read and write access to the user's spreadsheets
const AUTH_SCOPE: Scope = Scope::Spreadsheet;

pub struct SheetsClient {
    hub: Sheets<HttpsConnector<HttpConnector>>,
    spreadsheet_id: String,
}

impl SheetsClient {
    /// Create a new SheetsClient bound to a token source
    pub fn new(spreadsheet_id: &str, token_source: TokenSource) -> Result<Self> {
        let connector = hyper_rustls::HttpsConnectorBuilder::new()
            .with_native_roots()
            .map_err(|e| AppError::Sheets(format!("Failed to load native roots: {}", e)))?
            .https_or_http()
            .enable_http1()
            .build();

        let client = Client::builder(hyper_util::rt::TokioExecutor::new()).build(connector);

        Ok(Self {
            hub: Sheets::new(client, token_source),
            spreadsheet_id: spreadsheet_id.to_string(),
        })
    }
}

#[async_trait]
impl SheetOperations for SheetsClient {
    #[instrument(name = "Reading existing rows", skip(self))]
    async fn read_rows(&self, range: &str) -> Result<Vec<Vec<Value>>> {
        let (_, response) = self
            .hub
            .spreadsheets()
            .values_get(&self.spreadsheet_id, range)
            .major_dimension("ROWS")
            .add_scope(AUTH_SCOPE)
            .doit()
            .await
            .map_err(|e| AppError::Sheets(format!("Failed to read '{}': {}", range, e)))?;

        // Values are Option<Vec<Vec<serde_json::Value>>>, absent for an empty sheet
        let rows = response.values.unwrap_or_default();
        debug!(rows = rows.len(), "Read rows");

        Ok(rows)
    }

    #[instrument(name = "Appending row", skip(self, row), fields(cells = row.len()))]
    async fn append_row(&self, range: &str, row: &Row) -> Result<AppendResult> {
        let value_range = ValueRange {
            major_dimension: Some("ROWS".to_string()),
            range: None,
            values: Some(vec![row.cells().to_vec()]),
        };

        let (_, response) = self
            .hub
            .spreadsheets()
            .values_append(value_range, &self.spreadsheet_id, range)
            .value_input_option("USER_ENTERED")
            .insert_data_option("INSERT_ROWS")
            .add_scope(AUTH_SCOPE)
            .doit()
            .await
            .map_err(|e| AppError::Sheets(format!("Failed to append row: {}", e)))?;

        Ok(response.into())
    }
}
