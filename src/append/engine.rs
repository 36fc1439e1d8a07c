use crate::error::Result;
use crate::models::{AppendOutcome, Row};
use crate::sheets::SheetOperations;
use tracing::{info, instrument, warn};

/// Range covering every column the action writes to.
pub fn open_range(sheet_name: &str) -> String {
    format!("{}!A:Z", sheet_name)
}

/// Range pinned to a single 1-based row.
pub fn row_range(sheet_name: &str, row: usize) -> String {
    format!("{}!A{}:Z{}", sheet_name, row, row)
}

pub struct AppendEngine<SC> {
    sheets_client: SC,
    sheet_name: String,
}

impl<SC> AppendEngine<SC>
where
    SC: SheetOperations + Sync,
{
    pub fn new(sheets_client: SC, sheet_name: impl Into<String>) -> Self {
        Self {
            sheets_client,
            sheet_name: sheet_name.into(),
        }
    }

    /// Append `row` after the last row of the sheet.
    ///
    /// When the existing rows can be read, the append is pinned to the next
    /// free row so its number is known. Otherwise the server picks the
    /// insertion point within the open range.
    #[instrument(name = "Append", skip_all, fields(sheet = %self.sheet_name))]
    pub async fn append(&self, row: &Row) -> Result<AppendOutcome> {
        let (range, existing_rows) = match self.next_row().await {
            Some(existing_rows) => {
                let target_row = existing_rows + 1;
                let range = row_range(&self.sheet_name, target_row);
                info!(range = %range, "Appending to");
                (range, Some(existing_rows))
            }
            None => (open_range(&self.sheet_name), None),
        };

        if row.is_empty() {
            warn!("Values array is empty, appending an empty row");
        }

        let result = self.sheets_client.append_row(&range, row).await?;

        Ok(AppendOutcome {
            result,
            existing_rows,
            target_row: existing_rows.map(|n| n + 1),
        })
    }

    /// Count the rows already in the sheet, or `None` if they cannot be read.
    async fn next_row(&self) -> Option<usize> {
        info!("Reading existing data from sheet");
        let rows = match self
            .sheets_client
            .read_rows(&open_range(&self.sheet_name))
            .await
        {
            Ok(rows) => rows,
            Err(e) => {
                warn!("Failed to read existing data: {}", e);
                warn!("Continuing with standard append");
                return None;
            }
        };

        let existing_rows = rows.len();
        info!(
            total_rows = existing_rows,
            next_row = existing_rows + 1,
            "Existing data"
        );
        if let Some(first) = rows.first().filter(|r| !r.is_empty()) {
            info!(columns = first.len(), "Columns in first row");
        }

        Some(existing_rows)
    }
}


#[cfg(test)]
mod tests {
    use super::mocks::MockSheetsClient;
    use super::*;
    use crate::error::AppError;
    use crate::models::row::test_helpers::mock_row;
    use serde_json::json;

    fn rows(n: usize) -> Vec<Vec<serde_json::Value>> {
        (0..n).map(|i| vec![json!(format!("row {i}"))]).collect()
    }

    #[test]
    fn test_ranges() {
        assert_eq!(open_range("Sheet1"), "Sheet1!A:Z");
        assert_eq!(row_range("Deploys", 7), "Deploys!A7:Z7");
    }

    #[tokio::test]
    async fn test_append_after_existing_rows() {
        let client = MockSheetsClient::new(Some(rows(4)));
        let engine = AppendEngine::new(client.clone(), "Sheet1");

        let outcome = engine.append(&mock_row()).await.unwrap();

        assert_eq!(outcome.existing_rows, Some(4));
        assert_eq!(outcome.target_row, Some(5), "target row should be N+1");
        assert_eq!(outcome.total_rows(), 5);
        assert_eq!(*client.read_ranges.lock().unwrap(), vec!["Sheet1!A:Z"]);

        let appended = client.appended.lock().unwrap();
        assert_eq!(appended.len(), 1);
        assert_eq!(appended[0].0, "Sheet1!A5:Z5");
        assert_eq!(appended[0].1, mock_row());
    }

    #[tokio::test]
    async fn test_append_to_empty_sheet() {
        let client = MockSheetsClient::new(Some(Vec::new()));
        let engine = AppendEngine::new(client.clone(), "Log");

        let outcome = engine.append(&mock_row()).await.unwrap();

        assert_eq!(outcome.existing_rows, Some(0));
        assert_eq!(outcome.target_row, Some(1));
        assert_eq!(client.appended.lock().unwrap()[0].0, "Log!A1:Z1");
    }

    #[tokio::test]
    async fn test_read_failure_falls_back_to_open_range() {
        let client = MockSheetsClient::new(None);
        let engine = AppendEngine::new(client.clone(), "Sheet1");

        let outcome = engine.append(&mock_row()).await.unwrap();

        assert_eq!(outcome.existing_rows, None);
        assert_eq!(outcome.target_row, None);
        assert_eq!(outcome.total_rows(), 1);
        assert_eq!(
            client.appended.lock().unwrap()[0].0,
            "Sheet1!A:Z",
            "append should still happen on the open range"
        );
    }

    #[tokio::test]
    async fn test_append_reports_all_columns() {
        let client = MockSheetsClient::new(Some(rows(2)));
        let engine = AppendEngine::new(client, "Sheet1");
        let row = mock_row();

        let outcome = engine.append(&row).await.unwrap();

        assert_eq!(outcome.result.updated_rows, 1);
        assert!(outcome.result.updated_columns as usize >= row.len());
    }

    #[tokio::test]
    async fn test_append_failure_is_fatal() {
        let mut client = MockSheetsClient::new(Some(rows(1)));
        client.fail_append = true;
        let engine = AppendEngine::new(client, "Sheet1");

        let err = engine.append(&mock_row()).await.unwrap_err();
        assert!(matches!(err, AppError::Sheets(_)), "got {:?}", err);
    }
}
