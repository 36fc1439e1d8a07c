use google_sheets4::api::AppendValuesResponse;

/// What the server reports after a successful append.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AppendResult {
    pub updated_range: String,
    pub updated_rows: i32,
    pub updated_columns: i32,
    pub updated_cells: i32,
}

impl From<AppendValuesResponse> for AppendResult {
    fn from(response: AppendValuesResponse) -> Self {
        let updates = response.updates.unwrap_or_default();
        AppendResult {
            updated_range: updates.updated_range.unwrap_or_default(),
            updated_rows: updates.updated_rows.unwrap_or_default(),
            updated_columns: updates.updated_columns.unwrap_or_default(),
            updated_cells: updates.updated_cells.unwrap_or_default(),
        }
    }
}

/// An append result together with what was known about the sheet beforehand.
///
/// `existing_rows` and `target_row` are `None` when the sheet could not be
/// read and the server picked the insertion point on its own.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppendOutcome {
    pub result: AppendResult,
    pub existing_rows: Option<usize>,
    pub target_row: Option<usize>,
}

impl AppendOutcome {
    pub fn total_rows(&self) -> usize {
        self.existing_rows.unwrap_or_default() + self.result.updated_rows.max(0) as usize
    }
}
