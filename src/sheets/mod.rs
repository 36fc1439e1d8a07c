mod auth;
mod client;
mod token;

pub use auth::{TokenSource, create_token_source};
pub use client::SheetsClient;

use crate::error::Result;
use crate::models::{AppendResult, Row};
use async_trait::async_trait;
use serde_json::Value;

#[async_trait]
pub trait SheetOperations {
    /// Read every row in `range`.
    async fn read_rows(&self, range: &str) -> Result<Vec<Vec<Value>>>;

    /// Append `row` within `range`, inserting a new row for it.
    async fn append_row(&self, range: &str, row: &Row) -> Result<AppendResult>;
}
