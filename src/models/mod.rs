pub mod append;
pub mod row;

pub use append::{AppendOutcome, AppendResult};
pub use row::Row;
