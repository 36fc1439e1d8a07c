mod engine;

pub use engine::AppendEngine;
