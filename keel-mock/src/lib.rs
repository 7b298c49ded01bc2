mod connection;
mod driver;
mod prepared;
mod sql_writer;

pub use connection::*;
pub use driver::*;
pub use prepared::*;
pub use sql_writer::*;

use keel_core::{QueryResult, RowLabeled, RowsAffected, Value};

/// Result of a statement returning `rows`, each aligned with `labels`.
pub fn rows<L, R>(labels: &[L], rows: R) -> Vec<QueryResult>
where
    L: AsRef<str>,
    R: IntoIterator<Item = Vec<Value>>,
{
    let labels: keel_core::RowNames = labels.iter().map(|v| v.as_ref().to_owned()).collect();
    rows.into_iter()
        .map(|values| RowLabeled::new(labels.clone(), values.into_boxed_slice()).into())
        .collect()
}

/// Result of a statement with a single column and a single row.
pub fn scalar(label: &str, value: impl Into<Value>) -> Vec<QueryResult> {
    rows(&[label], [vec![value.into()]])
}

/// Result of a modifying statement.
pub fn affected(rows_affected: u64) -> Vec<QueryResult> {
    vec![
        RowsAffected {
            rows_affected,
            last_affected_id: None,
        }
        .into(),
    ]
}
