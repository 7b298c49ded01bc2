use keel_core::SqlWriter;

/// Prints the generic dialect.
#[derive(Debug, Clone, Copy, Default)]
pub struct MockSqlWriter;

impl SqlWriter for MockSqlWriter {
    fn as_dyn(&self) -> &dyn SqlWriter {
        self
    }
}
