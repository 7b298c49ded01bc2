use crate::{MockConnection, MockPrepared, MockSqlWriter};
use keel_core::Driver;

#[derive(Debug, Clone, Copy, Default)]
pub struct MockDriver;
impl MockDriver {
    pub const fn new() -> Self {
        Self
    }
}

impl Driver for MockDriver {
    type Connection = MockConnection;
    type SqlWriter = MockSqlWriter;
    type Prepared = MockPrepared;
    const NAME: &'static str = "mock";
    fn sql_writer(&self) -> Self::SqlWriter {
        MockSqlWriter::default()
    }
}
