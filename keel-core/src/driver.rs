use crate::{Connection, Prepared, Result, writer::SqlWriter};
use std::{borrow::Cow, future::Future};

/// Backend entry point: names the connection, prepared statement and SQL dialect types.
pub trait Driver: Send + Sync {
    type Connection: Connection<Driver = Self>;
    type SqlWriter: SqlWriter;
    type Prepared: Prepared;

    /// Human readable backend name.
    const NAME: &'static str;

    /// Dialect printer for this backend.
    fn sql_writer(&self) -> Self::SqlWriter;

    /// Open a connection to `url`.
    fn connect(&self, url: Cow<'static, str>) -> impl Future<Output = Result<Self::Connection>> {
        Self::Connection::connect(url)
    }
}
