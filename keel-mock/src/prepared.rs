use keel_core::{AsValue, Binding, Prepared, Result, truncate_long};
use std::fmt::{self, Display, Formatter};

/// Prepared statement that keeps the values bound to it.
#[derive(Debug, Clone, PartialEq)]
pub struct MockPrepared {
    pub(crate) sql: String,
    pub(crate) bindings: Vec<Binding>,
    pub(crate) index: u64,
}

impl MockPrepared {
    pub(crate) fn new(sql: String) -> Self {
        Self {
            sql,
            bindings: Vec::new(),
            index: 0,
        }
    }
    pub fn sql(&self) -> &str {
        &self.sql
    }
    pub fn bindings(&self) -> &[Binding] {
        &self.bindings
    }
}

impl Prepared for MockPrepared {
    fn clear_bindings(&mut self) -> Result<&mut Self> {
        self.bindings.clear();
        self.index = 0;
        Ok(self)
    }

    fn bind<V: AsValue>(&mut self, value: V) -> Result<&mut Self> {
        let index = self.index;
        self.bind_index(value, index)
    }

    fn bind_index<V: AsValue>(&mut self, value: V, index: u64) -> Result<&mut Self> {
        let value = value.as_value();
        self.bindings
            .retain(|v| !matches!(v, Binding::Index(i, ..) if *i == index));
        self.bindings.push(Binding::Index(index, value));
        self.index = self.index.max(index + 1);
        Ok(self)
    }

    fn bind_name<V: AsValue>(&mut self, name: &str, value: V) -> Result<&mut Self> {
        let value = value.as_value();
        self.bindings
            .retain(|v| !matches!(v, Binding::Name(n, ..) if n == name));
        self.bindings.push(Binding::Name(name.to_owned(), value));
        Ok(self)
    }
}

impl Display for MockPrepared {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", truncate_long!(self.sql))
    }
}
