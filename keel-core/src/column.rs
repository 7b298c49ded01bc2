use crate::{
    Expression, OpPrecedence,
    writer::{Context, SqlWriter},
};
use std::borrow::Cow;

/// Reference to a column, qualified by the alias (or name) of its source.
#[derive(Default, Debug, Clone, PartialEq, Eq)]
pub struct ColumnRef {
    /// Column name.
    pub name: Cow<'static, str>,
    /// Alias or table name, may be empty.
    pub table: Cow<'static, str>,
}

impl ColumnRef {
    pub fn new(table: impl Into<Cow<'static, str>>, name: impl Into<Cow<'static, str>>) -> Self {
        Self {
            name: name.into(),
            table: table.into(),
        }
    }
}

impl OpPrecedence for ColumnRef {
    fn precedence(&self, _writer: &dyn SqlWriter) -> i32 {
        1_000_000
    }
}

impl Expression for ColumnRef {
    fn write_query(&self, writer: &dyn SqlWriter, context: &mut Context, out: &mut String) {
        writer.write_column_ref(context, out, self);
    }
}

/// A table (optionally inside a schema) and the alias it is declared with.
#[derive(Default, Debug, Clone, PartialEq, Eq)]
pub struct TableRef {
    pub name: Cow<'static, str>,
    pub schema: Cow<'static, str>,
    pub alias: Cow<'static, str>,
}

impl TableRef {
    pub fn new(name: impl Into<Cow<'static, str>>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn with_schema(mut self, schema: impl Into<Cow<'static, str>>) -> Self {
        self.schema = schema.into();
        self
    }

    pub fn with_alias(mut self, alias: impl Into<Cow<'static, str>>) -> Self {
        self.alias = alias.into();
        self
    }

    pub fn full_name(&self) -> String {
        let mut result = String::new();
        if !self.schema.is_empty() {
            result.push_str(&self.schema);
            result.push('.');
        }
        result.push_str(&self.name);
        result
    }
}
