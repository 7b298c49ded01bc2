use crate::{
    OpPrecedence, Value,
    writer::{Context, SqlWriter},
};
use std::fmt::Debug;

/// A renderable SQL expression node.
pub trait Expression: OpPrecedence + Send + Sync + Debug {
    /// Serialize the expression into the output string using the sql writer.
    fn write_query(&self, writer: &dyn SqlWriter, context: &mut Context, out: &mut String);
}

impl<T: Expression> Expression for &T {
    fn write_query(&self, writer: &dyn SqlWriter, context: &mut Context, out: &mut String) {
        (*self).write_query(writer, context, out);
    }
}

impl Expression for &dyn Expression {
    fn write_query(&self, writer: &dyn SqlWriter, context: &mut Context, out: &mut String) {
        (*self).write_query(writer, context, out);
    }
}

impl Expression for Box<dyn Expression> {
    fn write_query(&self, writer: &dyn SqlWriter, context: &mut Context, out: &mut String) {
        self.as_ref().write_query(writer, context, out);
    }
}

impl Expression for Value {
    fn write_query(&self, writer: &dyn SqlWriter, context: &mut Context, out: &mut String) {
        writer.write_value(context, out, self);
    }
}
