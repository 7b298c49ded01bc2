use crate::{
    Expression, OpPrecedence, Value,
    writer::{Context, SqlWriter},
};
use std::borrow::Cow;

#[derive(Debug, Clone, PartialEq)]
pub enum Operand {
    Null,
    Asterisk,
    /// Positional placeholder.
    QuestionMark,
    /// Named placeholder.
    Parameter(Cow<'static, str>),
    Variable(Value),
    /// Parenthesized list of values, the right side of `IN`.
    List(Vec<Value>),
}

impl OpPrecedence for Operand {
    fn precedence(&self, _writer: &dyn SqlWriter) -> i32 {
        1_000_000_000
    }
}

impl Expression for Operand {
    fn write_query(&self, writer: &dyn SqlWriter, context: &mut Context, out: &mut String) {
        writer.write_expression_operand(context, out, self)
    }
}
