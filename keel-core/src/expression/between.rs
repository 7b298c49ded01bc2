use crate::{
    BinaryOpType, Expression, OpPrecedence, Value,
    writer::{Context, SqlWriter},
};

/// `expression BETWEEN low AND high`.
#[derive(Debug)]
pub struct Between<E: Expression> {
    pub expression: E,
    pub low: Value,
    pub high: Value,
}

impl<E: Expression> OpPrecedence for Between<E> {
    fn precedence(&self, writer: &dyn SqlWriter) -> i32 {
        writer.expression_binary_op_precedence(&BinaryOpType::Equal)
    }
}

impl<E: Expression> Expression for Between<E> {
    fn write_query(&self, writer: &dyn SqlWriter, context: &mut Context, out: &mut String) {
        writer.write_expression_between(context, out, &self.expression, &self.low, &self.high)
    }
}
