use crate::{
    BinaryOpType, Expression, OpPrecedence,
    writer::{Context, SqlWriter},
};

/// Terms joined by the same logical operator (`And` or `Or`).
#[derive(Debug)]
pub struct Junction {
    pub op: BinaryOpType,
    pub terms: Vec<Box<dyn Expression>>,
}

impl Junction {
    pub fn all(terms: Vec<Box<dyn Expression>>) -> Self {
        Self {
            op: BinaryOpType::And,
            terms,
        }
    }
    pub fn any(terms: Vec<Box<dyn Expression>>) -> Self {
        Self {
            op: BinaryOpType::Or,
            terms,
        }
    }
}

impl OpPrecedence for Junction {
    fn precedence(&self, writer: &dyn SqlWriter) -> i32 {
        match self.terms.as_slice() {
            [single] => single.precedence(writer),
            _ => writer.expression_binary_op_precedence(&self.op),
        }
    }
}

impl Expression for Junction {
    fn write_query(&self, writer: &dyn SqlWriter, context: &mut Context, out: &mut String) {
        writer.write_expression_junction(context, out, self)
    }
}
