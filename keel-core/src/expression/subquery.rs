use crate::{
    BinaryOpType, ColumnRef, CriteriaQuery, Expression, OpPrecedence,
    writer::{Context, SqlWriter},
};

/// `column IN (SELECT projection FROM ...)`.
#[derive(Debug)]
pub struct Subquery {
    pub column: ColumnRef,
    pub query: Box<CriteriaQuery>,
}

impl OpPrecedence for Subquery {
    fn precedence(&self, writer: &dyn SqlWriter) -> i32 {
        writer.expression_binary_op_precedence(&BinaryOpType::In)
    }
}

impl Expression for Subquery {
    fn write_query(&self, writer: &dyn SqlWriter, context: &mut Context, out: &mut String) {
        writer.write_expression_subquery(context, out, self)
    }
}
