use crate::{
    Expression, OpPrecedence,
    writer::{Context, SqlWriter},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Order {
    ASC,
    DESC,
}

impl Order {
    /// Reads `asc` or `desc` in any case, anything else is `None`.
    pub fn parse(direction: &str) -> Option<Order> {
        let direction = direction.trim();
        if direction.eq_ignore_ascii_case("asc") {
            Some(Order::ASC)
        } else if direction.eq_ignore_ascii_case("desc") {
            Some(Order::DESC)
        } else {
            None
        }
    }
}

#[derive(Debug, Clone)]
pub struct Ordered<E: Expression> {
    pub order: Order,
    pub expression: E,
}

impl<E: Expression> OpPrecedence for Ordered<E> {
    fn precedence(&self, writer: &dyn SqlWriter) -> i32 {
        self.expression.precedence(writer)
    }
}

impl<E: Expression> Expression for Ordered<E> {
    fn write_query(&self, writer: &dyn SqlWriter, context: &mut Context, out: &mut String) {
        writer.write_expression_ordered(
            context,
            out,
            &Ordered {
                order: self.order,
                expression: &self.expression,
            },
        )
    }
}
