mod between;
mod binary_op;
mod expression;
mod junction;
mod op_precedence;
mod operand;
mod ordered;
mod subquery;

pub use between::*;
pub use binary_op::*;
pub use expression::*;
pub use junction::*;
pub use op_precedence::*;
pub use operand::*;
pub use ordered::*;
pub use subquery::*;
