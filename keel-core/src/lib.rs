mod as_value;
mod column;
mod config;
mod connection;
mod dao;
mod dialect;
mod driver;
mod error;
mod executor;
mod expression;
mod mapping;
mod page;
mod params;
mod predicate;
mod prepared;
mod query;
mod registry;
mod schema;
mod session;
mod statement;
mod text;
mod util;
mod value;
pub mod writer;

pub use ::anyhow::Context;
pub use as_value::*;
pub use column::*;
pub use config::*;
pub use connection::*;
pub use dao::*;
pub use dialect::*;
pub use driver::*;
pub use error::*;
pub use executor::*;
pub use expression::*;
pub use mapping::*;
pub use page::*;
pub use params::*;
pub use predicate::*;
pub use prepared::*;
pub use query::*;
pub use registry::*;
pub use schema::*;
pub use session::*;
pub use statement::*;
pub use text::*;
pub use util::*;
pub use value::*;
pub use writer::{GenericSqlWriter, Projection, SqlWriter};
pub mod stream {
    pub use ::futures::stream::*;
}
pub use ::futures::future;

pub type Result<T> = anyhow::Result<T>;
pub type Error = anyhow::Error;
