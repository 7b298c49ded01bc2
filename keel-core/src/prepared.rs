use crate::{AsValue, Result};
use std::fmt::Display;

/// A parameterized, backend-prepared statement handle.
///
/// # Binding Semantics
/// * `bind` appends a value (driver chooses actual placeholder numbering).
/// * `bind_index` sets the parameter at `index` (from 0).
/// * `bind_name` sets the parameter declared as `:name`.
///
/// Methods return `&mut Self` for fluent chaining:
/// ```rust,ignore
/// prepared.bind(42)?.bind_name("status", "open")?;
/// ```
pub trait Prepared: Send + Sync + Display {
    /// Remove all the previously bound values.
    fn clear_bindings(&mut self) -> Result<&mut Self>;
    /// Append a parameter value.
    fn bind<V: AsValue>(&mut self, value: V) -> Result<&mut Self>;
    /// Bind a value at a specific index.
    fn bind_index<V: AsValue>(&mut self, value: V, index: u64) -> Result<&mut Self>;
    /// Bind a value to a named parameter.
    fn bind_name<V: AsValue>(&mut self, name: &str, value: V) -> Result<&mut Self>;
}
