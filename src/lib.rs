//! Generic data access over SQL drivers.
//!
//! Records are plain structs deriving [`Record`], projections derive [`Shape`]. A
//! [`Session`] wraps a driver connection and offers statements in three dialects,
//! runtime built criteria ([`PredicateSet`]) and per record data access ([`Dao`]).
//!
//! ```rust,ignore
//! #[derive(Default, Record)]
//! #[keel(table = "orders")]
//! struct Order {
//!     #[keel(primary_key)]
//!     id: i64,
//!     status: String,
//! }
//!
//! let registry = Arc::new(Registry::new());
//! let mut session = Session::new(connection, registry);
//! let open = session.dao::<Order>()?.find_by_property("status", "open", Restriction::Eq).await?;
//! ```
pub use keel_core::*;
pub use keel_macros::*;
