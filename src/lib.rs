//! arrayquery - SQL-like querying over in-memory record collections.
//!
//! This crate provides a relational-style query interface over a `Vec` of
//! JSON records: declarative filter conditions with boolean composition,
//! ordering, pagination, existence checks, and aggregates, without a backing
//! database.
//!
//! # Main Components
//!
//! - **Condition**: compiled representation of a declarative filter
//!   expression (an object of field/value pairs, or an operator-tagged array)
//! - **ArrayQuery**: builder accumulating source, condition, ordering, and
//!   pagination, executed via `all`/`one`/`exists` or the aggregates
//! - **value**: the comparison and coercion rules shared by evaluation,
//!   sorting, and aggregation
//!
//! # Example
//!
//! ```rust
//! use arrayquery::ArrayQuery;
//! use serde_json::json;
//!
//! let mut query = ArrayQuery::new();
//! query.from(vec![
//!     json!({"id": 1, "username": "admin", "amount": 100}),
//!     json!({"id": 2, "username": "test", "amount": 200}),
//!     json!({"id": 3, "username": "guest", "amount": 300}),
//! ]);
//!
//! query.where_(json!(["or", {"username": "admin"}, [">", "amount", 250]])).unwrap();
//! let rows = query.all().unwrap();
//! assert_eq!(rows.len(), 2);
//! assert_eq!(rows[0]["username"], "admin");
//! assert_eq!(rows[1]["username"], "guest");
//!
//! assert_eq!(query.sum("amount").unwrap(), 400.0);
//! ```

pub mod condition;
pub mod error;
pub mod executor;
pub mod value;

// Re-export main types for convenience
pub use condition::{compile, prune_empty, CompareOp, Condition};
pub use error::{QueryError, QueryResult};
pub use executor::{ArrayQuery, OrderBy, SortDirection};
