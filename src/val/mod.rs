//! Declarative validation of decoded JSON request bodies.
//!
//! A [`Set`] is an ordered list of [`Validator`]s, one per named field. Each
//! validator declares the expected [`Kind`] of its field and a list of
//! [`Rule`]s (numeric bounds, integer/float class, sign, length, prefix,
//! suffix, substring, regex, nested sets). Sets are plain data: build them
//! once at startup, share them across requests, and describe them as JSON
//! through serde.
//!
//! Errors are field-addressed and human readable:
//!
//! - `'name': required`
//! - `'age': expected 'number' but got 'string'`
//! - `'name': length 2 must be at least 6`
//!
mod error;
mod kind;
mod number;
mod rule;
mod schema;
mod set;
mod string;

pub use error::*;
pub use kind::Kind;
pub use number::*;
pub use rule::*;
pub use schema::RuleSchema;
pub use set::*;
pub use string::*;
