//! Key-value storage abstraction and table layout for skarn.
//!
//! The chain store persists everything in a flat key-value namespace. Every
//! table is identified by a one byte tag prefixed to its keys, and keys are
//! big endian so that the layout can be inspected offline with nothing but
//! the table definitions in [`tables`].
//!
//! The [`Database`] trait is deliberately minimal: point reads, point
//! writes, and an atomic write [`Batch`]. All writes issued for one block go
//! through a single batch, so either every index of a block becomes visible
//! or none of them do.

#![warn(missing_docs, unreachable_pub)]
#![deny(unused_must_use, rust_2018_idioms)]

mod database;
mod error;
pub mod mem;
mod table;
pub mod tables;

pub use database::{Batch, Database};
pub use error::DatabaseError;
pub use table::{BatchExt, DatabaseExt, Encode, Table};
