//! Traits implemented by skarn's external collaborators.

#![warn(missing_docs, unreachable_pub)]
#![deny(unused_must_use, rust_2018_idioms)]

mod data;

pub use data::{DataError, StarknetData};
