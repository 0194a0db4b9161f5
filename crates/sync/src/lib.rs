//! Pipelined block synchronization engine.
//!
//! The [`Synchronizer`] drives the local chain forward from the persisted
//! head, indefinitely, by running two bounded worker pools:
//!
//! * *fetchers* retrieve `(block, state update, classes)` triples from the
//!   upstream source at monotonically increasing heights, swallowing every
//!   upstream error and retrying until cancelled, and
//! * *verifiers* sanity check a fetched triple against the chain store and
//!   commit it.
//!
//! Fetch order is unconstrained and commits may be attempted out of order;
//! the chain store only accepts the immediate successor of its head, so a
//! verifier that ran ahead fails the chain-linking predicate and triggers a
//! rollback. Rolling back cancels the pipeline's cancellation scope, which
//! aborts every in-flight task, and resumes fetching at the lowest
//! uncommitted height. The rejection plus rollback path is the ordering
//! mechanism; no priority queue is imposed.
//!
//! The pipeline scope is a child of the caller's shutdown token, so shutting
//! the synchronizer down implicitly cancels whatever epoch is in flight.

#![warn(missing_docs, unreachable_pub)]
#![deny(unused_must_use, rust_2018_idioms)]

mod config;
mod engine;
mod error;

pub use config::SyncConfig;
pub use engine::Synchronizer;
pub use error::SyncFailure;
