//! Domain layer for the stockroom backend.
//!
//! Pure types and rules with no I/O: the error taxonomy, roles and the
//! access policy, and the stock arithmetic the ledger commits.

pub mod error;
pub mod ledger;
pub mod policy;
pub mod reporting;
pub mod roles;
pub mod search;
pub mod types;
